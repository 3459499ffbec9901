use crate::error::SchedulingError;
use crate::schedule::{BracketLink, BracketSlot, Fixture};
use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    pub home_score: u8,
    pub away_score: u8,
    /// Decides a level knockout tie
    pub shootout_winner: Option<BracketSlot>,
}

impl MatchScore {
    pub fn new(home_score: u8, away_score: u8) -> Self {
        MatchScore {
            home_score,
            away_score,
            shootout_winner: None,
        }
    }

    pub fn with_shootout(mut self, winner: BracketSlot) -> Self {
        self.shootout_winner = Some(winner);
        self
    }

    fn winning_slot(&self) -> Option<BracketSlot> {
        if self.home_score > self.away_score {
            Some(BracketSlot::Home)
        } else if self.away_score > self.home_score {
            Some(BracketSlot::Away)
        } else {
            self.shootout_winner
        }
    }
}

/// Turns a fixture into a score. Implemented by the match engine.
pub trait MatchSimulator {
    fn simulate(&mut self, fixture: &Fixture) -> MatchScore;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedResult {
    pub fixture_id: u32,
    pub winner: Option<u32>,
    pub advanced_to: Option<BracketLink>,
}

/// Fixture store walked day by day by the match simulator. Results are
/// written here and knockout winners are pushed into their next fixture.
#[derive(Debug, Clone, Default)]
pub struct FixtureBook {
    fixtures: BTreeMap<u32, Fixture>,
}

impl FixtureBook {
    pub fn new(fixtures: Vec<Fixture>) -> Self {
        FixtureBook {
            fixtures: fixtures.into_iter().map(|f| (f.id, f)).collect(),
        }
    }

    pub fn get(&self, fixture_id: u32) -> Option<&Fixture> {
        self.fixtures.get(&fixture_id)
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    pub fn fixtures_on(&self, date: NaiveDate) -> Vec<&Fixture> {
        self.fixtures.values().filter(|f| f.date == date).collect()
    }

    /// Unplayed fixtures on `date` with both participants known.
    pub fn playable_on(&self, date: NaiveDate) -> Vec<u32> {
        self.fixtures
            .values()
            .filter(|f| f.date == date && !f.played && f.is_ready())
            .map(|f| f.id)
            .collect()
    }

    pub fn play<S: MatchSimulator + ?Sized>(
        &mut self,
        fixture_id: u32,
        simulator: &mut S,
    ) -> Result<RecordedResult, SchedulingError> {
        let fixture = self
            .fixtures
            .get(&fixture_id)
            .ok_or(SchedulingError::FixtureNotFound(fixture_id))?;

        let score = simulator.simulate(fixture);

        self.record_result(fixture_id, score)
    }

    pub fn play_day<S: MatchSimulator + ?Sized>(
        &mut self,
        date: NaiveDate,
        simulator: &mut S,
    ) -> Result<Vec<RecordedResult>, SchedulingError> {
        self.playable_on(date)
            .into_iter()
            .map(|id| self.play(id, simulator))
            .collect()
    }

    pub fn record_result(
        &mut self,
        fixture_id: u32,
        score: MatchScore,
    ) -> Result<RecordedResult, SchedulingError> {
        let fixture = self
            .fixtures
            .get(&fixture_id)
            .ok_or(SchedulingError::FixtureNotFound(fixture_id))?;

        if fixture.played {
            return Err(SchedulingError::FixtureAlreadyPlayed(fixture_id));
        }

        let (home, away) = match (fixture.home_club_id, fixture.away_club_id) {
            (Some(home), Some(away)) => (home, away),
            _ => return Err(SchedulingError::FixtureNotReady(fixture_id)),
        };

        let winner = match score.winning_slot() {
            Some(BracketSlot::Home) => Some(home),
            Some(BracketSlot::Away) => Some(away),
            None if fixture.is_knockout => {
                return Err(SchedulingError::MissingKnockoutWinner(fixture_id));
            }
            None => None,
        };

        let link = fixture.next;

        if let Some(link) = link {
            if !self.fixtures.contains_key(&link.fixture_id) {
                return Err(SchedulingError::FixtureNotFound(link.fixture_id));
            }
        }

        if let Some(fixture) = self.fixtures.get_mut(&fixture_id) {
            fixture.home_score = score.home_score;
            fixture.away_score = score.away_score;
            fixture.played = true;
        }

        let advanced_to = match (link, winner) {
            (Some(link), Some(winner)) => {
                if let Some(next) = self.fixtures.get_mut(&link.fixture_id) {
                    next.set_participant(link.slot, winner);

                    debug!(
                        "club {} advances from fixture {} to fixture {} ({:?})",
                        winner, fixture_id, link.fixture_id, link.slot
                    );
                }
                Some(link)
            }
            _ => None,
        };

        Ok(RecordedResult {
            fixture_id,
            winner,
            advanced_to,
        })
    }

    pub fn into_fixtures(self) -> Vec<Fixture> {
        self.fixtures.into_values().collect()
    }
}
