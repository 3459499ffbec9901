use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSlot {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureRound {
    MatchDay(u8),
    RoundOf16,
    QuarterFinal,
    SemiFinal,
    Final,
}

impl Display for FixtureRound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FixtureRound::MatchDay(day) => write!(f, "match day {}", day),
            FixtureRound::RoundOf16 => f.write_str("round of 16"),
            FixtureRound::QuarterFinal => f.write_str("quarter-final"),
            FixtureRound::SemiFinal => f.write_str("semi-final"),
            FixtureRound::Final => f.write_str("final"),
        }
    }
}

/// Forward link from a knockout fixture to the fixture its winner plays next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BracketLink {
    pub fixture_id: u32,
    pub slot: BracketSlot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u32,
    pub home_club_id: Option<u32>,
    pub away_club_id: Option<u32>,
    pub date: NaiveDate,
    pub competition: String,
    pub is_knockout: bool,
    /// None for domestic league fixtures
    pub round: Option<FixtureRound>,
    pub next: Option<BracketLink>,
    pub played: bool,
    pub home_score: u8,
    pub away_score: u8,
}

impl Fixture {
    pub fn league(id: u32, home: u32, away: u32, date: NaiveDate, competition: &str) -> Self {
        Fixture {
            id,
            home_club_id: Some(home),
            away_club_id: Some(away),
            date,
            competition: String::from(competition),
            is_knockout: false,
            round: None,
            next: None,
            played: false,
            home_score: 0,
            away_score: 0,
        }
    }

    pub fn match_day(id: u32, home: u32, away: u32, date: NaiveDate, competition: &str, day: u8) -> Self {
        Fixture {
            round: Some(FixtureRound::MatchDay(day)),
            ..Self::league(id, home, away, date, competition)
        }
    }

    /// Knockout fixture with participants resolved later through bracket links.
    pub fn knockout(id: u32, date: NaiveDate, competition: &str, round: FixtureRound) -> Self {
        Fixture {
            id,
            home_club_id: None,
            away_club_id: None,
            date,
            competition: String::from(competition),
            is_knockout: true,
            round: Some(round),
            next: None,
            played: false,
            home_score: 0,
            away_score: 0,
        }
    }

    pub fn with_participants(mut self, home: u32, away: u32) -> Self {
        self.home_club_id = Some(home);
        self.away_club_id = Some(away);
        self
    }

    pub fn linked_to(mut self, fixture_id: u32, slot: BracketSlot) -> Self {
        self.next = Some(BracketLink { fixture_id, slot });
        self
    }

    pub fn is_ready(&self) -> bool {
        self.home_club_id.is_some() && self.away_club_id.is_some()
    }

    pub fn involves(&self, club_id: u32) -> bool {
        self.home_club_id == Some(club_id) || self.away_club_id == Some(club_id)
    }

    pub fn set_participant(&mut self, slot: BracketSlot, club_id: u32) {
        match slot {
            BracketSlot::Home => self.home_club_id = Some(club_id),
            BracketSlot::Away => self.away_club_id = Some(club_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 16).unwrap()
    }

    #[test]
    fn league_fixture_has_no_round() {
        let fixture = Fixture::league(1, 10, 20, date(), "Premier League");

        assert!(fixture.round.is_none());
        assert!(!fixture.is_knockout);
        assert!(fixture.is_ready());
        assert!(fixture.involves(20));
    }

    #[test]
    fn knockout_fixture_fills_slots() {
        let mut fixture = Fixture::knockout(5, date(), "Cup", FixtureRound::Final);
        assert!(!fixture.is_ready());

        fixture.set_participant(BracketSlot::Away, 3);
        fixture.set_participant(BracketSlot::Home, 4);

        assert!(fixture.is_ready());
        assert_eq!(fixture.home_club_id, Some(4));
        assert_eq!(FixtureRound::MatchDay(3).to_string(), "match day 3");
    }
}
