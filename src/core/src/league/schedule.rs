use crate::error::SchedulingError;
use crate::schedule::Fixture;
use crate::shared::IdAllocator;
use chrono::NaiveDate;
use log::{debug, warn};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct LeagueSchedule {
    pub competition: String,
    pub fixtures: Vec<Fixture>,
    pub rounds_generated: usize,
    pub rounds_expected: usize,
}

impl LeagueSchedule {
    /// The date list ran out before every round was placed.
    pub fn is_truncated(&self) -> bool {
        self.rounds_generated < self.rounds_expected
    }
}

/// Double round robin using the circle method.
pub struct RoundRobinScheduler;

impl RoundRobinScheduler {
    pub fn generate(
        club_ids: &[u32],
        competition: &str,
        dates: &[NaiveDate],
        ids: &mut IdAllocator,
    ) -> Result<LeagueSchedule, SchedulingError> {
        let first_leg = Self::single_round_robin(club_ids)?;

        let second_leg: Vec<Vec<(u32, u32)>> = first_leg
            .iter()
            .map(|round| round.iter().map(|&(home, away)| (away, home)).collect())
            .collect();

        let rounds_expected = first_leg.len() * 2;

        let mut fixtures = Vec::with_capacity(club_ids.len() * (club_ids.len() - 1));
        let mut rounds_generated = 0;

        for (round, date) in first_leg.iter().chain(second_leg.iter()).zip(dates) {
            for &(home, away) in round {
                fixtures.push(Fixture::league(ids.allocate()?, home, away, *date, competition));
            }
            rounds_generated += 1;
        }

        if rounds_generated < rounds_expected {
            warn!(
                "schedule for {} truncated: {} of {} rounds fit into {} dates",
                competition,
                rounds_generated,
                rounds_expected,
                dates.len()
            );
        } else {
            debug!("schedule for {}: {} fixtures in {} rounds", competition, fixtures.len(), rounds_generated);
        }

        Ok(LeagueSchedule {
            competition: String::from(competition),
            fixtures,
            rounds_generated,
            rounds_expected,
        })
    }

    /// N-1 rounds of (home, away) pairs covering every pair exactly once.
    /// The first club stays fixed while the rest rotate one step per round.
    pub fn single_round_robin(club_ids: &[u32]) -> Result<Vec<Vec<(u32, u32)>>, SchedulingError> {
        let n = club_ids.len();

        if n < 2 {
            return Err(SchedulingError::NotEnoughParticipants { required: 2, found: n });
        }

        if n % 2 != 0 {
            return Err(SchedulingError::OddParticipantCount(n));
        }

        let mut seen = HashSet::with_capacity(n);
        for &id in club_ids {
            if !seen.insert(id) {
                return Err(SchedulingError::DuplicateClub(id));
            }
        }

        let fixed = club_ids[0];
        let mut rotating: Vec<u32> = club_ids[1..].to_vec();
        let len = rotating.len();

        let mut rounds = Vec::with_capacity(len);

        for round in 0..len {
            let flip = round % 2 == 1;
            let orient = |a: u32, b: u32| if flip { (b, a) } else { (a, b) };

            let mut pairs = Vec::with_capacity(n / 2);
            pairs.push(orient(fixed, rotating[0]));

            for i in 1..n / 2 {
                pairs.push(orient(rotating[i], rotating[len - i]));
            }

            rounds.push(pairs);
            rotating.rotate_right(1);
        }

        Ok(rounds)
    }
}
