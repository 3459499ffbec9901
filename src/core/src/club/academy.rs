use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Yearly youth intake. Produces the size and quality band of the next
/// intake; generating the players themselves happens outside the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouthIntake {
    /// Academy facilities level, 1-20
    level: u8,
    intake_month: u32,
    last_intake_year: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeProfile {
    pub players: u8,
    /// Highest potential ability a graduate can have, 0-200
    pub potential_ceiling: u8,
}

impl YouthIntake {
    pub fn new(level: u8) -> Self {
        YouthIntake {
            level: level.clamp(1, 20),
            intake_month: 3,
            last_intake_year: None,
        }
    }

    pub fn is_due(&self, date: NaiveDate) -> bool {
        date.month() == self.intake_month && self.last_intake_year != Some(date.year())
    }

    pub fn profile(&self, club_reputation: u8) -> IntakeProfile {
        let players = match self.level {
            1..=5 => 3,
            6..=10 => 5,
            11..=15 => 7,
            _ => 9,
        };

        let ceiling = 60 + self.level as u16 * 5 + club_reputation.min(100) as u16 / 2;

        IntakeProfile {
            players,
            potential_ceiling: ceiling.min(200) as u8,
        }
    }

    /// Returns the intake once per season, on the first call in the intake month.
    pub fn process(&mut self, date: NaiveDate, club_reputation: u8) -> Option<IntakeProfile> {
        if !self.is_due(date) {
            return None;
        }

        self.last_intake_year = Some(date.year());

        Some(self.profile(club_reputation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn intake_happens_once_a_year() {
        let mut intake = YouthIntake::new(12);

        assert!(intake.process(date(2025, 2, 1), 50).is_none());
        assert!(intake.process(date(2025, 3, 1), 50).is_some());
        assert!(intake.process(date(2025, 3, 2), 50).is_none());
        assert!(intake.process(date(2026, 3, 1), 50).is_some());
    }

    #[test]
    fn better_academies_produce_more() {
        let small = YouthIntake::new(2).profile(40);
        let large = YouthIntake::new(18).profile(40);

        assert!(large.players > small.players);
        assert!(large.potential_ceiling > small.potential_ceiling);
    }
}
