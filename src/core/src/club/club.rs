use crate::club::ClubReputation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub id: u32,
    pub name: String,

    /// 0-100, drives pot placement and backfill order
    pub reputation: u8,

    pub budget: f64,
    pub wage_capacity: f64,

    /// Qualified for the continental competition through the domestic league
    pub continental: bool,
}

impl Club {
    pub fn new(id: u32, name: String, reputation: u8) -> Self {
        Club {
            id,
            name,
            reputation: reputation.min(100),
            budget: 0.0,
            wage_capacity: 0.0,
            continental: false,
        }
    }

    pub fn with_finances(mut self, budget: f64, wage_capacity: f64) -> Self {
        self.budget = budget;
        self.wage_capacity = wage_capacity;
        self
    }

    pub fn qualified(mut self) -> Self {
        self.continental = true;
        self
    }

    /// Takes over the tracked score so the next draw seeds by current form.
    pub fn refresh_reputation(&mut self, reputation: &ClubReputation) {
        self.reputation = reputation.score();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::MatchOutcome;

    #[test]
    fn reputation_is_capped() {
        let club = Club::new(1, String::from("Ajax"), 140);
        assert_eq!(club.reputation, 100);
    }

    #[test]
    fn builder_helpers_set_fields() {
        let club = Club::new(2, String::from("Porto"), 70)
            .with_finances(50_000_000.0, 900_000.0)
            .qualified();

        assert!(club.continental);
        assert_eq!(club.budget, 50_000_000.0);
        assert_eq!(club.wage_capacity, 900_000.0);
    }

    #[test]
    fn reputation_follows_the_tracker() {
        let mut club = Club::new(3, String::from("Celtic"), 60);
        let mut reputation = ClubReputation::new(club.reputation);

        for _ in 0..10 {
            reputation.process_match(MatchOutcome::Win, 90);
        }

        club.refresh_reputation(&reputation);

        assert!(club.reputation > 60);
        assert_eq!(club.reputation, reputation.score());
    }
}
