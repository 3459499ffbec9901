use serde::{Deserialize, Serialize};

/// Rolling club reputation on the 0-100 scale used for pot placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubReputation {
    score: f32,
    momentum: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReputationLevel {
    Elite,
    Continental,
    National,
    Regional,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

impl ClubReputation {
    pub fn new(score: u8) -> Self {
        ClubReputation {
            score: score.min(100) as f32,
            momentum: 0.0,
        }
    }

    pub fn score(&self) -> u8 {
        self.score.round().clamp(0.0, 100.0) as u8
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    pub fn level(&self) -> ReputationLevel {
        match self.score {
            s if s >= 80.0 => ReputationLevel::Elite,
            s if s >= 65.0 => ReputationLevel::Continental,
            s if s >= 50.0 => ReputationLevel::National,
            s if s >= 30.0 => ReputationLevel::Regional,
            _ => ReputationLevel::Local,
        }
    }

    /// Beating a stronger opponent earns more than beating a weaker one.
    pub fn process_match(&mut self, outcome: MatchOutcome, opponent_reputation: u8) {
        let gap = (opponent_reputation as f32 - self.score) / 100.0;

        let change = match outcome {
            MatchOutcome::Win => 0.4 + gap.max(0.0) * 1.5,
            MatchOutcome::Draw => gap * 0.5,
            MatchOutcome::Loss => -0.4 + gap.min(0.0) * 1.5,
        };

        self.momentum = (self.momentum * 0.8 + change * 0.2).clamp(-1.0, 1.0);
        self.score = (self.score + change).clamp(0.0, 100.0);
    }

    /// Called monthly. High momentum suspends decay entirely.
    pub fn apply_monthly_decay(&mut self) {
        let decay_rate = match self.level() {
            ReputationLevel::Elite => 0.995,
            ReputationLevel::Continental => 0.993,
            ReputationLevel::National => 0.990,
            _ => 0.988,
        };

        if self.momentum < 0.0 {
            let adjusted = (decay_rate - self.momentum.abs() * 0.01).max(0.95);
            self.score *= adjusted;
        } else if self.momentum < 0.1 {
            self.score *= decay_rate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_follow_score() {
        assert_eq!(ClubReputation::new(90).level(), ReputationLevel::Elite);
        assert_eq!(ClubReputation::new(55).level(), ReputationLevel::National);
        assert_eq!(ClubReputation::new(10).level(), ReputationLevel::Local);
    }

    #[test]
    fn upset_win_is_worth_more() {
        let mut underdog = ClubReputation::new(40);
        let mut favourite = ClubReputation::new(40);

        underdog.process_match(MatchOutcome::Win, 90);
        favourite.process_match(MatchOutcome::Win, 20);

        assert!(underdog.score > favourite.score);
    }

    #[test]
    fn decay_without_momentum() {
        let mut rep = ClubReputation::new(70);
        rep.apply_monthly_decay();

        assert!(rep.score < 70.0);
    }

    #[test]
    fn no_decay_on_winning_run() {
        let mut rep = ClubReputation::new(60);
        for _ in 0..10 {
            rep.process_match(MatchOutcome::Win, 80);
        }

        let before = rep.score;
        rep.apply_monthly_decay();

        assert!(rep.momentum() >= 0.1);
        assert_eq!(rep.score, before);
    }
}
