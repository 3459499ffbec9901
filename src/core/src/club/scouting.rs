use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const MAX_KNOWLEDGE: f32 = 100.0;

/// What a club knows about players it has watched. Knowledge grows with
/// scouting days, fades when a player is no longer followed, and controls how
/// precisely the club can estimate a player's value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoutingKnowledge {
    knowledge: HashMap<u32, f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueEstimate {
    pub low: f64,
    pub high: f64,
}

impl ValueEstimate {
    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

impl ScoutingKnowledge {
    pub fn new() -> Self {
        Self::default()
    }

    /// `judging` is the scout's 1-20 judging ability.
    pub fn observe(&mut self, player_id: u32, judging: u8) {
        let gain = 4.0 + judging.min(20) as f32 * 0.6;
        let entry = self.knowledge.entry(player_id).or_insert(0.0);

        *entry = (*entry + gain).min(MAX_KNOWLEDGE);
    }

    pub fn apply_monthly_decay(&mut self) {
        for value in self.knowledge.values_mut() {
            *value *= 0.9;
        }

        self.knowledge.retain(|_, value| *value >= 1.0);
    }

    pub fn knowledge_of(&self, player_id: u32) -> u8 {
        self.knowledge
            .get(&player_id)
            .map(|k| k.round() as u8)
            .unwrap_or(0)
    }

    pub fn is_visible(&self, player_id: u32) -> bool {
        self.knowledge_of(player_id) > 0
    }

    /// Band around the true value: +/-50% when unknown, exact at full knowledge.
    pub fn estimate_value(&self, player_id: u32, true_value: f64) -> ValueEstimate {
        let knowledge = self.knowledge.get(&player_id).copied().unwrap_or(0.0);
        let spread = 0.5 * (1.0 - (knowledge / MAX_KNOWLEDGE) as f64);

        ValueEstimate {
            low: true_value * (1.0 - spread),
            high: true_value * (1.0 + spread),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_accrues_and_caps() {
        let mut scouting = ScoutingKnowledge::new();
        assert!(!scouting.is_visible(7));

        for _ in 0..20 {
            scouting.observe(7, 15);
        }

        assert!(scouting.is_visible(7));
        assert_eq!(scouting.knowledge_of(7), 100);
    }

    #[test]
    fn estimate_narrows_with_knowledge() {
        let mut scouting = ScoutingKnowledge::new();
        let unknown = scouting.estimate_value(3, 10_000_000.0);

        scouting.observe(3, 20);
        let known = scouting.estimate_value(3, 10_000_000.0);

        assert!(known.high - known.low < unknown.high - unknown.low);
        assert!(known.contains(10_000_000.0));
        assert_eq!(unknown.midpoint(), 10_000_000.0);
    }

    #[test]
    fn forgotten_players_drop_out() {
        let mut scouting = ScoutingKnowledge::new();
        scouting.observe(9, 1);

        for _ in 0..30 {
            scouting.apply_monthly_decay();
        }

        assert!(!scouting.is_visible(9));
    }
}
