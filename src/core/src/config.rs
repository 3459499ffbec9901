use crate::error::ConfigError;
use serde::Deserialize;
use std::ops::Range;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    pub scheduling: SchedulingSettings,
    pub negotiation: NegotiationSettings,
}

impl SimulatorSettings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: SimulatorSettings = serde_json::from_str(json)?;

        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scheduling.validate()?;
        self.negotiation.validate()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulingSettings {
    pub pots_count: usize,
    pub pot_size: usize,
    pub match_days: usize,
    /// Restarts of the match day search, each with a fresh shuffle. Also the
    /// number of greedy runs when no search finishes.
    pub placement_attempts: usize,
}

impl SchedulingSettings {
    pub fn participants_count(&self) -> usize {
        self.pots_count * self.pot_size
    }

    /// Each club meets two opponents from every pot.
    pub fn pairings_count(&self) -> usize {
        self.participants_count() * self.pots_count
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pots_count < 2 {
            return Err(ConfigError::Invalid {
                name: "scheduling.pots_count",
                reason: format!("need at least 2 pots, got {}", self.pots_count),
            });
        }

        // The intra-pot cycle needs three distinct clubs per pot.
        if self.pot_size < 3 {
            return Err(ConfigError::Invalid {
                name: "scheduling.pot_size",
                reason: format!("need at least 3 clubs per pot, got {}", self.pot_size),
            });
        }

        if self.match_days < self.pots_count * 2 {
            return Err(ConfigError::Invalid {
                name: "scheduling.match_days",
                reason: format!(
                    "{} match days cannot hold {} games per club",
                    self.match_days,
                    self.pots_count * 2
                ),
            });
        }

        // One bit per day in the placement masks.
        if self.match_days > 64 {
            return Err(ConfigError::Invalid {
                name: "scheduling.match_days",
                reason: format!("at most 64 match days, got {}", self.match_days),
            });
        }

        if self.placement_attempts == 0 {
            return Err(ConfigError::Invalid {
                name: "scheduling.placement_attempts",
                reason: String::from("must be positive"),
            });
        }

        Ok(())
    }
}

impl Default for SchedulingSettings {
    fn default() -> Self {
        SchedulingSettings {
            pots_count: 4,
            pot_size: 9,
            match_days: 8,
            placement_attempts: 16,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NegotiationSettings {
    pub response_delay_days: i64,
    pub initial_patience: u8,
    /// Added on top of the true value: `min_fee = value * (1 + markup)`.
    pub fee_markup: Range<f64>,
    /// Multiplier on the current salary: `demanded_wage = salary * markup`.
    pub wage_markup: Range<f64>,
}

impl NegotiationSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.response_delay_days < 0 {
            return Err(ConfigError::Invalid {
                name: "negotiation.response_delay_days",
                reason: format!("must not be negative, got {}", self.response_delay_days),
            });
        }

        if self.initial_patience == 0 || self.initial_patience > 100 {
            return Err(ConfigError::Invalid {
                name: "negotiation.initial_patience",
                reason: format!("must be within 1..=100, got {}", self.initial_patience),
            });
        }

        if self.fee_markup.start < 0.0 || self.fee_markup.is_empty() {
            return Err(ConfigError::Invalid {
                name: "negotiation.fee_markup",
                reason: format!("{:?} is not a valid range", self.fee_markup),
            });
        }

        if self.wage_markup.start <= 0.0 || self.wage_markup.is_empty() {
            return Err(ConfigError::Invalid {
                name: "negotiation.wage_markup",
                reason: format!("{:?} is not a valid range", self.wage_markup),
            });
        }

        Ok(())
    }
}

impl Default for NegotiationSettings {
    fn default() -> Self {
        NegotiationSettings {
            response_delay_days: 1,
            initial_patience: 100,
            fee_markup: 0.0..0.2,
            wage_markup: 1.2..1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_36_club_swiss_stage() {
        let settings = SimulatorSettings::default();

        assert_eq!(settings.scheduling.participants_count(), 36);
        assert_eq!(settings.scheduling.pairings_count(), 144);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings =
            SimulatorSettings::from_json(r#"{ "negotiation": { "response_delay_days": 3 } }"#)
                .unwrap();

        assert_eq!(settings.negotiation.response_delay_days, 3);
        assert_eq!(settings.negotiation.initial_patience, 100);
        assert_eq!(settings.scheduling.match_days, 8);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let result = SimulatorSettings::from_json(r#"{ "scheduling": { "match_days": 5 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        let result = SimulatorSettings::from_json(r#"{ "scheduling": { "match_days": 65 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid { name: "scheduling.match_days", .. })));

        let empty_markup = r#"{ "negotiation": { "fee_markup": { "start": 0.2, "end": 0.2 } } }"#;
        let result = SimulatorSettings::from_json(empty_markup);
        assert!(matches!(result, Err(ConfigError::Invalid { name: "negotiation.fee_markup", .. })));

        let result = SimulatorSettings::from_json("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
