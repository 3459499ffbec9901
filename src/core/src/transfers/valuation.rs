use crate::club::{Player, PlayerSquadRole};
use crate::config::NegotiationSettings;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Source of a player's true value, consulted once when a negotiation opens.
pub trait PlayerValuation {
    fn true_value(&self, player: &Player) -> f64;
}

/// Takes the market value at face value.
pub struct MarketValueValuation;

impl PlayerValuation for MarketValueValuation {
    fn true_value(&self, player: &Player) -> f64 {
        player.market_value
    }
}

/// What the selling club and the agent will settle for. Fixed at creation,
/// only the two patience counters move afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiValuation {
    pub min_fee: f64,
    /// Selling club patience, 0-100
    pub patience: u8,
    /// Weekly wage
    pub demanded_wage: f64,
    pub demanded_role: PlayerSquadRole,
    /// Agent patience, 0-100
    pub agent_patience: u8,
}

impl AiValuation {
    /// Both markup ranges must be non-empty, which `NegotiationSettings::validate` checks.
    pub fn generate<R: Rng + ?Sized>(
        true_value: f64,
        player: &Player,
        settings: &NegotiationSettings,
        rng: &mut R,
    ) -> Self {
        let fee_markup = rng.gen_range(settings.fee_markup.clone());
        let wage_markup = rng.gen_range(settings.wage_markup.clone());

        Self::with_markups(true_value, player, fee_markup, wage_markup, settings.initial_patience)
    }

    pub fn with_markups(
        true_value: f64,
        player: &Player,
        fee_markup: f64,
        wage_markup: f64,
        patience: u8,
    ) -> Self {
        AiValuation {
            min_fee: true_value * (1.0 + fee_markup),
            patience,
            demanded_wage: player.current_salary * wage_markup,
            demanded_role: player.squad_role,
            agent_patience: patience,
        }
    }
}
