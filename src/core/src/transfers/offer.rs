use crate::club::PlayerSquadRole;
use serde::{Deserialize, Serialize};

/// Club-to-club fee proposal. Amounts are in the base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferOffer {
    pub fee: f64,
    /// Deferred part of the fee, valued at 90% of face value
    pub installments: f64,
    /// Share of a future sale, in percent
    pub sell_on_clause_pct: f32,
}

impl TransferOffer {
    pub fn new(fee: f64) -> Self {
        TransferOffer {
            fee,
            installments: 0.0,
            sell_on_clause_pct: 0.0,
        }
    }

    pub fn with_installments(mut self, installments: f64) -> Self {
        self.installments = installments;
        self
    }

    pub fn with_sell_on_clause(mut self, pct: f32) -> Self {
        self.sell_on_clause_pct = pct;
        self
    }

    /// Value the selling club credits for this offer against its asking fee.
    pub fn total_value(&self, min_fee: f64) -> f64 {
        let sell_on = min_fee * self.sell_on_clause_pct as f64 / 100.0 * 0.5;

        self.fee + self.installments * 0.9 + sell_on
    }
}

/// Personal terms put to the player's agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractOffer {
    /// Weekly wage
    pub wage: f64,
    /// Years
    pub duration: u8,
    pub signing_bonus: f64,
    pub role: PlayerSquadRole,
    pub release_clause: Option<f64>,
    pub performance_bonus: Option<f64>,
    /// Percent per year
    pub yearly_wage_rise: Option<f32>,
}

impl ContractOffer {
    pub fn new(wage: f64, duration: u8, role: PlayerSquadRole) -> Self {
        ContractOffer {
            wage,
            duration,
            signing_bonus: 0.0,
            role,
            release_clause: None,
            performance_bonus: None,
            yearly_wage_rise: None,
        }
    }

    pub fn with_signing_bonus(mut self, bonus: f64) -> Self {
        self.signing_bonus = bonus;
        self
    }

    pub fn with_release_clause(mut self, amount: f64) -> Self {
        self.release_clause = Some(amount);
        self
    }

    pub fn with_performance_bonus(mut self, amount: f64) -> Self {
        self.performance_bonus = Some(amount);
        self
    }

    pub fn with_yearly_wage_rise(mut self, pct: f32) -> Self {
        self.yearly_wage_rise = Some(pct);
        self
    }

    /// Guaranteed cost over the whole contract, bonus included.
    pub fn total_cost(&self) -> f64 {
        let rise = 1.0 + self.yearly_wage_rise.unwrap_or(0.0) as f64 / 100.0;

        let wages: f64 = (0..self.duration)
            .map(|year| self.wage * 52.0 * rise.powi(year as i32))
            .sum();

        wages + self.signing_bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installments_and_sell_on_count_towards_value() {
        let offer = TransferOffer::new(40_000_000.0)
            .with_installments(10_000_000.0)
            .with_sell_on_clause(20.0);

        // 40M + 9M + 50M * 0.2 * 0.5
        assert!((offer.total_value(50_000_000.0) - 54_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn contract_cost_includes_wage_rise() {
        let flat = ContractOffer::new(1_000.0, 2, PlayerSquadRole::Key).with_signing_bonus(500.0);
        assert!((flat.total_cost() - 104_500.0).abs() < 1e-6);

        let rising = ContractOffer::new(1_000.0, 2, PlayerSquadRole::Key).with_yearly_wage_rise(10.0);
        assert!((rising.total_cost() - (52_000.0 + 57_200.0)).abs() < 1e-6);
    }
}
