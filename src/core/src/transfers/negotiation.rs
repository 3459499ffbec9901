use crate::error::NegotiationError;
use crate::transfers::offer::{ContractOffer, TransferOffer};
use crate::transfers::valuation::AiValuation;
use chrono::{Duration, NaiveDate};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationStatus {
    Active,
    AgreedFee,
    Signed,
    Collapsed,
    Completed,
}

impl NegotiationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, NegotiationStatus::Collapsed | NegotiationStatus::Completed)
    }
}

impl Display for NegotiationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            NegotiationStatus::Active => "active",
            NegotiationStatus::AgreedFee => "agreed_fee",
            NegotiationStatus::Signed => "signed",
            NegotiationStatus::Collapsed => "collapsed",
            NegotiationStatus::Completed => "completed",
        };

        f.write_str(name)
    }
}

/// Stages only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationStage {
    ClubFee,
    Contract,
    Medical,
}

impl Display for NegotiationStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            NegotiationStage::ClubFee => "club_fee",
            NegotiationStage::Contract => "contract",
            NegotiationStage::Medical => "medical",
        };

        f.write_str(name)
    }
}

/// Outcome of scoring one offer. `status` is what the offer earned, before
/// it is applied to the negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OfferEvaluation {
    pub quality: f64,
    pub patience_hit: u8,
    pub status: NegotiationStatus,
}

#[derive(Debug, Clone)]
pub struct NegotiationTurn {
    pub negotiation: Negotiation,
    pub evaluation: OfferEvaluation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Negotiation {
    pub id: u32,
    pub player_id: u32,
    pub selling_club_id: u32,
    pub buying_club_id: u32,
    pub status: NegotiationStatus,
    pub stage: NegotiationStage,
    pub latest_offer: Option<TransferOffer>,
    pub latest_contract_offer: Option<ContractOffer>,
    pub ai_valuation: AiValuation,
    pub last_updated: NaiveDate,
    pub next_response_date: NaiveDate,
}

impl Negotiation {
    pub const FULL_PATIENCE: u8 = 100;

    pub fn new(
        id: u32,
        player_id: u32,
        selling_club_id: u32,
        buying_club_id: u32,
        ai_valuation: AiValuation,
        created_date: NaiveDate,
    ) -> Self {
        Negotiation {
            id,
            player_id,
            selling_club_id,
            buying_club_id,
            status: NegotiationStatus::Active,
            stage: NegotiationStage::ClubFee,
            latest_offer: None,
            latest_contract_offer: None,
            ai_valuation,
            last_updated: created_date,
            next_response_date: created_date,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn evaluate_fee(&self, offer: &TransferOffer) -> OfferEvaluation {
        let min_fee = self.ai_valuation.min_fee;
        let total = offer.total_value(min_fee);

        let quality = if min_fee > 0.0 { total / min_fee } else { 1.0 };

        let patience_hit = match quality {
            q if q < 0.5 => 25,
            q if q < 0.8 => 10,
            q if q < 1.0 => 5,
            _ => 0,
        };

        let status = if quality >= 1.0 {
            NegotiationStatus::AgreedFee
        } else if self.ai_valuation.patience <= patience_hit {
            NegotiationStatus::Collapsed
        } else {
            NegotiationStatus::Active
        };

        OfferEvaluation {
            quality,
            patience_hit,
            status,
        }
    }

    pub fn evaluate_contract(&self, offer: &ContractOffer) -> OfferEvaluation {
        let demanded_wage = self.ai_valuation.demanded_wage;

        let (wage_quality, bonus_credit) = if demanded_wage > 0.0 {
            (
                offer.wage / demanded_wage,
                offer.signing_bonus / (demanded_wage * 52.0 * 0.5) * 0.1,
            )
        } else {
            (1.0, 0.0)
        };

        let role_gap = self.ai_valuation.demanded_role.index().saturating_sub(offer.role.index());
        let role_penalty = 0.2 * role_gap as f64;

        let quality = wage_quality - role_penalty + bonus_credit;

        let patience_hit = match quality {
            q if q < 0.6 => 20,
            q if q < 0.9 => 10,
            q if q < 1.0 => 5,
            _ => 0,
        };

        let status = if quality >= 1.0 {
            NegotiationStatus::Signed
        } else if self.ai_valuation.agent_patience <= patience_hit {
            NegotiationStatus::Collapsed
        } else {
            NegotiationStatus::AgreedFee
        };

        OfferEvaluation {
            quality,
            patience_hit,
            status,
        }
    }

    pub fn submit_fee_offer(
        &self,
        offer: TransferOffer,
        today: NaiveDate,
        response_delay_days: i64,
    ) -> Result<NegotiationTurn, NegotiationError> {
        self.ensure_accepting(NegotiationStage::ClubFee, today)?;

        let evaluation = self.evaluate_fee(&offer);

        let mut next = self.responded(today, response_delay_days);
        next.latest_offer = Some(offer);
        next.ai_valuation.patience = next.ai_valuation.patience.saturating_sub(evaluation.patience_hit);
        next.status = evaluation.status;

        if evaluation.status == NegotiationStatus::AgreedFee {
            next.stage = NegotiationStage::Contract;
            next.ai_valuation.agent_patience = Self::FULL_PATIENCE;

            info!("negotiation {}: fee agreed (quality {:.2})", self.id, evaluation.quality);
        } else {
            debug!(
                "negotiation {}: fee offer quality {:.2}, patience {} -> {}",
                self.id, evaluation.quality, self.ai_valuation.patience, next.ai_valuation.patience
            );
        }

        Ok(NegotiationTurn {
            negotiation: next,
            evaluation,
        })
    }

    pub fn submit_contract_offer(
        &self,
        offer: ContractOffer,
        today: NaiveDate,
        response_delay_days: i64,
    ) -> Result<NegotiationTurn, NegotiationError> {
        self.ensure_accepting(NegotiationStage::Contract, today)?;

        let evaluation = self.evaluate_contract(&offer);

        let mut next = self.responded(today, response_delay_days);
        next.latest_contract_offer = Some(offer);
        next.ai_valuation.agent_patience = next
            .ai_valuation
            .agent_patience
            .saturating_sub(evaluation.patience_hit);

        next.status = match evaluation.status {
            NegotiationStatus::Signed => {
                next.stage = NegotiationStage::Medical;

                info!("negotiation {}: contract signed (quality {:.2})", self.id, evaluation.quality);

                NegotiationStatus::Completed
            }
            status => {
                debug!(
                    "negotiation {}: contract offer quality {:.2}, agent patience {} -> {}",
                    self.id, evaluation.quality, self.ai_valuation.agent_patience, next.ai_valuation.agent_patience
                );

                status
            }
        };

        Ok(NegotiationTurn {
            negotiation: next,
            evaluation,
        })
    }

    fn ensure_accepting(&self, stage: NegotiationStage, today: NaiveDate) -> Result<(), NegotiationError> {
        if !self.is_open() {
            return Err(NegotiationError::Closed {
                id: self.id,
                status: self.status.to_string(),
            });
        }

        if self.stage != stage {
            return Err(NegotiationError::WrongStage {
                id: self.id,
                expected: stage.to_string(),
                actual: self.stage.to_string(),
            });
        }

        if today < self.next_response_date {
            return Err(NegotiationError::AwaitingResponse {
                id: self.id,
                until: self.next_response_date,
            });
        }

        Ok(())
    }

    fn responded(&self, today: NaiveDate, response_delay_days: i64) -> Negotiation {
        let mut next = self.clone();

        next.last_updated = today;
        next.next_response_date = today
            .checked_add_signed(Duration::days(response_delay_days))
            .unwrap_or(today);

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::club::PlayerSquadRole;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    fn valuation() -> AiValuation {
        AiValuation {
            min_fee: 55_000_000.0,
            patience: 100,
            demanded_wage: 100_000.0,
            demanded_role: PlayerSquadRole::Key,
            agent_patience: 100,
        }
    }

    fn negotiation() -> Negotiation {
        Negotiation::new(1, 10, 2, 3, valuation(), today())
    }

    fn agreed() -> Negotiation {
        negotiation()
            .submit_fee_offer(TransferOffer::new(55_000_000.0), today(), 1)
            .unwrap()
            .negotiation
    }

    #[test]
    fn offer_at_minimum_fee_is_agreed() {
        let turn = negotiation()
            .submit_fee_offer(TransferOffer::new(55_000_000.0), today(), 1)
            .unwrap();

        assert_eq!(turn.evaluation.quality, 1.0);
        assert_eq!(turn.evaluation.patience_hit, 0);
        assert_eq!(turn.evaluation.status, NegotiationStatus::AgreedFee);

        let n = turn.negotiation;
        assert_eq!(n.status, NegotiationStatus::AgreedFee);
        assert_eq!(n.stage, NegotiationStage::Contract);
        assert_eq!(n.ai_valuation.agent_patience, 100);
        assert_eq!(n.next_response_date, NaiveDate::from_ymd_opt(2025, 7, 2).unwrap());
    }

    #[test]
    fn lowball_offer_costs_patience() {
        let original = negotiation();
        let turn = original
            .submit_fee_offer(TransferOffer::new(20_000_000.0), today(), 1)
            .unwrap();

        assert!((turn.evaluation.quality - 0.3636).abs() < 1e-3);
        assert_eq!(turn.evaluation.patience_hit, 25);
        assert_eq!(turn.negotiation.status, NegotiationStatus::Active);
        assert_eq!(turn.negotiation.stage, NegotiationStage::ClubFee);
        assert_eq!(turn.negotiation.ai_valuation.patience, 75);

        // The original record is untouched.
        assert_eq!(original, negotiation());
    }

    #[test]
    fn fee_quality_grows_with_fee() {
        let n = negotiation();

        let qualities: Vec<f64> = (0..=80)
            .map(|m| n.evaluate_fee(&TransferOffer::new(m as f64 * 1_000_000.0)).quality)
            .collect();

        assert!(qualities.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn installments_and_sell_on_close_the_gap() {
        let offer = TransferOffer::new(45_000_000.0)
            .with_installments(5_000_000.0)
            .with_sell_on_clause(20.0);

        // 45M + 4.5M + 5.5M
        let evaluation = negotiation().evaluate_fee(&offer);

        assert!((evaluation.quality - 1.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_lowballs_collapse_the_talks() {
        let mut n = negotiation();
        let mut day = today();

        for _ in 0..3 {
            n = n.submit_fee_offer(TransferOffer::new(10_000_000.0), day, 1).unwrap().negotiation;
            day = n.next_response_date;
            assert_eq!(n.status, NegotiationStatus::Active);
        }

        let last = n.submit_fee_offer(TransferOffer::new(10_000_000.0), day, 1).unwrap();

        assert_eq!(last.evaluation.status, NegotiationStatus::Collapsed);
        assert_eq!(last.negotiation.ai_valuation.patience, 0);
        assert!(!last.negotiation.is_open());
    }

    #[test]
    fn low_wage_offers_exhaust_the_agent() {
        let mut n = agreed();
        let offer = ContractOffer::new(10_000.0, 4, PlayerSquadRole::Key);

        for expected in [80, 60, 40, 20] {
            let turn = n.submit_contract_offer(offer.clone(), n.next_response_date, 1).unwrap();

            assert_eq!(turn.evaluation.patience_hit, 20);
            assert_eq!(turn.negotiation.status, NegotiationStatus::AgreedFee);
            assert_eq!(turn.negotiation.ai_valuation.agent_patience, expected);
            n = turn.negotiation;
        }

        let last = n.submit_contract_offer(offer, n.next_response_date, 1).unwrap();

        assert_eq!(last.evaluation.status, NegotiationStatus::Collapsed);
        assert_eq!(last.negotiation.status, NegotiationStatus::Collapsed);
        assert_eq!(last.negotiation.ai_valuation.agent_patience, 0);
        assert_eq!(last.negotiation.stage, NegotiationStage::Contract);
        assert!(!last.negotiation.is_open());
    }

    #[test]
    fn contract_meeting_demands_completes_the_deal() {
        let n = agreed();
        let day = n.next_response_date;

        let turn = n
            .submit_contract_offer(ContractOffer::new(100_000.0, 4, PlayerSquadRole::Key), day, 1)
            .unwrap();

        assert_eq!(turn.evaluation.status, NegotiationStatus::Signed);
        assert_eq!(turn.negotiation.status, NegotiationStatus::Completed);
        assert_eq!(turn.negotiation.stage, NegotiationStage::Medical);
    }

    #[test]
    fn role_penalty_and_signing_bonus() {
        let n = agreed();

        let demoted = n.evaluate_contract(&ContractOffer::new(100_000.0, 4, PlayerSquadRole::Important));
        assert!((demoted.quality - 0.8).abs() < 1e-9);
        assert_eq!(demoted.patience_hit, 10);
        assert_eq!(demoted.status, NegotiationStatus::AgreedFee);

        // bonus of half a year's demanded wage adds 0.1
        let sweetened = n.evaluate_contract(
            &ContractOffer::new(90_000.0, 4, PlayerSquadRole::Star).with_signing_bonus(2_600_000.0),
        );
        assert!((sweetened.quality - 1.0).abs() < 1e-9);
    }

    #[test]
    fn stage_and_timing_are_enforced() {
        let n = negotiation();

        assert_eq!(
            n.submit_contract_offer(ContractOffer::new(1.0, 1, PlayerSquadRole::Key), today(), 1)
                .unwrap_err(),
            NegotiationError::WrongStage {
                id: 1,
                expected: String::from("contract"),
                actual: String::from("club_fee"),
            }
        );

        let waiting = n
            .submit_fee_offer(TransferOffer::new(30_000_000.0), today(), 1)
            .unwrap()
            .negotiation;

        assert_eq!(
            waiting.submit_fee_offer(TransferOffer::new(30_000_000.0), today(), 1).unwrap_err(),
            NegotiationError::AwaitingResponse {
                id: 1,
                until: NaiveDate::from_ymd_opt(2025, 7, 2).unwrap(),
            }
        );
    }

    #[test]
    fn terminal_states_are_never_left() {
        let mut n = negotiation();
        n.status = NegotiationStatus::Collapsed;

        assert!(matches!(
            n.submit_fee_offer(TransferOffer::new(90_000_000.0), today(), 1),
            Err(NegotiationError::Closed { .. })
        ));

        let n = agreed();
        let done = n
            .submit_contract_offer(ContractOffer::new(200_000.0, 5, PlayerSquadRole::Star), n.next_response_date, 1)
            .unwrap()
            .negotiation;

        assert!(done.status.is_terminal());
        assert!(matches!(
            done.submit_contract_offer(ContractOffer::new(200_000.0, 5, PlayerSquadRole::Star), done.next_response_date, 1),
            Err(NegotiationError::Closed { .. })
        ));
    }

    #[test]
    fn stage_never_regresses_over_a_negotiation() {
        let offers = [10.0, 40.0, 52.0, 56.0];
        let mut n = negotiation();
        let mut stages = vec![n.stage];

        for fee in offers {
            if n.stage != NegotiationStage::ClubFee {
                break;
            }
            n = n
                .submit_fee_offer(TransferOffer::new(fee * 1_000_000.0), n.next_response_date, 1)
                .unwrap()
                .negotiation;
            stages.push(n.stage);
        }

        for wage in [50_000.0, 95_000.0, 101_000.0] {
            if n.stage != NegotiationStage::Contract {
                break;
            }
            n = n
                .submit_contract_offer(ContractOffer::new(wage, 3, PlayerSquadRole::Key), n.next_response_date, 1)
                .unwrap()
                .negotiation;
            stages.push(n.stage);
        }

        assert!(stages.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(n.status, NegotiationStatus::Completed);
    }

    #[test]
    fn negotiation_persists_verbatim() {
        let n = agreed();

        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains("\"status\":\"agreed_fee\""));
        assert!(json.contains("\"stage\":\"contract\""));

        let restored: Negotiation = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, n);
    }
}
