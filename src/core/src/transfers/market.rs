use crate::club::{Club, Player, ScoutingKnowledge};
use crate::config::NegotiationSettings;
use crate::error::{ConfigError, NegotiationError};
use crate::shared::IdAllocator;
use crate::transfers::dialogue::NegotiationResponse;
use crate::transfers::negotiation::{
    Negotiation, NegotiationStage, NegotiationStatus, NegotiationTurn, OfferEvaluation,
};
use crate::transfers::offer::{ContractOffer, TransferOffer};
use crate::transfers::valuation::{AiValuation, PlayerValuation};
use crate::transfers::CompletedTransfer;
use chrono::NaiveDate;
use log::{debug, info};
use rand::Rng;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// Read access to the players and clubs a negotiation refers to.
pub trait TransferDirectory {
    fn player(&self, player_id: u32) -> Option<&Player>;
    fn club(&self, club_id: u32) -> Option<&Club>;

    /// What the club's scouts know. A club without a scouting record may
    /// approach any player.
    fn scouting(&self, _club_id: u32) -> Option<&ScoutingKnowledge> {
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorldDirectory {
    players: HashMap<u32, Player>,
    clubs: HashMap<u32, Club>,
    scouting: HashMap<u32, ScoutingKnowledge>,
}

impl WorldDirectory {
    pub fn new(players: Vec<Player>, clubs: Vec<Club>) -> Self {
        WorldDirectory {
            players: players.into_iter().map(|p| (p.id, p)).collect(),
            clubs: clubs.into_iter().map(|c| (c.id, c)).collect(),
            scouting: HashMap::new(),
        }
    }

    pub fn with_scouting(mut self, club_id: u32, knowledge: ScoutingKnowledge) -> Self {
        self.scouting.insert(club_id, knowledge);
        self
    }
}

impl TransferDirectory for WorldDirectory {
    fn player(&self, player_id: u32) -> Option<&Player> {
        self.players.get(&player_id)
    }

    fn club(&self, club_id: u32) -> Option<&Club> {
        self.clubs.get(&club_id)
    }

    fn scouting(&self, club_id: u32) -> Option<&ScoutingKnowledge> {
        self.scouting.get(&club_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproachOutcome {
    Opened(u32),
    /// The buyer already negotiates for this player
    AlreadyOpen(u32),
}

impl ApproachOutcome {
    pub fn negotiation_id(&self) -> u32 {
        match self {
            ApproachOutcome::Opened(id) | ApproachOutcome::AlreadyOpen(id) => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NegotiationReply {
    pub negotiation_id: u32,
    /// Stage the offer was made in
    pub stage: NegotiationStage,
    pub evaluation: OfferEvaluation,
    /// Status of the negotiation after the offer
    pub status: NegotiationStatus,
    pub response: NegotiationResponse,
}

#[derive(Debug, Clone)]
pub struct TransferMarket {
    negotiations: HashMap<u32, Negotiation>,
    transfer_history: Vec<CompletedTransfer>,
    negotiation_ids: IdAllocator,
    settings: NegotiationSettings,
}

impl TransferMarket {
    pub fn new(settings: NegotiationSettings) -> Result<Self, ConfigError> {
        settings.validate()?;

        Ok(TransferMarket {
            negotiations: HashMap::new(),
            transfer_history: Vec::new(),
            negotiation_ids: IdAllocator::new(),
            settings,
        })
    }

    pub fn approach_player<D, V, R>(
        &mut self,
        directory: &D,
        valuation: &V,
        player_id: u32,
        buying_club_id: u32,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<ApproachOutcome, NegotiationError>
    where
        D: TransferDirectory + ?Sized,
        V: PlayerValuation + ?Sized,
        R: Rng + ?Sized,
    {
        let player = directory
            .player(player_id)
            .ok_or(NegotiationError::PlayerNotFound(player_id))?;

        let selling_club = directory
            .club(player.club_id)
            .ok_or(NegotiationError::ClubNotFound(player.club_id))?;

        let buying_club = directory
            .club(buying_club_id)
            .ok_or(NegotiationError::ClubNotFound(buying_club_id))?;

        if selling_club.id == buying_club.id {
            return Err(NegotiationError::SameClub(buying_club.id));
        }

        if let Some(existing) = self.open_negotiation_for(player_id, buying_club_id) {
            debug!(
                "{} already negotiating for {} (negotiation {})",
                buying_club.name, player.name, existing.id
            );
            return Ok(ApproachOutcome::AlreadyOpen(existing.id));
        }

        let unscouted = directory
            .scouting(buying_club_id)
            .is_some_and(|knowledge| !knowledge.is_visible(player_id));

        if unscouted {
            debug!("{} has no scouting knowledge of {}", buying_club.name, player.name);
            return Err(NegotiationError::PlayerNotScouted(player_id));
        }

        let ai_valuation = AiValuation::generate(valuation.true_value(player), player, &self.settings, rng);

        let id = self.negotiation_ids.allocate()?;

        info!(
            "🤝 {} approach {} of {}: min fee {:.0}, demanded wage {:.0}",
            buying_club.name, player.name, selling_club.name, ai_valuation.min_fee, ai_valuation.demanded_wage
        );

        self.negotiations.insert(
            id,
            Negotiation::new(id, player_id, selling_club.id, buying_club.id, ai_valuation, today),
        );

        Ok(ApproachOutcome::Opened(id))
    }

    pub fn submit_fee_offer<D: TransferDirectory + ?Sized>(
        &mut self,
        directory: &D,
        negotiation_id: u32,
        offer: TransferOffer,
        today: NaiveDate,
    ) -> Result<NegotiationReply, NegotiationError> {
        let turn = self
            .negotiation(negotiation_id)?
            .submit_fee_offer(offer, today, self.settings.response_delay_days)?;

        self.apply(directory, NegotiationStage::ClubFee, turn, today)
    }

    pub fn submit_contract_offer<D: TransferDirectory + ?Sized>(
        &mut self,
        directory: &D,
        negotiation_id: u32,
        offer: ContractOffer,
        today: NaiveDate,
    ) -> Result<NegotiationReply, NegotiationError> {
        let turn = self
            .negotiation(negotiation_id)?
            .submit_contract_offer(offer, today, self.settings.response_delay_days)?;

        self.apply(directory, NegotiationStage::Contract, turn, today)
    }

    /// Evaluates many fee offers at once. Each negotiation takes at most one
    /// offer per batch; repeats are answered with `AwaitingResponse`.
    pub fn submit_fee_offers<D: TransferDirectory + ?Sized>(
        &mut self,
        directory: &D,
        offers: Vec<(u32, TransferOffer)>,
        today: NaiveDate,
    ) -> Vec<Result<NegotiationReply, NegotiationError>> {
        let delay = self.settings.response_delay_days;

        let turns: Vec<(u32, Result<NegotiationTurn, NegotiationError>)> = offers
            .into_par_iter()
            .map(|(id, offer)| {
                let turn = self
                    .negotiations
                    .get(&id)
                    .ok_or(NegotiationError::NegotiationNotFound(id))
                    .and_then(|n| n.submit_fee_offer(offer, today, delay));

                (id, turn)
            })
            .collect();

        let mut answered = HashSet::new();

        turns
            .into_iter()
            .map(|(id, turn)| {
                if !answered.insert(id) {
                    let until = self.negotiations.get(&id).map_or(today, |n| n.next_response_date);
                    return Err(NegotiationError::AwaitingResponse { id, until });
                }

                self.apply(directory, NegotiationStage::ClubFee, turn?, today)
            })
            .collect()
    }

    pub fn withdraw(&mut self, negotiation_id: u32) -> Result<Negotiation, NegotiationError> {
        let negotiation = self.negotiation(negotiation_id)?;

        if !negotiation.is_open() {
            return Err(NegotiationError::Closed {
                id: negotiation_id,
                status: negotiation.status.to_string(),
            });
        }

        info!("negotiation {} withdrawn", negotiation_id);

        self.negotiations
            .remove(&negotiation_id)
            .ok_or(NegotiationError::NegotiationNotFound(negotiation_id))
    }

    pub fn get(&self, negotiation_id: u32) -> Option<&Negotiation> {
        self.negotiations.get(&negotiation_id)
    }

    pub fn history(&self) -> &[CompletedTransfer] {
        &self.transfer_history
    }

    pub fn open_negotiations(&self) -> impl Iterator<Item = &Negotiation> {
        self.negotiations.values().filter(|n| n.is_open())
    }

    pub fn has_active_negotiation_for(&self, player_id: u32, buying_club_id: u32) -> bool {
        self.open_negotiation_for(player_id, buying_club_id).is_some()
    }

    pub fn active_negotiation_count_for_club(&self, club_id: u32) -> usize {
        self.open_negotiations()
            .filter(|n| n.buying_club_id == club_id)
            .count()
    }

    fn open_negotiation_for(&self, player_id: u32, buying_club_id: u32) -> Option<&Negotiation> {
        self.open_negotiations()
            .find(|n| n.player_id == player_id && n.buying_club_id == buying_club_id)
    }

    fn negotiation(&self, negotiation_id: u32) -> Result<&Negotiation, NegotiationError> {
        self.negotiations
            .get(&negotiation_id)
            .ok_or(NegotiationError::NegotiationNotFound(negotiation_id))
    }

    fn apply<D: TransferDirectory + ?Sized>(
        &mut self,
        directory: &D,
        stage: NegotiationStage,
        turn: NegotiationTurn,
        today: NaiveDate,
    ) -> Result<NegotiationReply, NegotiationError> {
        let NegotiationTurn { negotiation, evaluation } = turn;

        let player = directory
            .player(negotiation.player_id)
            .ok_or(NegotiationError::PlayerNotFound(negotiation.player_id))?;

        let reply = NegotiationReply {
            negotiation_id: negotiation.id,
            stage,
            evaluation,
            status: negotiation.status,
            response: NegotiationResponse::generate(&player.agent, stage, evaluation.quality),
        };

        match negotiation.status {
            NegotiationStatus::Collapsed => {
                info!("negotiation {} for {} collapsed", negotiation.id, player.name);
                self.negotiations.remove(&negotiation.id);
            }
            NegotiationStatus::Completed => {
                let completed = CompletedTransfer::new(
                    negotiation.id,
                    player.id,
                    player.name.clone(),
                    negotiation.selling_club_id,
                    negotiation.buying_club_id,
                    today,
                    negotiation.latest_offer.as_ref().map_or(0.0, |o| o.fee),
                    negotiation.latest_contract_offer.as_ref().map_or(0.0, |c| c.wage),
                    negotiation.latest_contract_offer.as_ref().map_or(0, |c| c.duration),
                );

                info!(
                    "✅ {} joins club {} for {:.0}",
                    completed.player_name, completed.to_club_id, completed.fee
                );

                self.transfer_history.push(completed);
                self.negotiations.insert(negotiation.id, negotiation);
            }
            _ => {
                self.negotiations.insert(negotiation.id, negotiation);
            }
        }

        Ok(reply)
    }
}
