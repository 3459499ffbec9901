pub mod club;
pub mod config;
pub mod continent;
pub mod error;
pub mod league;
pub mod schedule;
pub mod season;
pub mod transfers;

pub mod shared;
pub mod utils;

pub use club::{
    Club, ClubReputation, IntakeProfile, MatchOutcome, Player, PlayerAgent, PlayerSquadRole,
    ReputationLevel, ScoutingKnowledge, ValueEstimate, YouthIntake,
};
pub use config::{NegotiationSettings, SchedulingSettings, SimulatorSettings};
pub use continent::{
    ContinentalQualification, KnockoutBracketBuilder, KnockoutDates, MatchDayPlacement, Pairing, Pot,
    SwissDrawScheduler, SwissSchedule,
};
pub use error::{ConfigError, IdsExhausted, NegotiationError, SchedulingError};
pub use league::{League, LeagueSchedule, RoundRobinScheduler};
pub use schedule::{
    BracketLink, BracketSlot, Fixture, FixtureBook, FixtureRound, MatchCalendar, MatchScore, MatchSimulator,
    RecordedResult,
};
pub use season::{ContinentalCompetition, SeasonFixtures, SeasonInitializer};
pub use shared::IdAllocator;
pub use transfers::{
    AiValuation, ApproachOutcome, CompletedTransfer, ContractOffer, MarketValueValuation, Negotiation,
    NegotiationReply, NegotiationResponse, NegotiationStage, NegotiationStatus, OfferEvaluation,
    PlayerValuation, Sentiment, TransferDirectory, TransferMarket, TransferOffer, WorldDirectory,
};
pub use utils::*;
