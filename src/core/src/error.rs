use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("id space exhausted at {at}")]
pub struct IdsExhausted {
    pub at: u32,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulingError {
    #[error("round robin requires an even number of clubs, got {0}")]
    OddParticipantCount(usize),

    #[error("at least {required} clubs required, got {found}")]
    NotEnoughParticipants { required: usize, found: usize },

    #[error("club {0} appears more than once in the draw")]
    DuplicateClub(u32),

    #[error("knockout bracket requires {expected} seeds, got {found}")]
    InvalidSeedCount { expected: usize, found: usize },

    #[error("swiss draw produced {found} pairings, expected {expected}")]
    PairingCountMismatch { expected: usize, found: usize },

    #[error("swiss draw requires {expected} pots, got {found}")]
    InvalidPotCount { expected: usize, found: usize },

    #[error("pot {pot} has {found} clubs, expected {expected}")]
    InvalidPotSize { pot: usize, expected: usize, found: usize },

    #[error("expected {expected} match day dates, got {found}")]
    InvalidMatchDayDates { expected: usize, found: usize },

    #[error("fixture {0} not found")]
    FixtureNotFound(u32),

    #[error("fixture {0} has no participants assigned yet")]
    FixtureNotReady(u32),

    #[error("fixture {0} has already been played")]
    FixtureAlreadyPlayed(u32),

    #[error("knockout fixture {0} ended level without a shootout winner")]
    MissingKnockoutWinner(u32),

    #[error("competition {0} is scheduled more than once")]
    DuplicateCompetition(String),

    #[error(transparent)]
    IdsExhausted(#[from] IdsExhausted),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NegotiationError {
    #[error("player {0} not found")]
    PlayerNotFound(u32),

    #[error("club {0} not found")]
    ClubNotFound(u32),

    #[error("negotiation {0} not found")]
    NegotiationNotFound(u32),

    #[error("club {0} cannot negotiate for its own player")]
    SameClub(u32),

    #[error("negotiation {id} is closed ({status})")]
    Closed { id: u32, status: String },

    #[error("negotiation {id} is in {actual} stage, expected {expected}")]
    WrongStage {
        id: u32,
        expected: String,
        actual: String,
    },

    #[error("negotiation {id} awaits a response until {until}")]
    AwaitingResponse { id: u32, until: NaiveDate },

    #[error("player {0} has not been scouted")]
    PlayerNotScouted(u32),

    #[error(transparent)]
    IdsExhausted(#[from] IdsExhausted),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
