pub mod champion_league;
pub mod knockout;

pub use champion_league::*;
pub use knockout::*;
