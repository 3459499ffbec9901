pub mod dialogue;
pub mod market;
pub mod negotiation;
pub mod offer;
pub mod transfer;
pub mod valuation;

pub use dialogue::*;
pub use market::*;
pub use negotiation::*;
pub use offer::*;
pub use transfer::*;
pub use valuation::*;
