pub mod qualification;
pub mod tournaments;

pub use qualification::*;
pub use tournaments::*;
