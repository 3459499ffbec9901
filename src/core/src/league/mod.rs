pub mod league;
pub mod schedule;

pub use league::*;
pub use schedule::*;
