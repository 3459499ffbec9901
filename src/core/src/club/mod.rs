pub mod academy;
pub mod club;
pub mod player;
pub mod reputation;
pub mod scouting;

pub use academy::*;
pub use club::*;
pub use player::*;
pub use reputation::*;
pub use scouting::*;
