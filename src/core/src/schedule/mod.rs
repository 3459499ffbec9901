pub mod book;
pub mod calendar;
pub mod fixture;

pub use book::*;
pub use calendar::*;
pub use fixture::*;
