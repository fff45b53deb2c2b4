pub mod catalog;
pub mod roulette;

pub use catalog::*;
pub use roulette::*;
