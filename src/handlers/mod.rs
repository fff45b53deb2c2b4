pub mod roulette;

pub use roulette::roulette_config;
