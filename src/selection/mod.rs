pub mod roulette;

pub use roulette::RouletteWheel;
