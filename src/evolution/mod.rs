pub mod environment;
pub mod objective;
pub mod options;
pub mod snapshot;

pub use environment::{Environment, EvolutionResult};
pub use objective::{Benchmark, Objective};
pub use options::{Goal, LogLevel, Options, OptionsBuilder};
pub use snapshot::{GenerationSnapshot, LogObserver, MemberSnapshot, Observer, Solution};
