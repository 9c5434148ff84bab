//! # Generation snapshots
//!
//! After every completed generation the [`Environment`](super::Environment)
//! produces a read-only [`GenerationSnapshot`]. Reporting, plotting and
//! persistence consume snapshots through the [`Observer`] trait instead of
//! being interleaved with the genetic operators.
//!
//! ```rust
//! use gamin::evolution::{Environment, GenerationSnapshot, Observer, Options};
//! use gamin::rng::RandomNumberGenerator;
//!
//! #[derive(Default)]
//! struct BestTrace(Vec<f64>);
//!
//! impl Observer for BestTrace {
//!     fn on_generation(&mut self, snapshot: &GenerationSnapshot) {
//!         self.0.push(snapshot.best_so_far.value);
//!     }
//! }
//!
//! let options = Options::builder().max_iter(10).build().unwrap();
//! let mut env = Environment::new(options, RandomNumberGenerator::from_seed(3)).unwrap();
//! let mut trace = BestTrace::default();
//! env.run_with(&mut trace).unwrap();
//!
//! assert_eq!(trace.0.len(), 10);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::options::LogLevel;

/// A decoded point of the domain with its objective value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

/// One member of a generation as seen by the roulette.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemberSnapshot {
    pub solution: Solution,
    /// Roulette weight after the upperbound shift.
    pub fitness: f64,
    /// `fitness / total_fitness`
    pub selection_probability: f64,
}

/// The observable state of a run after a generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GenerationSnapshot {
    pub generation: usize,
    pub members: Vec<MemberSnapshot>,
    /// Best member of this generation.
    pub best: Solution,
    /// Best solution seen in any generation so far.
    pub best_so_far: Solution,
    pub total_fitness: f64,
    pub average_fitness: f64,
}

/// Receives a snapshot after every completed generation.
pub trait Observer {
    fn on_generation(&mut self, snapshot: &GenerationSnapshot);
}

impl<F> Observer for F
where
    F: FnMut(&GenerationSnapshot),
{
    fn on_generation(&mut self, snapshot: &GenerationSnapshot) {
        self(snapshot)
    }
}

/// Reports snapshots through `tracing` at the configured verbosity.
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    level: LogLevel,
}

impl LogObserver {
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }
}

impl Observer for LogObserver {
    fn on_generation(&mut self, snapshot: &GenerationSnapshot) {
        match self.level {
            LogLevel::None => {}
            LogLevel::Minimal => {
                info!(
                    generation = snapshot.generation,
                    best_x = snapshot.best_so_far.x,
                    best_y = snapshot.best_so_far.y,
                    best_value = snapshot.best_so_far.value,
                    "generation complete"
                );
            }
            LogLevel::Verbose => {
                info!(
                    generation = snapshot.generation,
                    best_x = snapshot.best_so_far.x,
                    best_y = snapshot.best_so_far.y,
                    best_value = snapshot.best_so_far.value,
                    generation_best = snapshot.best.value,
                    total_fitness = snapshot.total_fitness,
                    average_fitness = snapshot.average_fitness,
                    "generation complete"
                );
                for (index, member) in snapshot.members.iter().enumerate() {
                    debug!(
                        generation = snapshot.generation,
                        index,
                        x = member.solution.x,
                        y = member.solution.y,
                        value = member.solution.value,
                        fitness = member.fitness,
                        selection_probability = member.selection_probability,
                        "member"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> GenerationSnapshot {
        let solution = Solution {
            x: 0.5,
            y: -0.5,
            value: 1.0,
        };
        GenerationSnapshot {
            generation: 4,
            members: vec![MemberSnapshot {
                solution,
                fitness: 2.0,
                selection_probability: 1.0,
            }],
            best: solution,
            best_so_far: solution,
            total_fitness: 2.0,
            average_fitness: 2.0,
        }
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer = |s: &GenerationSnapshot| seen.push(s.generation);
            observer.on_generation(&snapshot());
        }
        assert_eq!(seen, vec![4]);
    }

    #[test]
    fn test_log_observer_levels_do_not_panic() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();

        for level in [LogLevel::None, LogLevel::Minimal, LogLevel::Verbose] {
            LogObserver::new(level).on_generation(&snapshot());
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_string(&snapshot()).unwrap();
        let back: GenerationSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot());
    }
}
