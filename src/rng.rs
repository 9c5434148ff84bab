//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct is the single random stream of a run. Every
//! random decision of the engine (initial genomes, roulette spins, crossover points,
//! mutation masks) draws from the generator it is handed, so two runs started from
//! the same seed produce identical output.
//!
//! ## Example
//!
//! ```rust
//! use gamin::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let bits = rng.fetch_bits(20);
//! let point = rng.fetch_index(1, 19);
//!
//! assert_eq!(bits.len(), 20);
//! assert!((1..19).contains(&point));
//! ```

use rand::{distributions::Bernoulli, rngs::StdRng, Rng, SeedableRng};

use crate::error::{GeneticError, Result};

/// A wrapper around the `rand` crate's `StdRng` that provides the draws
/// the genetic operators need.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible runs, tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a uniform float in `[0, 1)`.
    pub fn fetch_unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    /// Draws `num` independent fair bits.
    pub fn fetch_bits(&mut self, num: usize) -> Vec<bool> {
        (0..num).map(|_| self.rng.gen_bool(0.5)).collect()
    }

    /// Draws a mask of `num` independent Bernoulli trials with success
    /// probability `p`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::RandomGeneration` if `p` is not within `[0, 1]`.
    pub fn fetch_bernoulli_mask(&mut self, p: f64, num: usize) -> Result<Vec<bool>> {
        let trial = Bernoulli::new(p).map_err(|e| {
            GeneticError::RandomGeneration(format!("Invalid Bernoulli probability {}: {}", p, e))
        })?;
        Ok((0..num).map(|_| self.rng.sample(trial)).collect())
    }

    /// Draws a uniform index in `[from, to)`.
    ///
    /// Panics if the range is empty; callers validate their bounds first.
    pub fn fetch_index(&mut self, from: usize, to: usize) -> usize {
        self.rng.gen_range(from..to)
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
