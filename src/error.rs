//! # Error Types
//!
//! This module defines the error type shared by every operation of the engine.
//! Errors fall into two groups: configuration errors, which are raised when
//! [`Options`](crate::evolution::Options) are built or an
//! [`Environment`](crate::evolution::Environment) is constructed, and arithmetic
//! invariant violations, which are raised while a generation is being produced.
//! There is nothing to retry: every error is a defect in the configuration or in
//! the objective function.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use gamin::error::{GeneticError, Result};
//!
//! fn check_population(size: usize) -> Result<usize> {
//!     if size % 2 != 0 {
//!         return Err(GeneticError::Configuration(format!(
//!             "Population size must be even, got {}",
//!             size
//!         )));
//!     }
//!     Ok(size)
//! }
//!
//! assert!(check_population(7).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use gamin::error::{GeneticError, OptionExt};
//!
//! fn find_best_candidate(candidates: &[i32]) -> gamin::error::Result<i32> {
//!     candidates.iter().max().cloned().ok_or_else_genetic(||
//!         GeneticError::EmptyPopulation
//!     )
//! }
//! ```

use thiserror::Error;

/// Represents errors that can occur while configuring or running the engine.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// The objective function produced NaN or infinity inside the domain.
    #[error("Invalid numeric value: objective f({x}, {y}) = {value} is not finite")]
    NonFiniteObjective { x: f64, y: f64, value: f64 },

    /// An individual's selection fitness is negative, which means the
    /// configured upperbound does not cover the objective's range.
    #[error("Fitness calculation error: individual {index} has negative fitness {fitness}")]
    NegativeFitness { index: usize, fitness: f64 },

    /// The fitness of the whole population sums to zero or less, so no
    /// selection probabilities can be derived from it.
    #[error("Fitness calculation error: total population fitness {0} is not positive")]
    NonPositiveTotalFitness(f64),

    /// Error that occurs when a random distribution cannot be built.
    #[error("Random generation error: {0}")]
    RandomGeneration(String),

    /// An error raised while producing a generation.
    #[error("Evolution error in generation {generation}: {source}")]
    Generation {
        generation: usize,
        #[source]
        source: Box<GeneticError>,
    },
}

impl GeneticError {
    /// Wraps this error with the number of the generation being produced.
    pub fn in_generation(self, generation: usize) -> Self {
        GeneticError::Generation {
            generation,
            source: Box::new(self),
        }
    }
}

/// A specialized Result type for genetic algorithm operations.
///
/// This type is a convenience wrapper around `std::result::Result` with the error type
/// fixed to `GeneticError`.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using
    /// a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
