//! # Options
//!
//! The `Options` struct is the immutable configuration of a run: the bit-string
//! representation, the domain, the genetic operator rates, the generation
//! budget, the optimization goal with its fitness shift, and the objective.
//!
//! ## Example
//!
//! ```rust
//! use gamin::evolution::options::{Goal, LogLevel, Options};
//!
//! // Defaults: 8 individuals, 20-bit chromosomes, domain [-2, 2], minimize
//! let default_options = Options::default();
//! assert_eq!(default_options.get_population_size(), 8);
//!
//! let options = Options::builder()
//!     .population_size(20)
//!     .representation_size(24)
//!     .goal(Goal::Maximize)
//!     .upperbound(8.0)
//!     .objective(|x: f64, y: f64| -(x * x + y * y))
//!     .log_level(LogLevel::Minimal)
//!     .build()
//!     .unwrap();
//! assert_eq!(options.get_representation_size(), 24);
//!
//! // Odd populations cannot be paired up and are rejected
//! assert!(Options::builder().population_size(7).build().is_err());
//! ```
//!
//! ## Goal and fitness shift
//!
//! Roulette selection needs non-negative weights, so the objective value is
//! always shifted by `upperbound` before it is used as a weight:
//!
//! - `Goal::Minimize`: fitness is `upperbound - value`
//! - `Goal::Maximize`: fitness is `value + upperbound`
//!
//! Choosing `upperbound` large enough is the caller's contract. A negative
//! fitness aborts the run rather than being clamped.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::objective::{Benchmark, Objective};
use crate::encoding::MAX_REPRESENTATION_SIZE;
use crate::error::{GeneticError, Result};

/// Smallest representation that still has an interior crossover point.
pub const MIN_REPRESENTATION_SIZE: usize = 3;

/// Direction of the optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Goal {
    #[default]
    Minimize,
    Maximize,
}

impl Goal {
    /// Returns true when objective value `a` is strictly better than `b`.
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        match self {
            Goal::Minimize => a < b,
            Goal::Maximize => a > b,
        }
    }

    /// Shifts an objective value into a roulette weight.
    pub fn fitness(&self, value: f64, upperbound: f64) -> f64 {
        match self {
            Goal::Minimize => upperbound - value,
            Goal::Maximize => value + upperbound,
        }
    }
}

/// How much the default generation observer logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LogLevel {
    Verbose,
    Minimal,
    #[default]
    None,
}

#[cfg(feature = "serde")]
fn default_objective() -> Arc<dyn Objective> {
    Arc::new(Benchmark)
}

#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Options {
    population_size: usize,
    representation_size: usize,
    mutation_rate: f64,
    min_axis: f64,
    max_axis: f64,
    max_iter: usize,
    upperbound: f64,
    goal: Goal,
    log_level: LogLevel,
    #[cfg_attr(feature = "serde", serde(skip, default = "default_objective"))]
    objective: Arc<dyn Objective>,
}

impl Options {
    pub const POPULATION_SIZE: usize = 8;
    pub const REPRESENTATION_SIZE: usize = 20;
    pub const MUTATION_RATE: f64 = 0.01;
    pub const MIN_AXIS: f64 = -2.0;
    pub const MAX_AXIS: f64 = 2.0;
    pub const MAX_ITER: usize = 100;
    pub const UPPERBOUND: f64 = 4000.0;

    /// Returns a builder for creating a validated `Options` instance.
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_representation_size(&self) -> usize {
        self.representation_size
    }

    pub fn get_mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn get_min_axis(&self) -> f64 {
        self.min_axis
    }

    pub fn get_max_axis(&self) -> f64 {
        self.max_axis
    }

    pub fn get_max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn get_upperbound(&self) -> f64 {
        self.upperbound
    }

    pub fn get_goal(&self) -> Goal {
        self.goal
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn get_objective(&self) -> &dyn Objective {
        self.objective.as_ref()
    }

    /// Checks every invariant a run relies on.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` naming the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(GeneticError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }

        if self.population_size % 2 != 0 {
            return Err(GeneticError::Configuration(format!(
                "Population size must be even, got {}",
                self.population_size
            )));
        }

        if !(MIN_REPRESENTATION_SIZE..=MAX_REPRESENTATION_SIZE).contains(&self.representation_size) {
            return Err(GeneticError::Configuration(format!(
                "Representation size must be between {} and {}, got {}",
                MIN_REPRESENTATION_SIZE, MAX_REPRESENTATION_SIZE, self.representation_size
            )));
        }

        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(GeneticError::Configuration(format!(
                "Mutation rate must be within [0, 1], got {}",
                self.mutation_rate
            )));
        }

        if !self.min_axis.is_finite() || !self.max_axis.is_finite() {
            return Err(GeneticError::Configuration(format!(
                "Domain bounds must be finite, got [{}, {}]",
                self.min_axis, self.max_axis
            )));
        }

        if self.max_axis <= self.min_axis {
            return Err(GeneticError::Configuration(format!(
                "max_axis ({}) must be greater than min_axis ({})",
                self.max_axis, self.min_axis
            )));
        }

        if !self.upperbound.is_finite() {
            return Err(GeneticError::Configuration(format!(
                "Upperbound must be finite, got {}",
                self.upperbound
            )));
        }

        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            population_size: Self::POPULATION_SIZE,
            representation_size: Self::REPRESENTATION_SIZE,
            mutation_rate: Self::MUTATION_RATE,
            min_axis: Self::MIN_AXIS,
            max_axis: Self::MAX_AXIS,
            max_iter: Self::MAX_ITER,
            upperbound: Self::UPPERBOUND,
            goal: Goal::default(),
            log_level: LogLevel::default(),
            objective: Arc::new(Benchmark),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("population_size", &self.population_size)
            .field("representation_size", &self.representation_size)
            .field("mutation_rate", &self.mutation_rate)
            .field("min_axis", &self.min_axis)
            .field("max_axis", &self.max_axis)
            .field("max_iter", &self.max_iter)
            .field("upperbound", &self.upperbound)
            .field("goal", &self.goal)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}

/// Builder for `Options`.
///
/// Provides a fluent interface; unset fields take the defaults.
#[derive(Default)]
pub struct OptionsBuilder {
    population_size: Option<usize>,
    representation_size: Option<usize>,
    mutation_rate: Option<f64>,
    min_axis: Option<f64>,
    max_axis: Option<f64>,
    max_iter: Option<usize>,
    upperbound: Option<f64>,
    goal: Option<Goal>,
    log_level: Option<LogLevel>,
    objective: Option<Arc<dyn Objective>>,
}

impl OptionsBuilder {
    /// Sets the population size. Must be even.
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    /// Sets the number of bits per chromosome.
    pub fn representation_size(mut self, value: usize) -> Self {
        self.representation_size = Some(value);
        self
    }

    /// Sets the per-bit mutation probability.
    pub fn mutation_rate(mut self, value: f64) -> Self {
        self.mutation_rate = Some(value);
        self
    }

    pub fn min_axis(mut self, value: f64) -> Self {
        self.min_axis = Some(value);
        self
    }

    pub fn max_axis(mut self, value: f64) -> Self {
        self.max_axis = Some(value);
        self
    }

    /// Sets the number of generations a full run produces.
    pub fn max_iter(mut self, value: usize) -> Self {
        self.max_iter = Some(value);
        self
    }

    /// Sets the constant that shifts objective values into roulette weights.
    pub fn upperbound(mut self, value: f64) -> Self {
        self.upperbound = Some(value);
        self
    }

    pub fn goal(mut self, value: Goal) -> Self {
        self.goal = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    pub fn objective<O>(mut self, value: O) -> Self
    where
        O: Objective + 'static,
    {
        let objective: Arc<dyn Objective> = Arc::new(value);
        self.objective = Some(objective);
        self
    }

    /// Builds and validates the `Options` instance.
    pub fn build(self) -> Result<Options> {
        let options = Options {
            population_size: self.population_size.unwrap_or(Options::POPULATION_SIZE),
            representation_size: self
                .representation_size
                .unwrap_or(Options::REPRESENTATION_SIZE),
            mutation_rate: self.mutation_rate.unwrap_or(Options::MUTATION_RATE),
            min_axis: self.min_axis.unwrap_or(Options::MIN_AXIS),
            max_axis: self.max_axis.unwrap_or(Options::MAX_AXIS),
            max_iter: self.max_iter.unwrap_or(Options::MAX_ITER),
            upperbound: self.upperbound.unwrap_or(Options::UPPERBOUND),
            goal: self.goal.unwrap_or_default(),
            log_level: self.log_level.unwrap_or_default(),
            objective: self
                .objective
                .unwrap_or_else(|| Arc::new(Benchmark) as Arc<dyn Objective>),
        };
        options.validate()?;
        Ok(options)
    }
}
