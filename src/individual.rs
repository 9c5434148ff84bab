//! # Individual
//!
//! An `Individual` is one candidate solution: an x-chromosome and a
//! y-chromosome plus the run options needed to decode and score them.
//!
//! Nothing derived from the genomes is cached. The objective value and the
//! selection fitness are recomputed on every call, so mutation and crossover
//! can never leave a stale score behind.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use gamin::evolution::Options;
//! use gamin::individual::Individual;
//! use gamin::rng::RandomNumberGenerator;
//!
//! let options = Arc::new(Options::default());
//! let mut rng = RandomNumberGenerator::from_seed(1);
//!
//! let mut individual = Individual::random(&options, &mut rng);
//! let before = individual.phenotype();
//! individual.mutate(&mut rng).unwrap();
//!
//! assert!(before.is_finite());
//! assert!((-2.0..=2.0).contains(&individual.x()));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::{
    encoding::Genome,
    error::{GeneticError, Result},
    evolution::{options::Options, snapshot::Solution},
    rng::RandomNumberGenerator,
};

#[derive(Clone)]
pub struct Individual {
    x_chromosome: Genome,
    y_chromosome: Genome,
    options: Arc<Options>,
}

impl Individual {
    /// Creates an individual from two chromosomes.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if either chromosome's length
    /// differs from the configured representation size.
    pub fn new(options: Arc<Options>, x_chromosome: Genome, y_chromosome: Genome) -> Result<Self> {
        let expected = options.get_representation_size();
        if x_chromosome.len() != expected || y_chromosome.len() != expected {
            return Err(GeneticError::Configuration(format!(
                "Chromosomes must have {} bits, got {} and {}",
                expected,
                x_chromosome.len(),
                y_chromosome.len()
            )));
        }

        Ok(Self {
            x_chromosome,
            y_chromosome,
            options,
        })
    }

    /// Creates an individual whose bits are all drawn with equal probability.
    pub fn random(options: &Arc<Options>, rng: &mut RandomNumberGenerator) -> Self {
        let size = options.get_representation_size();
        Self {
            x_chromosome: Genome::random(size, rng),
            y_chromosome: Genome::random(size, rng),
            options: Arc::clone(options),
        }
    }

    pub fn x_chromosome(&self) -> &Genome {
        &self.x_chromosome
    }

    pub fn y_chromosome(&self) -> &Genome {
        &self.y_chromosome
    }

    pub fn options(&self) -> &Arc<Options> {
        &self.options
    }

    /// The decoded x decision variable.
    pub fn x(&self) -> f64 {
        self.x_chromosome
            .decode(self.options.get_min_axis(), self.options.get_max_axis())
    }

    /// The decoded y decision variable.
    pub fn y(&self) -> f64 {
        self.y_chromosome
            .decode(self.options.get_min_axis(), self.options.get_max_axis())
    }

    /// The objective applied to the decoded decision variables.
    pub fn phenotype(&self) -> f64 {
        self.options.get_objective().evaluate(self.x(), self.y())
    }

    /// The objective value, rejected if it is not finite.
    pub fn evaluate(&self) -> Result<f64> {
        let (x, y) = (self.x(), self.y());
        let value = self.options.get_objective().evaluate(x, y);
        if !value.is_finite() {
            return Err(GeneticError::NonFiniteObjective { x, y, value });
        }
        Ok(value)
    }

    /// The roulette weight of this individual: the objective value shifted by
    /// the configured upperbound in the direction of the goal.
    ///
    /// The weight is not checked for sign here; the roulette rejects negative
    /// weights with the offending index.
    pub fn fitness(&self) -> Result<f64> {
        let value = self.evaluate()?;
        Ok(self
            .options
            .get_goal()
            .fitness(value, self.options.get_upperbound()))
    }

    /// The decoded `(x, y, value)` triple.
    pub fn solution(&self) -> Result<Solution> {
        Ok(Solution {
            x: self.x(),
            y: self.y(),
            value: self.evaluate()?,
        })
    }

    /// Flips each bit of both chromosomes independently with the configured
    /// mutation rate.
    pub fn mutate(&mut self, rng: &mut RandomNumberGenerator) -> Result<()> {
        let rate = self.options.get_mutation_rate();
        let size = self.options.get_representation_size();

        let x_mask = rng.fetch_bernoulli_mask(rate, size)?;
        let y_mask = rng.fetch_bernoulli_mask(rate, size)?;
        trace!(
            x_flips = x_mask.iter().filter(|&&bit| bit).count(),
            y_flips = y_mask.iter().filter(|&&bit| bit).count(),
            "mutation"
        );

        self.x_chromosome.flip_masked(&x_mask);
        self.y_chromosome.flip_masked(&y_mask);
        Ok(())
    }

    /// Orders two individuals by objective value, NaN sorting last.
    pub fn cmp_phenotype(&self, other: &Self) -> Ordering {
        self.phenotype().total_cmp(&other.phenotype())
    }

    /// Returns true when this individual is strictly better than `other`
    /// under the configured goal.
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.options
            .get_goal()
            .is_better(self.phenotype(), other.phenotype())
    }
}

impl PartialEq for Individual {
    fn eq(&self, other: &Self) -> bool {
        self.phenotype() == other.phenotype()
    }
}

impl PartialOrd for Individual {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.phenotype().partial_cmp(&other.phenotype())
    }
}

impl fmt::Debug for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Individual")
            .field("x_chromosome", &self.x_chromosome.to_string())
            .field("y_chromosome", &self.y_chromosome.to_string())
            .field("x", &self.x())
            .field("y", &self.y())
            .field("phenotype", &self.phenotype())
            .finish()
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x: {} ({}) y: {} ({}) f = {}",
            self.x_chromosome,
            self.x(),
            self.y_chromosome,
            self.y(),
            self.phenotype()
        )
    }
}
