use std::sync::Arc;

use tracing::{debug, instrument};

use super::{
    options::Options,
    snapshot::{GenerationSnapshot, LogObserver, MemberSnapshot, Observer, Solution},
};
use crate::{
    error::{GeneticError, Result},
    individual::Individual,
    population::Population,
    rng::RandomNumberGenerator,
};

/// Represents the result of a run: the best individual ever seen and its decoded value.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// The best individual found.
    pub individual: Individual,
    /// Its decoded `(x, y, value)`.
    pub solution: Solution,
    /// Number of generations produced.
    pub generations: usize,
}

/// Drives the evolution: owns the current generation, the generation counter
/// and the best-so-far record.
///
/// Each [`step`](Environment::step) selects parents from the current generation,
/// pairs them up, crosses each pair over, mutates both children and replaces the
/// generation with the children. The best-so-far record only moves when a new
/// generation holds a strictly better individual; it is never re-injected into
/// the breeding population.
///
/// # Example
///
/// ```rust
/// use gamin::evolution::{Environment, Goal, Options};
/// use gamin::rng::RandomNumberGenerator;
///
/// let options = Options::builder()
///     .goal(Goal::Maximize)
///     .upperbound(8.0)
///     .objective(|x: f64, y: f64| -(x * x + y * y))
///     .max_iter(50)
///     .build()
///     .unwrap();
///
/// let mut env = Environment::new(options, RandomNumberGenerator::from_seed(42)).unwrap();
/// let result = env.run().unwrap();
///
/// assert_eq!(result.generations, 50);
/// assert!(result.solution.value <= 0.0);
/// ```
#[derive(Debug)]
pub struct Environment {
    options: Arc<Options>,
    current_gen: Population,
    gen_count: usize,
    best_so_far: Individual,
    rng: RandomNumberGenerator,
}

impl Environment {
    /// Creates the initial generation and seeds best-so-far with its best member.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid options, and an arithmetic error
    /// if the initial generation cannot be scored or its total fitness is not
    /// positive. No generation is produced in either case.
    pub fn new(options: Options, mut rng: RandomNumberGenerator) -> Result<Self> {
        options.validate()?;
        let options = Arc::new(options);

        let current_gen = Population::random(&options, &mut rng);
        current_gen.wheel().map_err(|e| e.in_generation(0))?;
        let best_so_far = current_gen
            .best()
            .map_err(|e| e.in_generation(0))?
            .clone();

        debug!(
            population_size = options.get_population_size(),
            representation_size = options.get_representation_size(),
            max_iter = options.get_max_iter(),
            "environment created"
        );

        Ok(Self {
            options,
            current_gen,
            gen_count: 0,
            best_so_far,
            rng,
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Number of generations produced since generation 0.
    pub fn generation(&self) -> usize {
        self.gen_count
    }

    pub fn population(&self) -> &Population {
        &self.current_gen
    }

    /// The best individual of the current generation.
    pub fn best(&self) -> Result<&Individual> {
        self.current_gen.best()
    }

    /// The best individual of any generation so far.
    pub fn best_so_far(&self) -> &Individual {
        &self.best_so_far
    }

    /// Returns true once the generation budget is spent.
    pub fn is_finished(&self) -> bool {
        self.gen_count >= self.options.get_max_iter()
    }

    /// Produces the next generation and returns its snapshot.
    ///
    /// # Errors
    ///
    /// Any failure is wrapped in `GeneticError::Generation` with the number of the
    /// generation being produced. A generation that fails to breed or score is
    /// discarded and the environment stays on the previous one.
    #[instrument(level = "debug", skip(self), fields(generation = self.gen_count + 1))]
    pub fn step(&mut self) -> Result<GenerationSnapshot> {
        let generation = self.gen_count + 1;
        let next_gen = self
            .breed()
            .map_err(|e| e.in_generation(generation))?;

        self.current_gen = next_gen;
        self.gen_count = generation;

        let candidate = self.current_gen.best().map_err(|e| e.in_generation(generation))?;
        if candidate.is_better_than(&self.best_so_far) {
            debug!(
                generation,
                previous = self.best_so_far.phenotype(),
                current = candidate.phenotype(),
                "best so far improved"
            );
            self.best_so_far = candidate.clone();
        }

        self.snapshot().map_err(|e| e.in_generation(generation))
    }

    /// Advances a single generation.
    pub fn next(&mut self) -> Result<GenerationSnapshot> {
        self.step()
    }

    /// Steps until the generation budget is spent, reporting each generation
    /// through a [`LogObserver`] at the configured log level.
    pub fn run(&mut self) -> Result<EvolutionResult> {
        let mut observer = LogObserver::new(self.options.get_log_level());
        self.run_with(&mut observer)
    }

    /// Steps until the generation budget is spent, handing every snapshot to `observer`.
    pub fn run_with<O>(&mut self, observer: &mut O) -> Result<EvolutionResult>
    where
        O: Observer + ?Sized,
    {
        while !self.is_finished() {
            let snapshot = self.step()?;
            observer.on_generation(&snapshot);
        }

        Ok(EvolutionResult {
            individual: self.best_so_far.clone(),
            solution: self.best_so_far.solution()?,
            generations: self.gen_count,
        })
    }

    /// The snapshot of the current generation without advancing.
    pub fn snapshot(&self) -> Result<GenerationSnapshot> {
        Self::capture(self.gen_count, &self.current_gen, &self.best_so_far)
    }

    fn breed(&mut self) -> Result<Population> {
        let selected = self.current_gen.select(&mut self.rng)?;
        let pairs = Population::pairup(selected);

        let mut members = Vec::with_capacity(self.current_gen.len());
        for pair in &pairs {
            let (mut first, mut second) = Population::crossover(pair, &mut self.rng)?;
            first.mutate(&mut self.rng)?;
            second.mutate(&mut self.rng)?;
            members.push(first);
            members.push(second);
        }

        let next_gen = Population::from_individuals(Arc::clone(&self.options), members);
        // Every generation must be selectable
        next_gen.wheel()?;
        Ok(next_gen)
    }

    fn capture(
        generation: usize,
        population: &Population,
        best_so_far: &Individual,
    ) -> Result<GenerationSnapshot> {
        let fitness = population.fitness()?;
        let total_fitness = population.total_fitness()?;

        let members = population
            .iter()
            .zip(&fitness)
            .map(|(individual, &fitness)| {
                Ok(MemberSnapshot {
                    solution: individual.solution()?,
                    fitness,
                    selection_probability: fitness / total_fitness,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let best = population.best()?.solution()?;
        let best_so_far = best_so_far.solution()?;

        Ok(GenerationSnapshot {
            generation,
            average_fitness: total_fitness / members.len() as f64,
            members,
            best,
            best_so_far,
            total_fitness,
        })
    }
}
