//! # Population
//!
//! A `Population` is the ordered set of individuals forming one generation.
//! It owns the operators that turn one generation into the parents of the next:
//! roulette selection, pairing and single-point crossover.
//!
//! ```text
//!     parent0  [0 1 | 0 0 1 0]        child A  [0 1 | 1 1 1 0]
//!     parent1  [1 1 | 1 1 1 0]   ->   child B  [1 1 | 0 0 1 0]
//! ```
//!
//! The x and y chromosomes are cut at independently drawn points.

use std::sync::Arc;

use tracing::trace;

use crate::{
    encoding::Genome,
    error::{GeneticError, OptionExt, Result},
    evolution::options::Options,
    individual::Individual,
    rng::RandomNumberGenerator,
    selection::RouletteWheel,
};

#[derive(Debug, Clone)]
pub struct Population {
    members: Vec<Individual>,
    options: Arc<Options>,
}

impl Population {
    /// Creates a population of `population_size` random individuals.
    pub fn random(options: &Arc<Options>, rng: &mut RandomNumberGenerator) -> Self {
        let members = (0..options.get_population_size())
            .map(|_| Individual::random(options, rng))
            .collect();
        Self {
            members,
            options: Arc::clone(options),
        }
    }

    /// Wraps existing individuals into a population.
    pub fn from_individuals(options: Arc<Options>, members: Vec<Individual>) -> Self {
        Self { members, options }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Individual] {
        &self.members
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.members.iter()
    }

    pub fn options(&self) -> &Arc<Options> {
        &self.options
    }

    /// The roulette weight of every member, in order.
    pub fn fitness(&self) -> Result<Vec<f64>> {
        self.members.iter().map(Individual::fitness).collect()
    }

    /// The sum of every member's roulette weight.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::NonPositiveTotalFitness` if the sum is not
    /// positive, or any error raised while scoring a member.
    pub fn total_fitness(&self) -> Result<f64> {
        let total: f64 = self.fitness()?.iter().sum();
        if total <= 0.0 {
            return Err(GeneticError::NonPositiveTotalFitness(total));
        }
        Ok(total)
    }

    /// Builds the roulette wheel over this population.
    pub fn wheel(&self) -> Result<RouletteWheel> {
        RouletteWheel::new(&self.fitness()?)
    }

    /// Draws as many parents as there are members, with replacement and with
    /// probability proportional to fitness.
    pub fn select(&self, rng: &mut RandomNumberGenerator) -> Result<Vec<Individual>> {
        let wheel = self.wheel()?;
        Ok(wheel
            .spin_many(self.members.len(), rng)
            .into_iter()
            .map(|idx| self.members[idx].clone())
            .collect())
    }

    /// Partitions parents into consecutive pairs. A trailing odd parent is dropped.
    pub fn pairup(selected: Vec<Individual>) -> Vec<(Individual, Individual)> {
        let mut pairs = Vec::with_capacity(selected.len() / 2);
        let mut parents = selected.into_iter();
        while let (Some(first), Some(second)) = (parents.next(), parents.next()) {
            pairs.push((first, second));
        }
        pairs
    }

    /// Single-point crossover of both chromosomes, each at its own random point
    /// drawn uniformly from `1..=len - 2`.
    pub fn crossover(
        pair: &(Individual, Individual),
        rng: &mut RandomNumberGenerator,
    ) -> Result<(Individual, Individual)> {
        let (parent0, parent1) = pair;
        let (x0, x1) = Self::swap(parent0.x_chromosome(), parent1.x_chromosome(), rng)?;
        let (y0, y1) = Self::swap(parent0.y_chromosome(), parent1.y_chromosome(), rng)?;

        let options = parent0.options();
        Ok((
            Individual::new(Arc::clone(options), x0, y0)?,
            Individual::new(Arc::clone(options), x1, y1)?,
        ))
    }

    fn swap(
        lhs: &Genome,
        rhs: &Genome,
        rng: &mut RandomNumberGenerator,
    ) -> Result<(Genome, Genome)> {
        if lhs.len() != rhs.len() {
            return Err(GeneticError::Configuration(format!(
                "Cannot cross chromosomes of length {} and {}",
                lhs.len(),
                rhs.len()
            )));
        }
        if lhs.len() < 3 {
            return Err(GeneticError::Configuration(format!(
                "Chromosome of length {} has no interior crossover point",
                lhs.len()
            )));
        }

        let point = rng.fetch_index(1, lhs.len() - 1);
        trace!(point, "crossover point");
        Ok(lhs.splice(rhs, point))
    }

    /// The best member under the configured goal; ties go to the first encountered.
    pub fn best(&self) -> Result<&Individual> {
        let mut members = self.members.iter();
        let first = members
            .next()
            .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
        Ok(members.fold(first, |best, candidate| {
            if candidate.is_better_than(best) {
                candidate
            } else {
                best
            }
        }))
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Individual;
    type IntoIter = std::slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::Goal;

    fn options(goal: Goal) -> Arc<Options> {
        Arc::new(
            Options::builder()
                .representation_size(8)
                .goal(goal)
                .upperbound(10.0)
                .objective(|x: f64, y: f64| x + y)
                .build()
                .unwrap(),
        )
    }

    fn individual(options: &Arc<Options>, x: &str, y: &str) -> Individual {
        Individual::new(Arc::clone(options), x.parse().unwrap(), y.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_random_population_size() {
        let options = options(Goal::Minimize);
        let mut rng = RandomNumberGenerator::from_seed(1);
        let population = Population::random(&options, &mut rng);
        assert_eq!(population.len(), options.get_population_size());
    }

    #[test]
    fn test_total_fitness() {
        let options = options(Goal::Minimize);
        let population = Population::from_individuals(
            Arc::clone(&options),
            vec![
                // x + y = -4, fitness 14
                individual(&options, "00000000", "00000000"),
                // x + y = 4, fitness 6
                individual(&options, "11111111", "11111111"),
            ],
        );
        assert_eq!(population.total_fitness().unwrap(), 20.0);
    }

    #[test]
    fn test_total_fitness_rejects_non_positive() {
        let options = Arc::new(
            Options::builder()
                .representation_size(8)
                .upperbound(0.0)
                .objective(|_x: f64, _y: f64| 0.0)
                .build()
                .unwrap(),
        );
        let mut rng = RandomNumberGenerator::from_seed(2);
        let population = Population::random(&options, &mut rng);
        assert!(matches!(
            population.total_fitness(),
            Err(GeneticError::NonPositiveTotalFitness(_))
        ));
        assert!(population.select(&mut rng).is_err());
    }

    #[test]
    fn test_select_returns_population_size() {
        let options = options(Goal::Minimize);
        let mut rng = RandomNumberGenerator::from_seed(3);
        let population = Population::random(&options, &mut rng);
        let selected = population.select(&mut rng).unwrap();
        assert_eq!(selected.len(), population.len());
    }

    #[test]
    fn test_select_frequencies_follow_fitness() {
        let options = options(Goal::Maximize);
        // x + y + 10 gives weights 6, 10 and 14
        let members = vec![
            individual(&options, "00000000", "00000000"),
            individual(&options, "11111111", "00000000"),
            individual(&options, "11111111", "11111111"),
        ];
        let population = Population::from_individuals(Arc::clone(&options), members);
        let wheel = population.wheel().unwrap();
        assert!((wheel.probability(0) - 6.0 / 30.0).abs() < 1e-12);
        assert!((wheel.probability(2) - 14.0 / 30.0).abs() < 1e-12);

        let mut rng = RandomNumberGenerator::from_seed(99);
        let mut counts = [0usize; 3];
        let rounds = 20_000;
        for _ in 0..rounds {
            for parent in population.select(&mut rng).unwrap() {
                let idx = population
                    .iter()
                    .position(|m| m.x_chromosome() == parent.x_chromosome()
                        && m.y_chromosome() == parent.y_chromosome())
                    .unwrap();
                counts[idx] += 1;
            }
        }

        let draws = (rounds * 3) as f64;
        // Pearson chi-squared with 2 degrees of freedom; 13.82 is the 0.999 quantile
        let chi_squared: f64 = counts
            .iter()
            .enumerate()
            .map(|(i, &observed)| {
                let expected = draws * wheel.probability(i);
                (observed as f64 - expected).powi(2) / expected
            })
            .sum();
        assert!(chi_squared < 13.82, "chi squared {} too large: {:?}", chi_squared, counts);
    }

    #[test]
    fn test_pairup_even() {
        let options = options(Goal::Minimize);
        let mut rng = RandomNumberGenerator::from_seed(4);
        let population = Population::random(&options, &mut rng);
        let selected = population.members().to_vec();
        let pairs = Population::pairup(selected.clone());
        assert_eq!(pairs.len(), selected.len() / 2);
        for (i, (first, second)) in pairs.iter().enumerate() {
            assert_eq!(first.x_chromosome(), selected[2 * i].x_chromosome());
            assert_eq!(second.x_chromosome(), selected[2 * i + 1].x_chromosome());
        }
    }

    #[test]
    fn test_pairup_drops_trailing_odd() {
        let options = options(Goal::Minimize);
        let mut rng = RandomNumberGenerator::from_seed(5);
        let mut selected = Population::random(&options, &mut rng).members().to_vec();
        selected.truncate(5);
        assert_eq!(Population::pairup(selected).len(), 2);
        assert!(Population::pairup(Vec::new()).is_empty());
    }

    #[test]
    fn test_crossover_conserves_bits() {
        let options = options(Goal::Minimize);
        let mut rng = RandomNumberGenerator::from_seed(6);
        for _ in 0..200 {
            let pair = (
                Individual::random(&options, &mut rng),
                Individual::random(&options, &mut rng),
            );
            let (a, b) = Population::crossover(&pair, &mut rng).unwrap();
            let (p0, p1) = &pair;

            for (child_a, child_b, parent0, parent1) in [
                (a.x_chromosome(), b.x_chromosome(), p0.x_chromosome(), p1.x_chromosome()),
                (a.y_chromosome(), b.y_chromosome(), p0.y_chromosome(), p1.y_chromosome()),
            ] {
                assert_eq!(child_a.len(), parent0.len());
                assert_eq!(child_b.len(), parent1.len());
                assert_eq!(
                    child_a.count_ones() + child_b.count_ones(),
                    parent0.count_ones() + parent1.count_ones()
                );

                // Recover the cut point: the prefix comes from parent0, the suffix from parent1
                let len = parent0.len();
                let point = (1..len - 1)
                    .find(|&k| {
                        child_a.bits()[..k] == parent0.bits()[..k]
                            && child_a.bits()[k..] == parent1.bits()[k..]
                            && child_b.bits()[..k] == parent1.bits()[..k]
                            && child_b.bits()[k..] == parent0.bits()[k..]
                    });
                assert!(point.is_some(), "children are not a single-point cross of the parents");
            }
        }
    }

    #[test]
    fn test_crossover_points_cover_interior() {
        let options = options(Goal::Minimize);
        let zeros = individual(&options, "00000000", "00000000");
        let ones = individual(&options, "11111111", "11111111");
        let pair = (zeros, ones);
        let mut rng = RandomNumberGenerator::from_seed(7);

        let mut seen = [false; 8];
        for _ in 0..2000 {
            let (a, _) = Population::crossover(&pair, &mut rng).unwrap();
            // Child A is zeros up to the cut point, ones after it
            let point = a.x_chromosome().bits().iter().position(|&bit| bit).unwrap();
            seen[point] = true;
        }
        assert!(!seen[0]);
        assert!((1..=6).all(|k| seen[k]));
        assert!(!seen[7]);
    }

    #[test]
    fn test_best_respects_goal() {
        for (goal, expected) in [(Goal::Minimize, -4.0), (Goal::Maximize, 4.0)] {
            let options = options(goal);
            let population = Population::from_individuals(
                Arc::clone(&options),
                vec![
                    individual(&options, "10000000", "10000000"),
                    individual(&options, "00000000", "00000000"),
                    individual(&options, "11111111", "11111111"),
                ],
            );
            assert_eq!(population.best().unwrap().phenotype(), expected);
        }
    }

    #[test]
    fn test_best_of_empty_population() {
        let options = options(Goal::Minimize);
        let population = Population::from_individuals(options, Vec::new());
        assert!(matches!(population.best(), Err(GeneticError::EmptyPopulation)));
    }
}
