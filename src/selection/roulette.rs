use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// A fitness-proportionate sampler over a fixed set of weights.
///
/// Roulette wheel selection (also known as fitness proportionate selection) draws
/// index `i` with probability `weights[i] / sum(weights)`. Draws are independent
/// and with replacement, so the same index may come up many times.
///
/// All weights must be finite and non-negative, and their sum must be positive.
///
/// # Examples
///
/// ```
/// use gamin::selection::RouletteWheel;
/// use gamin::rng::RandomNumberGenerator;
///
/// let wheel = RouletteWheel::new(&[1.0, 3.0]).unwrap();
/// let mut rng = RandomNumberGenerator::from_seed(42);
///
/// assert_eq!(wheel.probability(1), 0.75);
/// assert!(wheel.spin(&mut rng) < 2);
/// ```
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    cumulative: Vec<f64>,
    total: f64,
}

impl RouletteWheel {
    /// Builds the wheel from the weight of every slot.
    ///
    /// # Errors
    ///
    /// - `GeneticError::EmptyPopulation` if there are no weights.
    /// - `GeneticError::NegativeFitness` naming the first negative or non-finite weight.
    /// - `GeneticError::NonPositiveTotalFitness` if the weights sum to zero.
    pub fn new(weights: &[f64]) -> Result<Self> {
        if weights.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        if let Some((index, &fitness)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(GeneticError::NegativeFitness { index, fitness });
        }

        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(GeneticError::NonPositiveTotalFitness(total));
        }

        // Calculate cumulative probabilities
        let mut cumulative = Vec::with_capacity(weights.len());
        let mut running = 0.0;
        for &weight in weights {
            running += weight / total;
            cumulative.push(running);
        }

        // Pin the last slot to exactly 1.0 against floating-point drift,
        // along with any zero-weight slots trailing it
        let last_positive = weights.iter().rposition(|&w| w > 0.0).unwrap_or(0);
        cumulative[last_positive..].iter_mut().for_each(|c| *c = 1.0);

        Ok(Self { cumulative, total })
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// The sum of all weights.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// The probability of drawing slot `index`.
    pub fn probability(&self, index: usize) -> f64 {
        let previous = if index == 0 { 0.0 } else { self.cumulative[index - 1] };
        self.cumulative[index] - previous
    }

    /// Draws one slot index.
    pub fn spin(&self, rng: &mut RandomNumberGenerator) -> usize {
        let r = rng.fetch_unit();
        // First slot whose cumulative probability exceeds r; zero-width slots are never hit
        self.cumulative
            .partition_point(|&c| c <= r)
            .min(self.cumulative.len() - 1)
    }

    /// Draws `num` slot indices independently.
    pub fn spin_many(&self, num: usize, rng: &mut RandomNumberGenerator) -> Vec<usize> {
        (0..num).map(|_| self.spin(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probabilities_are_proportional() {
        let wheel = RouletteWheel::new(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(wheel.len(), 4);
        assert_eq!(wheel.total(), 10.0);
        for (i, expected) in [0.1, 0.2, 0.3, 0.4].iter().enumerate() {
            assert!((wheel.probability(i) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_weights() {
        assert!(matches!(
            RouletteWheel::new(&[]),
            Err(GeneticError::EmptyPopulation)
        ));
    }

    #[test]
    fn test_negative_weight() {
        match RouletteWheel::new(&[0.5, -0.8, 0.3]) {
            Err(GeneticError::NegativeFitness { index, fitness }) => {
                assert_eq!(index, 1);
                assert_eq!(fitness, -0.8);
            }
            other => panic!("Expected NegativeFitness, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_weight() {
        assert!(matches!(
            RouletteWheel::new(&[0.5, f64::NAN]),
            Err(GeneticError::NegativeFitness { index: 1, .. })
        ));
    }

    #[test]
    fn test_zero_total() {
        assert!(matches!(
            RouletteWheel::new(&[0.0, 0.0, 0.0]),
            Err(GeneticError::NonPositiveTotalFitness(_))
        ));
    }

    #[test]
    fn test_zero_weight_never_drawn() {
        let wheel = RouletteWheel::new(&[0.0, 1.0, 0.0, 1.0, 0.0]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(42);
        for idx in wheel.spin_many(10_000, &mut rng) {
            assert!(idx == 1 || idx == 3, "drew zero-weight slot {}", idx);
        }
    }

    #[test]
    fn test_selection_frequencies_converge() {
        let weights = [1.0, 2.0, 3.0, 4.0];
        let wheel = RouletteWheel::new(&weights).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(2024);

        let draws = 100_000;
        let mut counts = [0usize; 4];
        for idx in wheel.spin_many(draws, &mut rng) {
            counts[idx] += 1;
        }

        // Pearson chi-squared with 3 degrees of freedom; 16.27 is the 0.999 quantile
        let chi_squared: f64 = counts
            .iter()
            .enumerate()
            .map(|(i, &observed)| {
                let expected = draws as f64 * wheel.probability(i);
                (observed as f64 - expected).powi(2) / expected
            })
            .sum();
        assert!(chi_squared < 16.27, "chi squared {} too large: {:?}", chi_squared, counts);
    }
}
