/// A real-valued function of two real decision variables.
///
/// Any `Fn(f64, f64) -> f64` closure that is `Send + Sync` is an objective.
/// Implementations must be total over the configured domain: NaN or infinity
/// inside it aborts the run.
pub trait Objective: Send + Sync {
    fn evaluate(&self, x: f64, y: f64) -> f64;
}

impl<F> Objective for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// `100 (y - x^2)^2 + (1 - x)^2`
pub fn rosenbrock(x: f64, y: f64) -> f64 {
    100.0 * (y - x.powi(2)).powi(2) + (1.0 - x).powi(2)
}

/// `-x sin(sqrt|x|) - y sin(sqrt|y|)`
pub fn schwefel(x: f64, y: f64) -> f64 {
    -x * x.abs().sqrt().sin() - y * y.abs().sqrt().sin()
}

/// The default objective: `rosenbrock(x, y) - schwefel(x, y)`.
///
/// Over `[-2, 2] x [-2, 2]` it stays below 4000, the default upperbound.
#[derive(Debug, Clone, Copy, Default)]
pub struct Benchmark;

impl Objective for Benchmark {
    fn evaluate(&self, x: f64, y: f64) -> f64 {
        rosenbrock(x, y) - schwefel(x, y)
    }
}
