//! Box-bounded global minimization.
//!
//! Nothing here knows about energy systems: the solver sees a scalar
//! objective over `f64` vectors and a set of per-coordinate bounds.

pub mod control;
/// Differential-evolution solver.
pub mod de;

use rand::Rng;

pub use control::{CancelToken, GenerationReport};
pub use de::{DeParams, DifferentialEvolution, Minimum, Termination};

/// Inclusive per-coordinate search box.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Creates bounds from matching lower and upper vectors.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ or any `lower[j] > upper[j]`.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Self {
        assert_eq!(lower.len(), upper.len(), "bound vectors must match");
        assert!(
            lower.iter().zip(&upper).all(|(lo, hi)| lo <= hi),
            "lower bound above upper bound"
        );
        Self { lower, upper }
    }

    /// Bounds `[0, upper[j]]` for every coordinate.
    pub fn from_upper(upper: Vec<f64>) -> Self {
        Self::new(vec![0.0; upper.len()], upper)
    }

    /// Number of coordinates.
    pub fn dims(&self) -> usize {
        self.lower.len()
    }

    /// Lower bounds.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper bounds.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Whether every coordinate of `x` lies inside the box.
    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.dims()
            && x
                .iter()
                .zip(self.lower.iter().zip(&self.upper))
                .all(|(v, (lo, hi))| (*lo..=*hi).contains(v))
    }

    /// Clamps `x` into the box in place.
    pub fn clamp(&self, x: &mut [f64]) {
        for (v, (lo, hi)) in x.iter_mut().zip(self.lower.iter().zip(&self.upper)) {
            *v = v.clamp(*lo, *hi);
        }
    }

    /// Draws a point uniformly from the box.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.lower
            .iter()
            .zip(&self.upper)
            .map(|(lo, hi)| lo + rng.random::<f64>() * (hi - lo))
            .collect()
    }
}
