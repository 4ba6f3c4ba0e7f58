use std::fmt;

use rand::Rng;
use rand::seq::index;
use serde::Serialize;

use crate::options::{MIN_POP_SIZE, SolverConfig};

use super::Bounds;
use super::control::{CancelToken, GenerationReport};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The generation budget was used up.
    MaxIterations,
    /// The score spread fell below the tolerance.
    Converged,
    /// The cancel token fired.
    Cancelled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Termination::MaxIterations => "max iterations",
            Termination::Converged => "converged",
            Termination::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Hyperparameters of one differential-evolution run.
#[derive(Debug, Clone, PartialEq)]
pub struct DeParams {
    /// Number of individuals.
    pub pop_size: usize,
    /// Generation budget.
    pub max_iter: usize,
    /// Differential weight `F`.
    pub mutation: f64,
    /// Crossover probability `CR`.
    pub recombination: f64,
    /// Convergence threshold on `max(scores) − min(scores)`.
    pub tol: f64,
}

impl DeParams {
    /// Takes everything but the population size from `solver`.
    pub fn from_solver(solver: &SolverConfig, pop_size: usize) -> Self {
        Self {
            pop_size,
            max_iter: solver.max_iter,
            mutation: solver.mutation,
            recombination: solver.recombination,
            tol: solver.tol,
        }
    }
}

/// Outcome of a minimization.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Best vector found.
    pub x: Vec<f64>,
    /// Its score; `+∞` when no candidate ever scored finite.
    pub score: f64,
    /// Generations completed.
    pub generations: usize,
    /// Why the run stopped.
    pub termination: Termination,
    /// Final population.
    pub population: Vec<Vec<f64>>,
    /// Scores parallel to `population`.
    pub scores: Vec<f64>,
}

/// Classic DE/rand/1/bin over a box.
///
/// Each generation builds every trial from a snapshot of the previous
/// generation, so the order individuals are visited in does not matter.
/// A trial replaces its parent only when strictly better.
#[derive(Debug, Clone)]
pub struct DifferentialEvolution {
    params: DeParams,
}

impl DifferentialEvolution {
    /// Creates a solver.
    ///
    /// # Panics
    ///
    /// Panics if `params.pop_size < 4`; three donors distinct from the
    /// target are needed for every mutation.
    pub fn new(params: DeParams) -> Self {
        assert!(
            params.pop_size >= MIN_POP_SIZE,
            "population must hold at least {MIN_POP_SIZE} individuals"
        );
        Self { params }
    }

    /// Hyperparameters in use.
    pub fn params(&self) -> &DeParams {
        &self.params
    }

    /// Minimizes `objective` over `bounds`.
    ///
    /// NaN objective values are treated as `+∞`. `cancel` is polled before
    /// each generation and `on_generation` runs after each one.
    ///
    /// # Arguments
    ///
    /// * `objective` - Scalar function to minimize
    /// * `bounds` - Search box; every evaluated vector lies inside it
    /// * `rng` - Source of all randomness in the run
    /// * `cancel` - Stops the run between generations
    /// * `on_generation` - Progress callback
    pub fn minimize<F, R, P>(
        &self,
        mut objective: F,
        bounds: &Bounds,
        rng: &mut R,
        cancel: &CancelToken,
        mut on_generation: P,
    ) -> Minimum
    where
        F: FnMut(&[f64]) -> f64,
        R: Rng + ?Sized,
        P: FnMut(&GenerationReport),
    {
        let DeParams {
            pop_size,
            max_iter,
            mutation,
            recombination,
            tol,
        } = self.params;
        let dims = bounds.dims();

        let mut population: Vec<Vec<f64>> = (0..pop_size).map(|_| bounds.sample(rng)).collect();
        let mut scores: Vec<f64> = population.iter().map(|x| score_of(&mut objective, x)).collect();

        let mut generations = 0;
        let mut termination = Termination::MaxIterations;

        while generations < max_iter {
            if cancel.is_cancelled() {
                termination = Termination::Cancelled;
                break;
            }
            if spread(&scores) < tol {
                termination = Termination::Converged;
                break;
            }

            let parents = population.clone();
            let parent_scores = scores.clone();
            for i in 0..pop_size {
                let [a, b, c] = sample_donors(rng, pop_size, i);
                let mut trial: Vec<f64> = (0..dims)
                    .map(|j| {
                        if rng.random::<f64>() < recombination {
                            parents[a][j] + mutation * (parents[b][j] - parents[c][j])
                        } else {
                            parents[i][j]
                        }
                    })
                    .collect();
                bounds.clamp(&mut trial);

                let trial_score = score_of(&mut objective, &trial);
                if trial_score < parent_scores[i] {
                    population[i] = trial;
                    scores[i] = trial_score;
                }
            }

            generations += 1;
            on_generation(&GenerationReport {
                generation: generations,
                best_score: scores.iter().copied().fold(f64::INFINITY, f64::min),
                spread: spread(&scores),
            });
        }

        // Budget exhausted exactly as the population converged
        if termination == Termination::MaxIterations && spread(&scores) < tol {
            termination = Termination::Converged;
        }

        let best = best_index(&scores);
        Minimum {
            x: population[best].clone(),
            score: scores[best],
            generations,
            termination,
            population,
            scores,
        }
    }
}

fn score_of<F: FnMut(&[f64]) -> f64>(objective: &mut F, x: &[f64]) -> f64 {
    let v = objective(x);
    if v.is_nan() { f64::INFINITY } else { v }
}

/// `max − min` of the scores; NaN when both ends are infinite.
fn spread(scores: &[f64]) -> f64 {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    max - min
}

/// Index of the lowest score, first one on ties.
fn best_index(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate() {
        if s < scores[best] {
            best = i;
        }
    }
    best
}

/// Draws three distinct population indices, none equal to `target`.
///
/// # Panics
///
/// Panics if `pop_size < 4` or `target >= pop_size`.
pub fn sample_donors<R: Rng + ?Sized>(rng: &mut R, pop_size: usize, target: usize) -> [usize; 3] {
    assert!(target < pop_size, "target index out of range");
    let picked = index::sample(rng, pop_size - 1, 3);
    let mut donors = [0; 3];
    for (slot, idx) in donors.iter_mut().zip(picked.iter()) {
        // skip over the target so it can never be drawn
        *slot = if idx >= target { idx + 1 } else { idx };
    }
    donors
}
