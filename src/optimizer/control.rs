//! Run control shared between a sizing run and its caller.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

/// Cooperative cancellation flag.
///
/// Clones share the same flag. The optimizer polls it once per generation,
/// so a cancelled run stops within one generation's worth of evaluations.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Progress snapshot published after each completed generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Generations completed so far (1-based).
    pub generation: usize,
    /// Lowest score in the population.
    pub best_score: f64,
    /// `max(scores) − min(scores)`; NaN while every score is infinite.
    pub spread: f64,
}
