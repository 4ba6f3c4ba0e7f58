//! Background sizing runs with progress and cancellation.
//!
//! A [`SizingTask`] owns one sizing run on a dedicated OS thread. The caller
//! keeps a handle that can be awaited (or blocked on), polled for the latest
//! [`GenerationReport`], and cancelled.

use std::thread;

use tokio::sync::{oneshot, watch};

use crate::error::{Result, SizingError};
use crate::optimizer::{CancelToken, GenerationReport};
use crate::options::SolverConfig;
use crate::sizing::{OptimizationParams, OptimizationResult, optimize_capacity_with};

/// Worker thread name.
const WORKER_NAME: &str = "minigrid-sizer";

/// Handle to a sizing run executing in the background.
#[derive(Debug)]
pub struct SizingTask {
    cancel: CancelToken,
    progress: watch::Receiver<Option<GenerationReport>>,
    result: oneshot::Receiver<Result<OptimizationResult>>,
}

impl SizingTask {
    /// Starts a sizing run on a new thread.
    ///
    /// # Errors
    ///
    /// [`SizingError::TaskSpawn`] if the thread cannot be created. Input
    /// validation errors arrive through [`SizingTask::join`].
    pub fn spawn(params: OptimizationParams, solver: SolverConfig) -> Result<Self> {
        Self::spawn_with_token(params, solver, CancelToken::new())
    }

    /// Starts a sizing run controlled by an existing cancel token.
    pub fn spawn_with_token(
        params: OptimizationParams,
        solver: SolverConfig,
        cancel: CancelToken,
    ) -> Result<Self> {
        let (progress_tx, progress_rx) = watch::channel(None);
        let (result_tx, result_rx) = oneshot::channel();
        let worker_cancel = cancel.clone();

        thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || {
                let result = optimize_capacity_with(&params, &solver, &worker_cancel, |report| {
                    progress_tx.send_replace(Some(*report));
                });
                // Receiver gone means nobody wants the result
                let _ = result_tx.send(result);
            })
            .map_err(SizingError::TaskSpawn)?;

        Ok(Self {
            cancel,
            progress: progress_rx,
            result: result_rx,
        })
    }

    /// Requests cancellation; the run stops before its next generation.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A clone of the run's cancel token.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Receiver for the latest generation report (`None` before the first).
    pub fn progress(&self) -> watch::Receiver<Option<GenerationReport>> {
        self.progress.clone()
    }

    /// Waits for the run to finish.
    ///
    /// # Errors
    ///
    /// Whatever the run returned, or [`SizingError::TaskLost`] if the worker
    /// died without sending a result.
    pub async fn join(self) -> Result<OptimizationResult> {
        self.result.await?
    }

    /// Blocks the current thread until the run finishes.
    ///
    /// # Panics
    ///
    /// Panics when called from inside an async runtime.
    pub fn blocking_join(self) -> Result<OptimizationResult> {
        self.result.blocking_recv()?
    }
}
