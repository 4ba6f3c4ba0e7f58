//! Off-grid mini-grid capacity sizing.
//!
//! Sizes PV, battery, diesel and optionally run-of-river hydro capacity for
//! an hourly load by minimizing the levelized cost of energy subject to the
//! simulated dispatch meeting demand every hour. A deterministic dispatch
//! simulator is searched by differential evolution.

/// Read-only HTTP API over a finished run.
#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
/// CSV import and export.
pub mod io;
/// Cost and feasibility of a capacity vector.
pub mod objective;
pub mod optimizer;
pub mod options;
pub mod series;
/// Dispatch simulation, power balance and KPIs.
pub mod sim;
pub mod sizing;
/// Generation sources, storage and synthetic profiles.
pub mod sources;
pub mod task;

pub use error::{ConfigError, Result, SizingError};
pub use optimizer::{CancelToken, GenerationReport};
pub use options::{Options, SolverConfig};
pub use sizing::{
    CapacityMix, OptimizationParams, OptimizationResult, optimize_capacity,
    optimize_capacity_with,
};
pub use task::SizingTask;
