//! API response and query types.
//!
//! Dispatch field names follow the CSV export columns.

use serde::{Deserialize, Serialize};

use crate::optimizer::Termination;
use crate::options::{Options, SolverConfig};
use crate::sim::kpi::DispatchKpis;
use crate::sizing::{CapacityMix, OptimizationResult};

/// Summary of the sizing run.
#[derive(Debug, Serialize)]
pub struct ResultResponse {
    /// Optimal capacities.
    pub capacity: CapacityMix,
    /// Levelized cost of energy.
    pub cost: f64,
    /// Worst hourly `supply − load`.
    pub feasibility_margin: f64,
    /// Optimizer generations run.
    pub generations: usize,
    /// Why the optimizer stopped.
    pub termination: Termination,
    /// Dispatch indicators.
    pub kpis: DispatchKpis,
    /// Options used.
    pub options: Options,
    /// Solver hyperparameters used.
    pub solver: SolverConfig,
}

/// One hour of the dispatch trace.
#[derive(Debug, Serialize)]
pub struct DispatchRecord {
    /// Hour index.
    pub hour: usize,
    /// Demand.
    pub load: f64,
    /// PV output.
    pub pv: f64,
    /// Hydro output (0 when hydro was not sized).
    pub hydro: f64,
    /// Energy delivered by the battery.
    pub battery_discharge: f64,
    /// Surplus taken in by the battery.
    pub battery_charge: f64,
    /// Stored energy at the end of the hour.
    pub battery_soc: f64,
    /// Diesel output.
    pub diesel: f64,
    /// Curtailed surplus.
    pub curtailed: f64,
    /// Uncovered demand.
    pub unmet: f64,
}

impl DispatchRecord {
    /// Extracts hour `hour` from `result`.
    ///
    /// # Panics
    ///
    /// Panics if `hour >= result.hours()`.
    pub fn at(result: &OptimizationResult, hour: usize) -> Self {
        Self {
            hour,
            load: result.load_echo[hour],
            pv: result.pv_output[hour],
            hydro: result.hydro_output.as_ref().map_or(0.0, |h| h[hour]),
            battery_discharge: result.battery_discharge[hour],
            battery_charge: result.battery_charge[hour],
            battery_soc: result.battery_soc[hour],
            diesel: result.diesel_output[hour],
            curtailed: result.curtailed[hour],
            unmet: result.unmet[hour],
        }
    }
}

/// Optional range query parameters for the dispatch endpoint.
#[derive(Debug, Deserialize)]
pub struct DispatchQuery {
    /// Start hour (inclusive).
    pub from: Option<usize>,
    /// End hour (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
