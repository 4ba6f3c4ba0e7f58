//! Capacity sizing: validate inputs, search the capacity box, re-simulate the winner.

use std::fmt;

use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result, SizingError, first_error};
use crate::objective::CostModel;
use crate::optimizer::{
    Bounds, CancelToken, DeParams, DifferentialEvolution, GenerationReport, Termination,
};
use crate::options::{Options, SolverConfig};
use crate::series;
use crate::sim::dispatch::simulate;
use crate::sim::kpi::DispatchKpis;
use crate::sim::power_balance;
use crate::sim::types::SystemModel;
use crate::sources::{Source, SourceKind, StorageParams};

/// Generations between debug progress lines.
const LOG_STRIDE: usize = 100;

/// Input to one sizing run.
///
/// Supplying `hydro_unit` adds a fourth decision dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationParams {
    /// Hourly demand.
    pub load: Vec<f64>,
    /// PV output per unit capacity, one value per hour.
    pub pv_unit: Vec<f64>,
    /// Hydro output per unit capacity, one value per hour.
    pub hydro_unit: Option<Vec<f64>>,
    /// Economic and technical options.
    pub options: Options,
}

impl OptimizationParams {
    /// Creates a PV / battery / diesel problem.
    pub fn new(load: Vec<f64>, pv_unit: Vec<f64>, options: Options) -> Self {
        Self {
            load,
            pv_unit,
            hydro_unit: None,
            options,
        }
    }

    /// Adds a hydro profile.
    pub fn with_hydro(mut self, hydro_unit: Vec<f64>) -> Self {
        self.hydro_unit = Some(hydro_unit);
        self
    }

    /// Whether the hydro dimension is sized.
    pub fn has_hydro(&self) -> bool {
        self.hydro_unit.is_some()
    }

    /// Validates all series and options and returns a list of errors.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        series::validate_load(&mut errors, "load", &self.load);
        series::validate_unit_profile(&mut errors, "pv_unit", &self.pv_unit, self.load.len());
        if let Some(hydro) = &self.hydro_unit {
            series::validate_unit_profile(&mut errors, "hydro_unit", hydro, self.load.len());
        }
        errors.extend(self.options.validate());
        errors
    }
}

/// Installed capacity per component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapacityMix {
    pub pv: f64,
    pub battery: f64,
    pub diesel: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hydro: Option<f64>,
}

impl fmt::Display for CapacityMix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PV {:.2}, battery {:.2}, diesel {:.2}",
            self.pv, self.battery, self.diesel
        )?;
        if let Some(hydro) = self.hydro {
            write!(f, ", hydro {hydro:.2}")?;
        }
        Ok(())
    }
}

/// Outcome of a successful sizing run.
///
/// Every series has one value per input hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    /// Optimal capacities.
    pub capacity: CapacityMix,
    /// Absolute PV output.
    pub pv_output: Vec<f64>,
    /// Absolute hydro output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hydro_output: Option<Vec<f64>>,
    /// Energy delivered by the battery.
    pub battery_discharge: Vec<f64>,
    /// Surplus taken in by the battery.
    pub battery_charge: Vec<f64>,
    /// Stored energy at the end of each hour.
    pub battery_soc: Vec<f64>,
    /// Diesel output.
    pub diesel_output: Vec<f64>,
    /// Surplus curtailed.
    pub curtailed: Vec<f64>,
    /// Demand left uncovered.
    pub unmet: Vec<f64>,
    /// The load the run was sized against.
    pub load_echo: Vec<f64>,
    /// Levelized cost of energy.
    pub cost: f64,
    /// Worst hourly `supply − load` at the optimum.
    pub feasibility_margin: f64,
    /// Generations run by the optimizer.
    pub generations: usize,
    /// Why the optimizer stopped.
    pub termination: Termination,
    /// Dispatch indicators at the optimum.
    pub kpis: DispatchKpis,
}

impl OptimizationResult {
    /// Number of hours covered.
    pub fn hours(&self) -> usize {
        self.load_echo.len()
    }
}

impl fmt::Display for OptimizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Sizing Result ---")?;
        writeln!(f, "Capacity:    {}", self.capacity)?;
        writeln!(f, "LCOE:        {:.6}", self.cost)?;
        writeln!(f, "Margin:      {:.6}", self.feasibility_margin)?;
        writeln!(
            f,
            "Optimizer:   {} generations ({})",
            self.generations, self.termination
        )?;
        write!(f, "{}", self.kpis)
    }
}

/// Builds the system model for `params`.
///
/// Sources are ordered PV, diesel, then hydro when present; the battery
/// closes the capacity vector.
pub fn build_model(params: &OptimizationParams) -> SystemModel<'_> {
    let opts = &params.options;
    let mut sources = vec![
        Source::renewable(SourceKind::Pv, &params.pv_unit, opts.pv.capex, opts.pv.max),
        Source::dispatchable(
            SourceKind::Diesel,
            opts.diesel.capex,
            opts.diesel.opex,
            opts.diesel.max,
        ),
    ];
    if let Some(hydro) = &params.hydro_unit {
        sources.push(Source::renewable(
            SourceKind::Hydro,
            hydro,
            opts.hydro.capex,
            opts.hydro.max,
        ));
    }
    SystemModel::new(
        &params.load,
        sources,
        StorageParams::from(&opts.battery),
        opts.years,
    )
}

/// Search box `[0, max]` for every source and the battery.
pub fn build_bounds(model: &SystemModel) -> Bounds {
    let mut upper: Vec<f64> = model.sources.iter().map(|s| s.max).collect();
    upper.push(model.storage.max);
    Bounds::from_upper(upper)
}

fn capacity_mix(model: &SystemModel, x: &[f64]) -> CapacityMix {
    let at = |kind| model.source_index(kind).map(|i| x[i]);
    CapacityMix {
        pv: at(SourceKind::Pv).unwrap_or(0.0),
        battery: x[model.battery_index()],
        diesel: at(SourceKind::Diesel).unwrap_or(0.0),
        hydro: at(SourceKind::Hydro),
    }
}

/// Sizes the system for `params`.
///
/// Without `solver.seed` the run draws OS entropy and repeated calls may
/// return different, similarly scored capacities.
///
/// # Errors
///
/// * [`SizingError::InvalidInput`] when a series or option is rejected
/// * [`SizingError::Infeasible`] when no candidate met demand
pub fn optimize_capacity(
    params: &OptimizationParams,
    solver: &SolverConfig,
) -> Result<OptimizationResult> {
    optimize_capacity_with(params, solver, &CancelToken::new(), |_| {})
}

/// Like [`optimize_capacity`], with cancellation and per-generation progress.
///
/// # Errors
///
/// As [`optimize_capacity`], plus [`SizingError::Cancelled`] once `cancel`
/// fires.
pub fn optimize_capacity_with<P>(
    params: &OptimizationParams,
    solver: &SolverConfig,
    cancel: &CancelToken,
    mut on_generation: P,
) -> Result<OptimizationResult>
where
    P: FnMut(&GenerationReport),
{
    first_error(params.validate())?;
    first_error(solver.validate())?;

    let model = build_model(params);
    let bounds = build_bounds(&model);
    let evaluator = CostModel::new(&model);
    let de_params = DeParams::from_solver(solver, solver.pop_size_for(params.has_hydro()));
    let mut rng = match solver.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    info!(
        hours = model.hours(),
        dims = bounds.dims(),
        pop_size = de_params.pop_size,
        max_iter = de_params.max_iter,
        seed = ?solver.seed,
        "starting capacity search"
    );

    let de = DifferentialEvolution::new(de_params);
    let minimum = de.minimize(
        |x| evaluator.penalized_objective(x),
        &bounds,
        &mut rng,
        cancel,
        |report| {
            if report.generation % LOG_STRIDE == 0 {
                debug!(
                    generation = report.generation,
                    best = report.best_score,
                    spread = report.spread,
                    "generation complete"
                );
            }
            on_generation(report);
        },
    );

    if minimum.termination == Termination::Cancelled {
        warn!(generation = minimum.generations, "capacity search cancelled");
        return Err(SizingError::Cancelled {
            generation: minimum.generations,
        });
    }

    if !minimum.score.is_finite() {
        let best_margin = minimum
            .population
            .iter()
            .map(|x| evaluator.feasibility_margin(x))
            .fold(f64::NEG_INFINITY, f64::max);
        warn!(best_margin, "no feasible capacity mix");
        return Err(SizingError::Infeasible { best_margin });
    }

    let x = minimum.x;
    let trace = simulate(&model, &x);
    let cost = evaluator.levelized_cost(&x, &trace);
    let feasibility_margin = power_balance::feasibility_margin(&trace, &params.load);
    let kpis = DispatchKpis::from_trace(&model, &x, &trace);
    let capacity = capacity_mix(&model, &x);

    info!(
        %capacity,
        cost,
        generations = minimum.generations,
        termination = %minimum.termination,
        "capacity search finished"
    );

    let output_of = |kind| model.source_index(kind).map(|i| trace.source_output[i].clone());
    Ok(OptimizationResult {
        capacity,
        pv_output: output_of(SourceKind::Pv).unwrap_or_default(),
        hydro_output: output_of(SourceKind::Hydro),
        diesel_output: output_of(SourceKind::Diesel).unwrap_or_default(),
        battery_discharge: trace.battery_discharge,
        battery_charge: trace.battery_charge,
        battery_soc: trace.battery_soc,
        curtailed: trace.curtailed,
        unmet: trace.unmet,
        load_echo: params.load.clone(),
        cost,
        feasibility_margin,
        generations: minimum.generations,
        termination: minimum.termination,
        kpis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_params() -> OptimizationParams {
        OptimizationParams::new(vec![10.0; 24], vec![1.0; 24], Options::default())
    }

    #[test]
    fn model_orders_sources_and_battery_last() {
        let params = flat_params().with_hydro(vec![0.5; 24]);
        let model = build_model(&params);
        let kinds: Vec<_> = model.sources.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, [SourceKind::Pv, SourceKind::Diesel, SourceKind::Hydro]);
        assert_eq!(model.battery_index(), 3);
    }

    #[test]
    fn bounds_follow_options() {
        let mut params = flat_params().with_hydro(vec![0.5; 24]);
        params.options.hydro.max = 40.0;
        let model = build_model(&params);
        let bounds = build_bounds(&model);
        assert_eq!(bounds.upper(), &[1000.0, 1000.0, 40.0, 5000.0]);
        assert_eq!(bounds.lower(), &[0.0; 4]);
    }

    #[test]
    fn capacity_mix_maps_vector_by_kind() {
        let params = flat_params().with_hydro(vec![0.5; 24]);
        let model = build_model(&params);
        let mix = capacity_mix(&model, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(
            mix,
            CapacityMix {
                pv: 1.0,
                diesel: 2.0,
                hydro: Some(3.0),
                battery: 4.0,
            }
        );
    }

    #[test]
    fn mismatched_profile_is_rejected() {
        let params = OptimizationParams::new(vec![1.0; 24], vec![0.5; 23], Options::default());
        match optimize_capacity(&params, &SolverConfig::default().with_seed(1)) {
            Err(SizingError::InvalidInput(e)) => assert_eq!(e.field, "pv_unit"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn bad_solver_config_is_rejected() {
        let solver = SolverConfig {
            pop_size: Some(2),
            ..SolverConfig::default()
        };
        match optimize_capacity(&flat_params(), &solver) {
            Err(SizingError::InvalidInput(e)) => assert_eq!(e.field, "solver.pop_size"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn cancelled_token_returns_cancelled() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = optimize_capacity_with(
            &flat_params(),
            &SolverConfig::default().with_seed(3),
            &cancel,
            |_| {},
        );
        assert!(matches!(
            result,
            Err(SizingError::Cancelled { generation: 0 })
        ));
    }

    #[test]
    fn result_display_lists_capacity() {
        let solver = SolverConfig {
            max_iter: 50,
            ..SolverConfig::default().with_seed(5)
        };
        let result = optimize_capacity(&flat_params(), &solver).unwrap();
        let text = result.to_string();
        assert!(text.contains("Capacity:"));
        assert!(text.contains("LCOE:"));
        assert_eq!(result.hours(), 24);
    }
}
