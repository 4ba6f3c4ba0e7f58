//! Shared test fixtures for integration tests.

use minigrid_sizer::sources::profiles::{LoadShape, pv_unit_profile, sinusoidal_load};
use minigrid_sizer::{OptimizationParams, OptimizationResult, Options, SolverConfig};

/// Hourly shortfall accepted as meeting demand.
pub const TOLERANCE: f64 = 1e-4;

/// Seeded solver with a short generation budget.
pub fn fast_solver(seed: u64, max_iter: usize) -> SolverConfig {
    SolverConfig {
        max_iter,
        ..SolverConfig::default().with_seed(seed)
    }
}

/// Constant load with constant unit PV output.
pub fn flat_params(load_kw: f64, pv_unit: f64, hours: usize) -> OptimizationParams {
    OptimizationParams::new(vec![load_kw; hours], vec![pv_unit; hours], Options::default())
}

/// Sinusoidal village load with a 6:00–18:00 PV day.
pub fn village_params(days: usize) -> OptimizationParams {
    let hours = days * 24;
    let shape = LoadShape {
        base_kw: 20.0,
        amp_kw: 8.0,
        phase_rad: 1.2,
        noise_std: 1.0,
    };
    OptimizationParams::new(
        sinusoidal_load(&shape, hours, 42),
        pv_unit_profile(6, 18, 0.05, hours, 43),
        Options::default(),
    )
}

/// Asserts every hourly bound and the supply/demand balance of `result`.
pub fn assert_dispatch_invariants(params: &OptimizationParams, result: &OptimizationResult) {
    let cap = result.capacity;
    let floor = params.options.battery.floor_fraction() * cap.battery;
    let hours = params.load.len();

    for series in [
        &result.pv_output,
        &result.battery_discharge,
        &result.battery_soc,
        &result.diesel_output,
        &result.load_echo,
    ] {
        assert_eq!(series.len(), hours);
    }

    for t in 0..hours {
        let soc = result.battery_soc[t];
        assert!(
            soc >= floor - 1e-9 && soc <= cap.battery + 1e-9,
            "hour {t}: soc {soc} outside [{floor}, {}]",
            cap.battery
        );
        let diesel = result.diesel_output[t];
        assert!(
            (0.0..=cap.diesel + 1e-9).contains(&diesel),
            "hour {t}: diesel {diesel} outside [0, {}]",
            cap.diesel
        );
        assert!(result.pv_output[t] >= 0.0 && result.battery_discharge[t] >= 0.0);

        let hydro = result.hydro_output.as_ref().map_or(0.0, |h| h[t]);
        let supply = result.pv_output[t] + hydro + result.battery_discharge[t] + diesel;
        assert!(
            supply >= params.load[t] - TOLERANCE,
            "hour {t}: supply {supply} below load {}",
            params.load[t]
        );
    }
}
