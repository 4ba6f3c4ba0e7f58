//! Economic and technical constants for a sizing run, plus solver hyperparameters.
//!
//! Defaults describe a small village mini-grid priced per kW / kWh.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default upper search bound for PV capacity.
pub const DEFAULT_PV_MAX: f64 = 1000.0;
/// Default upper search bound for battery capacity.
pub const DEFAULT_BATTERY_MAX: f64 = 5000.0;
/// Default upper search bound for diesel capacity.
pub const DEFAULT_DIESEL_MAX: f64 = 1000.0;

/// Default population size without a hydro dimension.
pub const DEFAULT_POP_SIZE: usize = 20;
/// Default population size once a hydro dimension is added.
pub const DEFAULT_POP_SIZE_WITH_HYDRO: usize = 500;
/// Smallest population that still allows three distinct donors per individual.
pub const MIN_POP_SIZE: usize = 4;

/// Economic and technical options for every modeled component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Design horizon in years; the sampled window is scaled to `years × 8760` hours.
    pub years: u32,
    /// Battery storage parameters.
    pub battery: BatteryOptions,
    /// Diesel generator parameters.
    pub diesel: DieselOptions,
    /// Photovoltaic array parameters.
    pub pv: PvOptions,
    /// Run-of-river hydro parameters.
    pub hydro: HydroOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            years: 5,
            battery: BatteryOptions::default(),
            diesel: DieselOptions::default(),
            pv: PvOptions::default(),
            hydro: HydroOptions::default(),
        }
    }
}

/// Battery storage parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryOptions {
    /// State of charge at hour 0 as a fraction of capacity (0.0–1.0).
    pub initial_soc: f64,
    /// Usable fraction of capacity; the remaining `1 - max_discharge` is a floor reserve.
    pub max_discharge: f64,
    /// One-way efficiency applied on charge and again on discharge.
    pub efficiency: f64,
    /// Capital cost per unit capacity.
    pub capex: f64,
    /// Upper search bound for capacity.
    pub max: f64,
}

impl Default for BatteryOptions {
    fn default() -> Self {
        Self {
            initial_soc: 0.5,
            max_discharge: 0.9,
            // 95% round trip split evenly over charge and discharge
            efficiency: 0.95_f64.sqrt(),
            capex: 140.0,
            max: DEFAULT_BATTERY_MAX,
        }
    }
}

impl BatteryOptions {
    /// Fraction of capacity that must stay in the battery.
    pub fn floor_fraction(&self) -> f64 {
        1.0 - self.max_discharge
    }
}

/// Diesel generator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DieselOptions {
    /// Capital cost per unit capacity.
    pub capex: f64,
    /// Fuel cost per unit energy generated.
    pub opex: f64,
    /// Upper search bound for capacity.
    pub max: f64,
}

impl Default for DieselOptions {
    fn default() -> Self {
        Self {
            capex: 261.0,
            opex: 0.2,
            max: DEFAULT_DIESEL_MAX,
        }
    }
}

/// Photovoltaic array parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PvOptions {
    /// Capital cost per unit capacity.
    pub capex: f64,
    /// Upper search bound for capacity.
    pub max: f64,
}

impl Default for PvOptions {
    fn default() -> Self {
        Self {
            capex: 720.0,
            max: DEFAULT_PV_MAX,
        }
    }
}

/// Run-of-river hydro parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HydroOptions {
    /// Capital cost per unit capacity.
    pub capex: f64,
    /// Hard installable cap for the site.
    pub max: f64,
}

fn check_non_negative(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !value.is_finite() || value < 0.0 {
        errors.push(ConfigError::new(field, "must be finite and >= 0"));
    }
}

impl Options {
    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the options are valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.years == 0 {
            errors.push(ConfigError::new("options.years", "must be > 0"));
        }

        let bat = &self.battery;
        if !(0.0..=1.0).contains(&bat.initial_soc) {
            errors.push(ConfigError::new(
                "options.battery.initial_soc",
                "must be in [0.0, 1.0]",
            ));
        }
        if !(0.0..1.0).contains(&bat.max_discharge) {
            errors.push(ConfigError::new(
                "options.battery.max_discharge",
                "must be in [0.0, 1.0)",
            ));
        }
        if !(bat.efficiency > 0.0 && bat.efficiency <= 1.0) {
            errors.push(ConfigError::new(
                "options.battery.efficiency",
                "must be in (0.0, 1.0]",
            ));
        }
        if bat.initial_soc < bat.floor_fraction() {
            errors.push(ConfigError::new(
                "options.battery.initial_soc",
                format!(
                    "must be >= the reserve floor 1 - max_discharge ({:.3})",
                    bat.floor_fraction()
                ),
            ));
        }
        check_non_negative(&mut errors, "options.battery.capex", bat.capex);
        check_non_negative(&mut errors, "options.battery.max", bat.max);

        check_non_negative(&mut errors, "options.diesel.capex", self.diesel.capex);
        check_non_negative(&mut errors, "options.diesel.opex", self.diesel.opex);
        check_non_negative(&mut errors, "options.diesel.max", self.diesel.max);

        check_non_negative(&mut errors, "options.pv.capex", self.pv.capex);
        check_non_negative(&mut errors, "options.pv.max", self.pv.max);

        check_non_negative(&mut errors, "options.hydro.capex", self.hydro.capex);
        check_non_negative(&mut errors, "options.hydro.max", self.hydro.max);

        errors
    }
}

/// Differential-evolution hyperparameters.
///
/// Larger populations and generation budgets trade runtime for solution
/// quality. Without a `seed` every run draws fresh OS entropy, so repeated
/// runs on identical input may return different, similarly scored capacities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Population size; `None` picks 20 without hydro and 500 with hydro.
    pub pop_size: Option<usize>,
    /// Generation budget.
    pub max_iter: usize,
    /// Mutation (differential weight) factor `F`.
    pub mutation: f64,
    /// Crossover probability `CR`.
    pub recombination: f64,
    /// Stop once `max(scores) - min(scores)` falls below this.
    pub tol: f64,
    /// Random seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            pop_size: None,
            max_iter: 5000,
            mutation: 0.5,
            recombination: 0.7,
            tol: 1e-7,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Population size for the given problem variant.
    pub fn pop_size_for(&self, with_hydro: bool) -> usize {
        match self.pop_size {
            Some(n) => n,
            None if with_hydro => DEFAULT_POP_SIZE_WITH_HYDRO,
            None => DEFAULT_POP_SIZE,
        }
    }

    /// Returns a copy with the given seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates all fields and returns a list of errors.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.pop_size.is_some_and(|n| n < MIN_POP_SIZE) {
            errors.push(ConfigError::new(
                "solver.pop_size",
                format!("must be >= {MIN_POP_SIZE}"),
            ));
        }
        if self.max_iter == 0 {
            errors.push(ConfigError::new("solver.max_iter", "must be > 0"));
        }
        if !(self.mutation > 0.0 && self.mutation <= 2.0) {
            errors.push(ConfigError::new("solver.mutation", "must be in (0.0, 2.0]"));
        }
        if !(0.0..=1.0).contains(&self.recombination) {
            errors.push(ConfigError::new(
                "solver.recombination",
                "must be in [0.0, 1.0]",
            ));
        }
        check_non_negative(&mut errors, "solver.tol", self.tol);

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Options::default().validate().is_empty());
        assert!(SolverConfig::default().validate().is_empty());
    }

    #[test]
    fn default_efficiency_is_sqrt_of_round_trip() {
        let eff = BatteryOptions::default().efficiency;
        assert!((eff * eff - 0.95).abs() < 1e-12);
    }

    #[test]
    fn zero_years_rejected() {
        let opts = Options {
            years: 0,
            ..Options::default()
        };
        assert!(opts.validate().iter().any(|e| e.field == "options.years"));
    }

    #[test]
    fn zero_efficiency_rejected() {
        let mut opts = Options::default();
        opts.battery.efficiency = 0.0;
        let errors = opts.validate();
        assert!(errors.iter().any(|e| e.field == "options.battery.efficiency"));
    }

    #[test]
    fn full_discharge_rejected() {
        let mut opts = Options::default();
        opts.battery.max_discharge = 1.0;
        let errors = opts.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "options.battery.max_discharge")
        );
    }

    #[test]
    fn negative_capex_rejected() {
        let mut opts = Options::default();
        opts.pv.capex = -1.0;
        assert!(opts.validate().iter().any(|e| e.field == "options.pv.capex"));
    }

    #[test]
    fn nan_opex_rejected() {
        let mut opts = Options::default();
        opts.diesel.opex = f64::NAN;
        assert!(
            opts.validate()
                .iter()
                .any(|e| e.field == "options.diesel.opex")
        );
    }

    #[test]
    fn initial_soc_below_floor_rejected() {
        let mut opts = Options::default();
        opts.battery.max_discharge = 0.5;
        opts.battery.initial_soc = 0.2;
        assert!(
            opts.validate()
                .iter()
                .any(|e| e.field == "options.battery.initial_soc")
        );
    }

    #[test]
    fn pop_size_defaults_per_variant() {
        let solver = SolverConfig::default();
        assert_eq!(solver.pop_size_for(false), 20);
        assert_eq!(solver.pop_size_for(true), 500);

        let pinned = SolverConfig {
            pop_size: Some(42),
            ..SolverConfig::default()
        };
        assert_eq!(pinned.pop_size_for(true), 42);
    }

    #[test]
    fn tiny_population_rejected() {
        let solver = SolverConfig {
            pop_size: Some(3),
            ..SolverConfig::default()
        };
        assert!(
            solver
                .validate()
                .iter()
                .any(|e| e.field == "solver.pop_size")
        );
    }

    #[test]
    fn recombination_out_of_range_rejected() {
        let solver = SolverConfig {
            recombination: 1.5,
            ..SolverConfig::default()
        };
        assert!(
            solver
                .validate()
                .iter()
                .any(|e| e.field == "solver.recombination")
        );
    }
}
