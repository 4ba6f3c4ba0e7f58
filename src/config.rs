//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::options::{DieselOptions, HydroOptions, Options, PvOptions, SolverConfig};
use crate::series::{self, HOURS_PER_DAY};
use crate::sizing::OptimizationParams;
use crate::sources::profiles::{LoadShape, pv_unit_profile, sinusoidal_load};

/// Top-level scenario configuration parsed from TOML.
///
/// Missing sections fall back to their defaults. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Component economics and search bounds.
    #[serde(default)]
    pub options: Options,
    /// Optimizer hyperparameters.
    #[serde(default)]
    pub solver: SolverConfig,
    /// Synthetic demo series used when no CSV input is given.
    #[serde(default)]
    pub profile: ProfileConfig,
}

/// Synthetic input series parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    /// Number of days to generate (must be > 0).
    pub days: usize,
    /// Seed for load and PV noise.
    pub seed: u64,
    /// Baseline demand (kW).
    pub base_kw: f64,
    /// Sinusoidal amplitude (kW).
    pub amp_kw: f64,
    /// Phase offset (radians).
    pub phase_rad: f64,
    /// Load noise standard deviation (kW).
    pub noise_std: f64,
    /// Sunrise hour index (inclusive).
    pub sunrise_idx: usize,
    /// Sunset hour index (exclusive).
    pub sunset_idx: usize,
    /// Multiplicative PV noise standard deviation.
    pub pv_noise_std: f64,
    /// Normalized river flow per day; enables hydro sizing when set.
    pub hydro_daily: Option<Vec<f64>>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            days: 7,
            seed: 42,
            base_kw: 20.0,
            amp_kw: 8.0,
            phase_rad: 1.2,
            noise_std: 1.0,
            sunrise_idx: 6,
            sunset_idx: 18,
            pv_noise_std: 0.05,
            hydro_daily: None,
        }
    }
}

impl ProfileConfig {
    /// Number of generated hours.
    pub fn hours(&self) -> usize {
        self.days * HOURS_PER_DAY
    }

    fn load_shape(&self) -> LoadShape {
        LoadShape {
            base_kw: self.base_kw,
            amp_kw: self.amp_kw,
            phase_rad: self.phase_rad,
            noise_std: self.noise_std,
        }
    }

    fn validate_into(&self, errors: &mut Vec<ConfigError>) {
        if self.days == 0 {
            errors.push(ConfigError::new("profile.days", "must be > 0"));
        }
        for (field, value) in [
            ("profile.base_kw", self.base_kw),
            ("profile.amp_kw", self.amp_kw),
            ("profile.noise_std", self.noise_std),
            ("profile.pv_noise_std", self.pv_noise_std),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(ConfigError::new(field, "must be finite and >= 0"));
            }
        }
        if !self.phase_rad.is_finite() {
            errors.push(ConfigError::new("profile.phase_rad", "must be finite"));
        }
        if self.sunrise_idx >= self.sunset_idx {
            errors.push(ConfigError::new(
                "profile.sunrise_idx",
                "must be < profile.sunset_idx",
            ));
        }
        if self.sunset_idx > HOURS_PER_DAY {
            errors.push(ConfigError::new(
                "profile.sunset_idx",
                format!("must be <= {HOURS_PER_DAY}"),
            ));
        }
        if let Some(daily) = &self.hydro_daily {
            if daily.len() != self.days {
                errors.push(ConfigError::new(
                    "profile.hydro_daily",
                    format!("needs one value per day ({}), got {}", self.days, daily.len()),
                ));
            } else {
                let hourly = series::daily_to_hourly(daily);
                series::validate_unit_profile(errors, "profile.hydro_daily", &hourly, hourly.len());
            }
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: a PV / battery / diesel village grid.
    pub fn baseline() -> Self {
        Self {
            options: Options::default(),
            solver: SolverConfig::default().with_seed(42),
            profile: ProfileConfig::default(),
        }
    }

    /// Returns the hydro preset: a run-of-river site with a falling dry-season flow.
    pub fn hydro() -> Self {
        Self {
            options: Options {
                hydro: HydroOptions {
                    capex: 1500.0,
                    max: 25.0,
                },
                ..Options::default()
            },
            solver: SolverConfig {
                max_iter: 1000,
                ..SolverConfig::default().with_seed(42)
            },
            profile: ProfileConfig {
                hydro_daily: Some(vec![0.62, 0.58, 0.55, 0.51, 0.47, 0.44, 0.40]),
                ..ProfileConfig::default()
            },
        }
    }

    /// Returns the diesel-heavy preset: cheap fuel, pricey PV, short days.
    pub fn diesel_heavy() -> Self {
        Self {
            options: Options {
                diesel: DieselOptions {
                    capex: 200.0,
                    opex: 0.08,
                    ..DieselOptions::default()
                },
                pv: PvOptions {
                    capex: 1200.0,
                    ..PvOptions::default()
                },
                ..Options::default()
            },
            solver: SolverConfig::default().with_seed(42),
            profile: ProfileConfig {
                base_kw: 35.0,
                amp_kw: 12.0,
                sunrise_idx: 8,
                sunset_idx: 16,
                ..ProfileConfig::default()
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "hydro", "diesel_heavy"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "hydro" => Ok(Self::hydro()),
            "diesel_heavy" => Ok(Self::diesel_heavy()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.options.validate();
        errors.extend(self.solver.validate());
        self.profile.validate_into(&mut errors);
        errors
    }

    /// Synthesizes the scenario's input series.
    ///
    /// # Panics
    ///
    /// Panics if the profile's daylight window is invalid; call
    /// [`ScenarioConfig::validate`] first.
    pub fn build_params(&self) -> OptimizationParams {
        let p = &self.profile;
        let hours = p.hours();
        let load = sinusoidal_load(&p.load_shape(), hours, p.seed);
        let pv_unit = pv_unit_profile(
            p.sunrise_idx,
            p.sunset_idx,
            p.pv_noise_std,
            hours,
            p.seed.wrapping_add(1),
        );
        let params = OptimizationParams::new(load, pv_unit, self.options.clone());
        match &p.hydro_daily {
            Some(daily) => params.with_hydro(series::daily_to_hourly(daily)),
            None => params,
        }
    }
}
