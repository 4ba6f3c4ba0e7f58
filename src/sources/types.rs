//! Uniform records for generation sources and the single storage unit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::options::BatteryOptions;

/// Kind of a modeled generation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Photovoltaic array.
    Pv,
    /// Run-of-river hydro.
    Hydro,
    /// Diesel generator.
    Diesel,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Pv => "PV",
            SourceKind::Hydro => "Hydro",
            SourceKind::Diesel => "Diesel",
        };
        f.write_str(name)
    }
}

/// A generation source sized by the optimizer.
///
/// Sources with a `unit_output` profile are renewables: their output at hour
/// `t` is `capacity × unit_output[t]` and cannot be scheduled. Sources without
/// one are dispatchable and cover any deficit left after the battery, up to
/// their capacity.
#[derive(Debug, Clone)]
pub struct Source<'a> {
    /// What this source is.
    pub kind: SourceKind,
    /// Output per unit of installed capacity, one value per hour.
    pub unit_output: Option<&'a [f64]>,
    /// Capital cost per unit capacity.
    pub capex: f64,
    /// Operating cost per unit energy generated.
    pub opex: f64,
    /// Upper search bound for capacity.
    pub max: f64,
}

impl<'a> Source<'a> {
    /// Creates a renewable source following the given unit profile.
    pub fn renewable(kind: SourceKind, unit_output: &'a [f64], capex: f64, max: f64) -> Self {
        Self {
            kind,
            unit_output: Some(unit_output),
            capex,
            opex: 0.0,
            max,
        }
    }

    /// Creates a dispatchable source with a fuel cost.
    pub fn dispatchable(kind: SourceKind, capex: f64, opex: f64, max: f64) -> Self {
        Self {
            kind,
            unit_output: None,
            capex,
            opex,
            max,
        }
    }

    /// Whether output follows a fixed profile.
    pub fn is_renewable(&self) -> bool {
        self.unit_output.is_some()
    }

    /// Output of a renewable source at hour `t` for the given capacity.
    ///
    /// Returns 0.0 for dispatchable sources.
    pub fn profile_output(&self, capacity: f64, t: usize) -> f64 {
        self.unit_output.map_or(0.0, |unit| capacity * unit[t])
    }
}

/// Parameters of the storage unit, independent of its size.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageParams {
    /// State of charge at hour 0 as a fraction of capacity.
    pub initial_soc: f64,
    /// Reserve that must stay stored, as a fraction of capacity.
    pub floor_fraction: f64,
    /// One-way efficiency applied on charge and on discharge.
    pub efficiency: f64,
    /// Capital cost per unit capacity.
    pub capex: f64,
    /// Upper search bound for capacity.
    pub max: f64,
}

impl From<&BatteryOptions> for StorageParams {
    fn from(opts: &BatteryOptions) -> Self {
        Self {
            initial_soc: opts.initial_soc,
            floor_fraction: opts.floor_fraction(),
            efficiency: opts.efficiency,
            capex: opts.capex,
            max: opts.max,
        }
    }
}
