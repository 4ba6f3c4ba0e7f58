//! Core dispatch types: the system being sized and the per-hour trace.

use crate::sources::{Source, SourceKind, StorageParams};

/// Hours in a (non-leap) year.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Residual deficits smaller than this are floating-point noise, not demand.
pub const DISPATCH_EPSILON: f64 = 1e-7;

/// A system to be sized: load, candidate sources and one storage unit.
///
/// A capacity vector for this model has one entry per source, in list order,
/// followed by the battery capacity.
///
/// # Examples
///
/// ```
/// use minigrid_sizer::sim::types::SystemModel;
/// use minigrid_sizer::sources::{Source, SourceKind, StorageParams};
/// use minigrid_sizer::options::BatteryOptions;
///
/// let load = vec![10.0; 24];
/// let pv_unit = vec![1.0; 24];
/// let model = SystemModel::new(
///     &load,
///     vec![
///         Source::renewable(SourceKind::Pv, &pv_unit, 720.0, 1000.0),
///         Source::dispatchable(SourceKind::Diesel, 261.0, 0.2, 1000.0),
///     ],
///     StorageParams::from(&BatteryOptions::default()),
///     5,
/// );
/// assert_eq!(model.dims(), 3);
/// assert_eq!(model.load_factor(), 5.0 * 8760.0 / 24.0);
/// ```
#[derive(Debug, Clone)]
pub struct SystemModel<'a> {
    /// Hourly demand.
    pub load: &'a [f64],
    /// Generation sources in dispatch order.
    pub sources: Vec<Source<'a>>,
    /// The storage unit.
    pub storage: StorageParams,
    /// Design horizon in years.
    pub years: u32,
}

impl<'a> SystemModel<'a> {
    /// Creates a system model.
    pub fn new(
        load: &'a [f64],
        sources: Vec<Source<'a>>,
        storage: StorageParams,
        years: u32,
    ) -> Self {
        Self {
            load,
            sources,
            storage,
            years,
        }
    }

    /// Number of simulated hours.
    pub fn hours(&self) -> usize {
        self.load.len()
    }

    /// Length of a capacity vector for this model.
    pub fn dims(&self) -> usize {
        self.sources.len() + 1
    }

    /// Position of the battery in a capacity vector.
    pub fn battery_index(&self) -> usize {
        self.sources.len()
    }

    /// Position of the first source of `kind` in a capacity vector.
    pub fn source_index(&self, kind: SourceKind) -> Option<usize> {
        self.sources.iter().position(|s| s.kind == kind)
    }

    /// Scales the sampled window up to the full design horizon.
    ///
    /// The sampled pattern is assumed to repeat for `years × 8760` hours.
    pub fn load_factor(&self) -> f64 {
        f64::from(self.years) * HOURS_PER_YEAR / self.hours() as f64
    }

    /// Splits a capacity vector into source capacities and battery capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacities.len() != self.dims()`.
    pub fn split<'x>(&self, capacities: &'x [f64]) -> (&'x [f64], f64) {
        assert_eq!(
            capacities.len(),
            self.dims(),
            "capacity vector length must match the model"
        );
        let (sources, battery) = capacities.split_at(self.sources.len());
        (sources, battery[0])
    }
}

/// Per-hour dispatch quantities for one capacity vector.
///
/// All quantities are non-negative energies per hour, except `battery_soc`
/// which is the stored energy at the end of each hour.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchTrace {
    /// Output of each source, indexed like `SystemModel::sources`.
    pub source_output: Vec<Vec<f64>>,
    /// Energy delivered by the battery.
    pub battery_discharge: Vec<f64>,
    /// Surplus energy taken in by the battery (before charge losses).
    pub battery_charge: Vec<f64>,
    /// Stored energy at the end of each hour.
    pub battery_soc: Vec<f64>,
    /// Surplus that neither load nor battery could absorb.
    pub curtailed: Vec<f64>,
    /// Demand left uncovered after every source.
    pub unmet: Vec<f64>,
}

impl DispatchTrace {
    /// Creates a zeroed trace for `sources` sources over `hours` hours.
    pub fn zeroed(sources: usize, hours: usize) -> Self {
        Self {
            source_output: vec![vec![0.0; hours]; sources],
            battery_discharge: vec![0.0; hours],
            battery_charge: vec![0.0; hours],
            battery_soc: vec![0.0; hours],
            curtailed: vec![0.0; hours],
            unmet: vec![0.0; hours],
        }
    }

    /// Number of hours covered.
    pub fn hours(&self) -> usize {
        self.battery_soc.len()
    }

    /// Energy supplied towards load at hour `t`: all sources plus battery discharge.
    pub fn supply_at(&self, t: usize) -> f64 {
        self.source_output.iter().map(|out| out[t]).sum::<f64>() + self.battery_discharge[t]
    }
}
