//! Post-hoc KPI computation from a dispatch trace.

use std::fmt;

use serde::Serialize;

use crate::sources::SourceKind;

use super::types::{DispatchTrace, SystemModel};

/// Energy produced by one source over the simulated window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceEnergy {
    /// Source kind.
    pub kind: SourceKind,
    /// Total energy generated (before curtailment).
    pub energy: f64,
    /// Largest single-hour output.
    pub peak: f64,
}

/// Aggregate indicators derived from a complete dispatch trace.
///
/// Computed post-hoc so reported figures always match the trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchKpis {
    /// Total demand over the window.
    pub total_load: f64,
    /// Demand actually covered.
    pub served_energy: f64,
    /// Per-source generation.
    pub sources: Vec<SourceEnergy>,
    /// Share of served energy not supplied by dispatchable (fuel) sources.
    pub renewable_fraction: f64,
    /// Energy in plus energy out of the battery.
    pub battery_throughput: f64,
    /// Battery equivalent full cycles (throughput / 2 × capacity).
    pub battery_equivalent_full_cycles: f64,
    /// Renewable surplus that had nowhere to go.
    pub curtailed_energy: f64,
    /// Demand left uncovered.
    pub unmet_energy: f64,
    /// Hours in which any dispatchable source ran.
    pub dispatchable_hours: usize,
}

impl DispatchKpis {
    /// Computes all KPIs for `trace`, produced by `model` at `capacities`.
    pub fn from_trace(model: &SystemModel, capacities: &[f64], trace: &DispatchTrace) -> Self {
        let (_, battery_capacity) = model.split(capacities);
        let total_load: f64 = model.load.iter().sum();
        let unmet_energy: f64 = trace.unmet.iter().sum();
        let served_energy = total_load - unmet_energy;

        let sources: Vec<SourceEnergy> = model
            .sources
            .iter()
            .zip(&trace.source_output)
            .map(|(source, out)| SourceEnergy {
                kind: source.kind,
                energy: out.iter().sum(),
                peak: out.iter().copied().fold(0.0, f64::max),
            })
            .collect();

        let dispatchable_energy: f64 = model
            .sources
            .iter()
            .zip(&sources)
            .filter(|(source, _)| !source.is_renewable())
            .map(|(_, e)| e.energy)
            .sum();

        let dispatchable_hours = (0..trace.hours())
            .filter(|&t| {
                model
                    .sources
                    .iter()
                    .zip(&trace.source_output)
                    .any(|(source, out)| !source.is_renewable() && out[t] > 0.0)
            })
            .count();

        let renewable_fraction = if served_energy > 0.0 {
            (1.0 - dispatchable_energy / served_energy).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let battery_throughput: f64 = trace
            .battery_charge
            .iter()
            .zip(&trace.battery_discharge)
            .map(|(c, d)| c + d)
            .sum();

        let battery_equivalent_full_cycles = if battery_capacity > 0.0 {
            battery_throughput / (2.0 * battery_capacity)
        } else {
            0.0
        };

        Self {
            total_load,
            served_energy,
            sources,
            renewable_fraction,
            battery_throughput,
            battery_equivalent_full_cycles,
            curtailed_energy: trace.curtailed.iter().sum(),
            unmet_energy,
            dispatchable_hours,
        }
    }
}

impl fmt::Display for DispatchKpis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Dispatch KPIs ---")?;
        writeln!(f, "Total load:            {:.2}", self.total_load)?;
        writeln!(f, "Served:                {:.2}", self.served_energy)?;
        for s in &self.sources {
            writeln!(
                f,
                "{:<22} {:.2} (peak {:.2})",
                format!("{} energy:", s.kind),
                s.energy,
                s.peak
            )?;
        }
        writeln!(
            f,
            "Renewable fraction:    {:.1}%",
            self.renewable_fraction * 100.0
        )?;
        writeln!(
            f,
            "Battery throughput:    {:.2} ({:.2} equiv. cycles)",
            self.battery_throughput, self.battery_equivalent_full_cycles
        )?;
        writeln!(f, "Curtailed:             {:.2}", self.curtailed_energy)?;
        writeln!(f, "Unmet:                 {:.2}", self.unmet_energy)?;
        write!(f, "Dispatchable hours:    {}", self.dispatchable_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::dispatch::simulate;
    use crate::sources::{Source, StorageParams};

    fn storage() -> StorageParams {
        StorageParams {
            initial_soc: 0.5,
            floor_fraction: 0.1,
            efficiency: 1.0,
            capex: 140.0,
            max: 5000.0,
        }
    }

    fn model<'a>(load: &'a [f64], unit: &'a [f64]) -> SystemModel<'a> {
        SystemModel::new(
            load,
            vec![
                Source::renewable(SourceKind::Pv, unit, 720.0, 1000.0),
                Source::dispatchable(SourceKind::Diesel, 261.0, 0.2, 1000.0),
            ],
            storage(),
            5,
        )
    }

    #[test]
    fn diesel_only_has_zero_renewable_fraction() {
        let load = [5.0; 4];
        let unit = [0.0; 4];
        let m = model(&load, &unit);
        let x = [0.0, 10.0, 0.0];
        let kpi = DispatchKpis::from_trace(&m, &x, &simulate(&m, &x));
        assert_eq!(kpi.total_load, 20.0);
        assert_eq!(kpi.served_energy, 20.0);
        assert_eq!(kpi.renewable_fraction, 0.0);
        assert_eq!(kpi.dispatchable_hours, 4);
        assert_eq!(kpi.sources[1].energy, 20.0);
        assert_eq!(kpi.sources[1].peak, 5.0);
    }

    #[test]
    fn pv_only_is_fully_renewable() {
        let load = [5.0; 4];
        let unit = [1.0; 4];
        let m = model(&load, &unit);
        let x = [5.0, 0.0, 0.0];
        let kpi = DispatchKpis::from_trace(&m, &x, &simulate(&m, &x));
        assert_eq!(kpi.renewable_fraction, 1.0);
        assert_eq!(kpi.dispatchable_hours, 0);
        assert_eq!(kpi.unmet_energy, 0.0);
    }

    #[test]
    fn curtailment_and_unmet_are_tracked() {
        let load = [0.0, 10.0];
        let unit = [1.0, 0.0];
        let m = model(&load, &unit);
        // no battery, no diesel: hour 0 curtails 6, hour 1 misses 10
        let x = [6.0, 0.0, 0.0];
        let kpi = DispatchKpis::from_trace(&m, &x, &simulate(&m, &x));
        assert_eq!(kpi.curtailed_energy, 6.0);
        assert_eq!(kpi.unmet_energy, 10.0);
        assert_eq!(kpi.served_energy, 0.0);
        assert_eq!(kpi.renewable_fraction, 0.0);
    }

    #[test]
    fn battery_cycles_from_throughput() {
        let load = [0.0, 4.0];
        let unit = [1.0, 0.0];
        let m = model(&load, &unit);
        // battery 10 at 5 stored: charge 4 (to 9), discharge 4
        let x = [4.0, 0.0, 10.0];
        let kpi = DispatchKpis::from_trace(&m, &x, &simulate(&m, &x));
        assert!((kpi.battery_throughput - 8.0).abs() < 1e-12);
        assert!((kpi.battery_equivalent_full_cycles - 0.4).abs() < 1e-12);
    }

    #[test]
    fn display_does_not_panic() {
        let load = [1.0; 2];
        let unit = [1.0; 2];
        let m = model(&load, &unit);
        let x = [1.0, 0.0, 0.0];
        let kpi = DispatchKpis::from_trace(&m, &x, &simulate(&m, &x));
        assert!(format!("{kpi}").contains("Renewable fraction"));
    }
}
