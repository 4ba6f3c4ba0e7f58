//! Levelized cost and feasibility of a capacity vector.
//!
//! The evaluator wraps the dispatch simulator and reduces each trace to two
//! numbers: the levelized cost of energy over the design horizon and the
//! worst hourly supply margin. The optimizer only ever sees the penalized
//! combination of the two.

use crate::sim::dispatch::simulate;
use crate::sim::power_balance;
use crate::sim::types::{DispatchTrace, SystemModel};

/// Worst hourly shortfall still accepted as meeting demand.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-4;

/// Cost and margin of one candidate, from a single simulator pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Levelized cost of energy.
    pub cost: f64,
    /// Smallest hourly `supply − load`.
    pub margin: f64,
}

impl Evaluation {
    /// Whether the margin lies within tolerance.
    pub fn is_feasible(&self) -> bool {
        self.margin >= -FEASIBILITY_TOLERANCE
    }

    /// The cost if feasible, `+∞` otherwise.
    pub fn penalized(&self) -> f64 {
        if self.is_feasible() {
            self.cost
        } else {
            f64::INFINITY
        }
    }
}

/// Objective evaluator over a fixed system model.
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'m> {
    model: &'m SystemModel<'m>,
}

impl<'m> CostModel<'m> {
    /// Creates an evaluator for `model`.
    pub fn new(model: &'m SystemModel<'m>) -> Self {
        Self { model }
    }

    /// The model being evaluated.
    pub fn model(&self) -> &SystemModel<'m> {
        self.model
    }

    /// Capital cost of every source plus the battery.
    pub fn capex_total(&self, capacities: &[f64]) -> f64 {
        let (source_caps, battery_cap) = self.model.split(capacities);
        let sources: f64 = self
            .model
            .sources
            .iter()
            .zip(source_caps)
            .map(|(source, cap)| source.capex * cap)
            .sum();
        sources + self.model.storage.capex * battery_cap
    }

    /// Operating cost of a trace, scaled to the design horizon.
    pub fn fuel_total(&self, trace: &DispatchTrace) -> f64 {
        let window: f64 = self
            .model
            .sources
            .iter()
            .zip(&trace.source_output)
            .map(|(source, out)| source.opex * out.iter().sum::<f64>())
            .sum();
        window * self.model.load_factor()
    }

    /// Levelized cost of `capacities` given their already simulated `trace`.
    ///
    /// With zero total load the cost per unit energy is undefined; the
    /// absolute cost `capex + fuel` is returned instead, so an all-zero mix
    /// still scores best.
    pub fn levelized_cost(&self, capacities: &[f64], trace: &DispatchTrace) -> f64 {
        let cost = self.capex_total(capacities) + self.fuel_total(trace);
        let energy: f64 = self.model.load.iter().sum::<f64>() * self.model.load_factor();
        if energy > 0.0 { cost / energy } else { cost }
    }

    /// Simulates once and returns both cost and margin.
    pub fn evaluate(&self, capacities: &[f64]) -> Evaluation {
        let trace = simulate(self.model, capacities);
        Evaluation {
            cost: self.levelized_cost(capacities, &trace),
            margin: power_balance::feasibility_margin(&trace, self.model.load),
        }
    }

    /// Levelized cost of energy for `capacities`.
    pub fn simulate_cost(&self, capacities: &[f64]) -> f64 {
        let trace = simulate(self.model, capacities);
        self.levelized_cost(capacities, &trace)
    }

    /// Worst hourly `supply − load` for `capacities`.
    pub fn feasibility_margin(&self, capacities: &[f64]) -> f64 {
        let trace = simulate(self.model, capacities);
        power_balance::feasibility_margin(&trace, self.model.load)
    }

    /// Cost if the margin is within tolerance, `+∞` otherwise.
    pub fn penalized_objective(&self, capacities: &[f64]) -> f64 {
        self.evaluate(capacities).penalized()
    }
}
