//! Hourly supply/demand balance of a dispatch trace.

use super::types::DispatchTrace;

/// Net balance for one hour: supply towards load minus the load itself.
///
/// Positive means demand was covered with room to spare; negative means
/// part of the demand went unserved.
///
/// # Arguments
///
/// * `source_kw` - Summed output of all generation sources
/// * `battery_discharge_kw` - Energy delivered by the battery
/// * `load_kw` - Demand for the hour
pub fn net_balance(source_kw: f64, battery_discharge_kw: f64, load_kw: f64) -> f64 {
    source_kw + battery_discharge_kw - load_kw
}

/// Per-hour residuals `Σ output + discharge − load` for a trace.
pub fn residuals(trace: &DispatchTrace, load: &[f64]) -> Vec<f64> {
    load.iter()
        .enumerate()
        .map(|(t, &l)| {
            let source_kw: f64 = trace.source_output.iter().map(|out| out[t]).sum();
            net_balance(source_kw, trace.battery_discharge[t], l)
        })
        .collect()
}

/// Smallest hourly residual of a trace.
///
/// Negative values measure the worst unserved hour. An empty load yields
/// `+∞`.
pub fn feasibility_margin(trace: &DispatchTrace, load: &[f64]) -> f64 {
    residuals(trace, load)
        .into_iter()
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surplus_hour_is_positive() {
        assert_eq!(net_balance(5.0, 0.0, 3.0), 2.0);
    }

    #[test]
    fn battery_covers_gap() {
        assert_eq!(net_balance(2.0, 1.0, 3.0), 0.0);
    }

    #[test]
    fn unserved_hour_is_negative() {
        assert_eq!(net_balance(1.0, 0.5, 3.0), -1.5);
    }

    #[test]
    fn margin_is_worst_hour() {
        let mut trace = DispatchTrace::zeroed(2, 3);
        trace.source_output[0] = vec![5.0, 1.0, 3.0];
        trace.source_output[1] = vec![0.0, 1.0, 0.0];
        trace.battery_discharge = vec![0.0, 0.5, 0.0];
        let load = [4.0, 4.0, 3.0];
        assert_eq!(residuals(&trace, &load), vec![1.0, -1.5, 0.0]);
        assert_eq!(feasibility_margin(&trace, &load), -1.5);
    }
}
