//! Hourly time-series validation and profile helpers.

use crate::error::ConfigError;

/// Hours in one day.
pub const HOURS_PER_DAY: usize = 24;

/// Checks that a series is non-empty and every value is finite and non-negative.
fn check_values(errors: &mut Vec<ConfigError>, field: &str, series: &[f64]) {
    if series.is_empty() {
        errors.push(ConfigError::new(field, "must not be empty"));
        return;
    }
    if let Some(t) = series.iter().position(|v| !v.is_finite()) {
        errors.push(ConfigError::new(
            field,
            format!("value at hour {t} is not finite"),
        ));
    } else if let Some(t) = series.iter().position(|v| *v < 0.0) {
        errors.push(ConfigError::new(
            field,
            format!("value at hour {t} must be >= 0"),
        ));
    }
}

/// Validates a load series: non-empty, finite and non-negative.
pub fn validate_load(errors: &mut Vec<ConfigError>, field: &str, load: &[f64]) {
    check_values(errors, field, load);
}

/// Validates a per-unit output profile against the load length.
///
/// A unit profile holds output per unit of installed capacity and must lie
/// in `[0, 1]` at every hour.
pub fn validate_unit_profile(
    errors: &mut Vec<ConfigError>,
    field: &str,
    profile: &[f64],
    expected_len: usize,
) {
    if profile.len() != expected_len {
        errors.push(ConfigError::new(
            field,
            format!(
                "length {} does not match load length {expected_len}",
                profile.len()
            ),
        ));
        return;
    }
    check_values(errors, field, profile);
    if let Some(t) = profile.iter().position(|v| *v > 1.0) {
        errors.push(ConfigError::new(
            field,
            format!("value at hour {t} must be <= 1"),
        ));
    }
}

/// Repeats each daily value over 24 hours.
///
/// Daily normalized river flow is published once per day; the dispatch runs
/// hourly.
///
/// # Examples
///
/// ```
/// use minigrid_sizer::series::daily_to_hourly;
///
/// let hourly = daily_to_hourly(&[0.4, 0.6]);
/// assert_eq!(hourly.len(), 48);
/// assert_eq!(hourly[23], 0.4);
/// assert_eq!(hourly[24], 0.6);
/// ```
pub fn daily_to_hourly(daily: &[f64]) -> Vec<f64> {
    daily
        .iter()
        .flat_map(|&v| std::iter::repeat_n(v, HOURS_PER_DAY))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_load_rejected() {
        let mut errors = Vec::new();
        validate_load(&mut errors, "load", &[]);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("empty"));
    }

    #[test]
    fn non_finite_load_reports_hour() {
        let mut errors = Vec::new();
        validate_load(&mut errors, "load", &[1.0, f64::INFINITY, 2.0]);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("hour 1"));
    }

    #[test]
    fn negative_load_rejected() {
        let mut errors = Vec::new();
        validate_load(&mut errors, "load", &[1.0, -0.5]);
        assert!(errors.iter().any(|e| e.message.contains(">= 0")));
    }

    #[test]
    fn zero_load_accepted() {
        let mut errors = Vec::new();
        validate_load(&mut errors, "load", &[0.0; 24]);
        assert!(errors.is_empty());
    }

    #[test]
    fn mismatched_profile_length_rejected() {
        let mut errors = Vec::new();
        validate_unit_profile(&mut errors, "pv_unit", &[0.5; 23], 24);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "pv_unit");
        assert!(errors[0].message.contains("length 23"));
    }

    #[test]
    fn profile_above_one_rejected() {
        let mut errors = Vec::new();
        validate_unit_profile(&mut errors, "hydro_unit", &[0.5, 1.2], 2);
        assert!(errors.iter().any(|e| e.message.contains("<= 1")));
    }

    #[test]
    fn nan_profile_rejected() {
        let mut errors = Vec::new();
        validate_unit_profile(&mut errors, "pv_unit", &[0.5, f64::NAN], 2);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn daily_expansion_repeats_each_value() {
        let hourly = daily_to_hourly(&[0.1, 0.2, 0.3]);
        assert_eq!(hourly.len(), 72);
        assert!(hourly[..24].iter().all(|&v| v == 0.1));
        assert!(hourly[48..].iter().all(|&v| v == 0.3));
    }
}
