//! Synthetic hourly profiles for demos and tests.
//!
//! Real studies feed measured load and irradiance; these generators give the
//! CLI presets something plausible to size against.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::series::HOURS_PER_DAY;

/// Parameters of a sinusoidal daily load pattern with Gaussian noise.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadShape {
    /// Baseline demand.
    pub base_kw: f64,
    /// Amplitude of the daily sinusoid.
    pub amp_kw: f64,
    /// Phase offset in radians.
    pub phase_rad: f64,
    /// Noise standard deviation.
    pub noise_std: f64,
}

/// Utility function to generate Gaussian noise using Box-Muller transform.
///
/// # Arguments
///
/// * `rng` - Random number generator
/// * `std_dev` - Standard deviation of the noise
///
/// # Returns
///
/// Random value from a Gaussian distribution with mean 0 and specified standard deviation
pub fn gaussian_noise<R: Rng + ?Sized>(rng: &mut R, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

/// Generates `hours` of hourly demand following `shape`.
///
/// Demand is never negative.
pub fn sinusoidal_load(shape: &LoadShape, hours: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..hours)
        .map(|t| {
            let day_pos = (t % HOURS_PER_DAY) as f64 / HOURS_PER_DAY as f64;
            let angle = 2.0 * std::f64::consts::PI * day_pos + shape.phase_rad;
            let kw = shape.base_kw + shape.amp_kw * angle.sin() + gaussian_noise(&mut rng, shape.noise_std);
            kw.max(0.0)
        })
        .collect()
}

/// Fraction of peak output at hour `t` for a half-sine daylight window.
fn daylight_frac(t: usize, sunrise_idx: usize, sunset_idx: usize) -> f64 {
    let hour = t % HOURS_PER_DAY;
    if hour < sunrise_idx || hour >= sunset_idx {
        return 0.0;
    }
    let span = (sunset_idx - sunrise_idx) as f64;
    let pos = (hour - sunrise_idx) as f64 + 0.5;
    (std::f64::consts::PI * pos / span).sin()
}

/// Generates `hours` of PV output per unit capacity.
///
/// Output follows a half-sine between `sunrise_idx` (inclusive) and
/// `sunset_idx` (exclusive), scaled by a multiplicative noise term and clamped
/// into `[0, 1]`.
///
/// # Panics
///
/// Panics if `sunrise_idx >= sunset_idx` or `sunset_idx > 24`.
pub fn pv_unit_profile(
    sunrise_idx: usize,
    sunset_idx: usize,
    noise_std: f64,
    hours: usize,
    seed: u64,
) -> Vec<f64> {
    assert!(sunrise_idx < sunset_idx && sunset_idx <= HOURS_PER_DAY);
    let mut rng = StdRng::seed_from_u64(seed);
    (0..hours)
        .map(|t| {
            let frac = daylight_frac(t, sunrise_idx, sunset_idx);
            if frac <= 0.0 {
                return 0.0;
            }
            let noise_mult = 1.0 + gaussian_noise(&mut rng, noise_std);
            (frac * noise_mult).clamp(0.0, 1.0)
        })
        .collect()
}
