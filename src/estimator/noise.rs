//! Random draws used by the stub tiers and the blending perturbation.

use rand::Rng;

/// Uniform draw from the closed interval `[low, high]`.
pub fn uniform(low: f64, high: f64) -> f64 {
    rand::thread_rng().gen_range(low..=high)
}

/// Uniform integer draw from the closed interval `[low, high]`.
pub fn randint(low: u64, high: u64) -> u64 {
    rand::thread_rng().gen_range(low..=high)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
