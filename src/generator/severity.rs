//! Severity sampling for arriving tasks.
//!
//! Two modes, selected by [`SeverityMode`]:
//! - **Normal**: standard normal variate mapped onto ranks 1-4 around a
//!   shiftable mean of 2.5 with σ = 0.8, clamped and rounded.
//! - **Custom**: categorical draw over four weights on a 0..100 cumulative
//!   scale. Only weights 1-3 are normalized explicitly; severity 4 absorbs
//!   the remainder, so rounding slack always lands in the Low bucket.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::config::SeverityMode;
use crate::models::Severity;

/// Center of the normal severity distribution before shifting.
pub const SEVERITY_MEAN_BASE: f64 = 2.5;

/// Standard deviation of the normal severity distribution.
pub const SEVERITY_STD_DEV: f64 = 0.8;

/// Draws a severity according to the configured mode.
pub fn sample_severity<R: Rng + ?Sized>(mode: &SeverityMode, rng: &mut R) -> Severity {
    match mode {
        SeverityMode::Normal { shift } => sample_normal(*shift, rng),
        SeverityMode::Custom { weights } => sample_custom(weights, rng),
    }
}

/// Shifted-normal draw: positive shift moves mass toward Critical.
fn sample_normal<R: Rng + ?Sized>(shift: f64, rng: &mut R) -> Severity {
    let z: f64 = rng.sample(StandardNormal);
    let mean = SEVERITY_MEAN_BASE - shift;
    let value = (mean + z * SEVERITY_STD_DEV).clamp(1.0, 4.0);
    let rank = value.round() as u8;
    // Unreachable fallback: the clamp bounds the rounded rank to 1..=4.
    Severity::from_rank(rank).unwrap_or(Severity::Low)
}

/// Categorical draw with severity 4 as the remainder bucket.
fn sample_custom<R: Rng + ?Sized>(weights: &[f64; 4], rng: &mut R) -> Severity {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        // Guarded at the config boundary; the remainder bucket still
        // applies if a zero total slips through.
        return Severity::Low;
    }

    let w1 = weights[0] / total * 100.0;
    let w2 = weights[1] / total * 100.0;
    let w3 = weights[2] / total * 100.0;

    let draw = rng.random_range(0.0..100.0);
    if draw < w1 {
        Severity::Critical
    } else if draw < w1 + w2 {
        Severity::High
    } else if draw < w1 + w2 + w3 {
        Severity::Medium
    } else {
        Severity::Low
    }
}
