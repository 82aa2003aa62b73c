//! Processing-cost sampling for arriving tasks.
//!
//! Complexity is drawn from a bounded normal distribution over simulated
//! hours: mean at the center of `[min, max]`, σ at a quarter of the range
//! (≈95% of unclamped draws land inside the bounds), then clamped. The
//! result is converted to engine-seconds by the fixed 2.5 s/hour ratio.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::models::hours_to_engine_secs;

/// Draws a complexity in simulated hours from `[min_hours, max_hours]`.
///
/// Degenerate bounds (`min == max`) always return `min`. Bounds must be
/// validated (`0 <= min <= max`) at the configuration boundary.
pub fn sample_complexity_hours<R: Rng + ?Sized>(
    min_hours: f64,
    max_hours: f64,
    rng: &mut R,
) -> f64 {
    debug_assert!(min_hours >= 0.0 && min_hours <= max_hours);
    let range = max_hours - min_hours;
    if range <= 0.0 {
        return min_hours;
    }

    let mean = (min_hours + max_hours) / 2.0;
    let std_dev = range / 4.0;
    let z: f64 = rng.sample(StandardNormal);
    (mean + z * std_dev).clamp(min_hours, max_hours)
}

/// Draws a complexity and converts it to engine-seconds.
pub fn sample_complexity_secs<R: Rng + ?Sized>(
    min_hours: f64,
    max_hours: f64,
    rng: &mut R,
) -> f64 {
    hours_to_engine_secs(sample_complexity_hours(min_hours, max_hours, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_draws_stay_in_bounds() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..10_000 {
            let hours = sample_complexity_hours(1.0, 8.0, &mut rng);
            assert!((1.0..=8.0).contains(&hours));
        }
    }

    #[test]
    fn test_degenerate_bounds_are_deterministic() {
        let mut rng = SmallRng::seed_from_u64(2);
        for _ in 0..100 {
            assert_eq!(sample_complexity_hours(4.0, 4.0, &mut rng), 4.0);
        }
    }

    #[test]
    fn test_mean_is_near_center() {
        let mut rng = SmallRng::seed_from_u64(3);
        let samples = 20_000;
        let sum: f64 = (0..samples)
            .map(|_| sample_complexity_hours(2.0, 6.0, &mut rng))
            .sum();
        let mean = sum / samples as f64;
        assert!((mean - 4.0).abs() < 0.05, "mean drifted to {mean}");
    }

    #[test]
    fn test_engine_seconds_conversion() {
        let mut rng = SmallRng::seed_from_u64(4);
        // 4 simulated hours of work = 10 engine-seconds.
        let secs = sample_complexity_secs(4.0, 4.0, &mut rng);
        assert!((secs - 10.0).abs() < 1e-12);
    }
}
