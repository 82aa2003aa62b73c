//! Simulated clock and working-hours model.
//!
//! Maps real elapsed time to simulated time via a speed multiplier and
//! derives working-hours status from the simulated time of day.
//!
//! # Time Model
//! One simulated day is a fixed 60 000 simulated milliseconds (60 real
//! seconds at 1.0x speed). The clock advances by `real_ms × speed`, so the
//! day length in simulated milliseconds is independent of the speed
//! multiplier. Processing cost is measured in engine-seconds: one simulated
//! hour of work equals 2.5 engine-seconds.

use serde::{Deserialize, Serialize};

/// Length of one simulated day in simulated milliseconds.
pub const SIM_DAY_MS: f64 = 60_000.0;

/// Length of one simulated hour in simulated milliseconds.
pub const SIM_HOUR_MS: f64 = SIM_DAY_MS / 24.0;

/// Engine-seconds of processing per simulated hour of work.
pub const ENGINE_SECS_PER_SIM_HOUR: f64 = 60.0 / 24.0;

/// A daily working-hours window [start_hour, end_hour).
///
/// Half-open over the 24-hour simulated day: includes the start hour,
/// excludes the end hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    /// First working hour of the day (inclusive, 0-23).
    pub start_hour: u8,
    /// End of the working day (exclusive, 1-24).
    pub end_hour: u8,
}

impl WorkingHours {
    /// Creates a working-hours window.
    pub fn new(start_hour: u8, end_hour: u8) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// Whether the given hour of day falls inside the window.
    #[inline]
    pub fn contains(&self, hour_of_day: u8) -> bool {
        hour_of_day >= self.start_hour && hour_of_day < self.end_hour
    }

    /// Window length in hours.
    #[inline]
    pub fn len_hours(&self) -> u8 {
        self.end_hour.saturating_sub(self.start_hour)
    }
}

impl Default for WorkingHours {
    /// The standard 9-to-5 workday.
    fn default() -> Self {
        Self::new(9, 17)
    }
}

/// Simulated clock.
///
/// Accumulates simulated elapsed time from real tick deltas. The speed
/// multiplier is applied at advance time, so changing speed mid-run only
/// affects subsequent ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    speed: f64,
    elapsed_ms: f64,
}

impl SimClock {
    /// Creates a clock at t=0.
    ///
    /// The speed multiplier must already be validated (> 0); see
    /// `SimulationConfig::validate`.
    pub fn new(speed: f64) -> Self {
        debug_assert!(speed > 0.0);
        Self {
            speed,
            elapsed_ms: 0.0,
        }
    }

    /// Advances the clock by a real-time delta (ms).
    pub fn advance(&mut self, real_delta_ms: f64) {
        self.elapsed_ms += real_delta_ms * self.speed;
    }

    /// Current simulated elapsed time (ms).
    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Current speed multiplier.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Updates the speed multiplier for subsequent ticks.
    pub fn set_speed(&mut self, speed: f64) {
        debug_assert!(speed > 0.0);
        self.speed = speed;
    }

    /// Completed simulated days since t=0.
    pub fn day(&self) -> u64 {
        (self.elapsed_ms / SIM_DAY_MS) as u64
    }

    /// Hour of the current simulated day (0-23).
    pub fn hour_of_day(&self) -> u8 {
        let day_ms = self.elapsed_ms % SIM_DAY_MS;
        ((day_ms / SIM_HOUR_MS) as u8).min(23)
    }

    /// Minute within the current simulated hour (0-59).
    pub fn minute_of_hour(&self) -> u8 {
        let hour_ms = self.elapsed_ms % SIM_HOUR_MS;
        ((hour_ms / (SIM_HOUR_MS / 60.0)) as u8).min(59)
    }

    /// Whether the current simulated time falls inside the window.
    pub fn is_working_hours(&self, hours: &WorkingHours) -> bool {
        hours.contains(self.hour_of_day())
    }

    /// Resets the clock to t=0, keeping the speed multiplier.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
    }
}

/// Converts a processing cost in simulated hours to engine-seconds.
#[inline]
pub fn hours_to_engine_secs(sim_hours: f64) -> f64 {
    sim_hours * ENGINE_SECS_PER_SIM_HOUR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_scales_by_speed() {
        let mut clock = SimClock::new(2.0);
        clock.advance(1000.0);
        assert!((clock.now_ms() - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_hour_of_day() {
        let mut clock = SimClock::new(1.0);
        assert_eq!(clock.hour_of_day(), 0);

        clock.advance(9.0 * SIM_HOUR_MS); // 09:00
        assert_eq!(clock.hour_of_day(), 9);

        clock.advance(8.0 * SIM_HOUR_MS); // 17:00
        assert_eq!(clock.hour_of_day(), 17);
    }

    #[test]
    fn test_day_rollover() {
        let mut clock = SimClock::new(1.0);
        clock.advance(SIM_DAY_MS + 3.0 * SIM_HOUR_MS);
        assert_eq!(clock.day(), 1);
        assert_eq!(clock.hour_of_day(), 3);
    }

    #[test]
    fn test_working_hours_boundaries() {
        let hours = WorkingHours::new(9, 17);
        assert!(!hours.contains(8));
        assert!(hours.contains(9)); // inclusive start
        assert!(hours.contains(16));
        assert!(!hours.contains(17)); // exclusive end
        assert_eq!(hours.len_hours(), 8);
    }

    #[test]
    fn test_is_working_hours() {
        let hours = WorkingHours::default();
        let mut clock = SimClock::new(1.0);
        assert!(!clock.is_working_hours(&hours)); // midnight

        clock.advance(12.0 * SIM_HOUR_MS); // noon
        assert!(clock.is_working_hours(&hours));

        clock.advance(10.0 * SIM_HOUR_MS); // 22:00
        assert!(!clock.is_working_hours(&hours));
    }

    #[test]
    fn test_day_length_independent_of_speed() {
        // At 4x speed, 15 real seconds advance the clock by one full day.
        let mut clock = SimClock::new(4.0);
        clock.advance(15_000.0);
        assert_eq!(clock.day(), 1);
        assert_eq!(clock.hour_of_day(), 0);
    }

    #[test]
    fn test_speed_change_affects_only_later_ticks() {
        let mut clock = SimClock::new(1.0);
        clock.advance(1000.0);
        clock.set_speed(3.0);
        clock.advance(1000.0);
        assert!((clock.now_ms() - 4000.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_keeps_speed() {
        let mut clock = SimClock::new(2.5);
        clock.advance(10_000.0);
        clock.reset();
        assert_eq!(clock.now_ms(), 0.0);
        assert!((clock.speed() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_hours_to_engine_secs() {
        // One simulated day of work = 60 engine-seconds.
        assert!((hours_to_engine_secs(24.0) - 60.0).abs() < 1e-9);
        assert!((hours_to_engine_secs(1.0) - 2.5).abs() < 1e-12);
    }
}
