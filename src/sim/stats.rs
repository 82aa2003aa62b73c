//! Dispatch statistics accumulator.
//!
//! Collects completion metrics as the simulation runs. Latencies are
//! queue-to-completion in simulated milliseconds (travel time is excluded;
//! the clock starts when a task enters its worker's queue). Training
//! completions are never recorded.

use serde::{Deserialize, Serialize};

use crate::models::{Severity, SIM_HOUR_MS};

/// Length of the completions-per-minute rolling window (real ms).
const MINUTE_WINDOW_MS: f64 = 60_000.0;

/// Running dispatch statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Total completed non-training tasks.
    pub completed: u64,
    /// Sum of queue-to-completion latencies (simulated ms).
    pub total_queue_time_ms: f64,
    /// Completed counts per severity rank (index 0 = S1).
    pub completed_by_severity: [u64; 4],
    /// Completions inside the current real-minute window.
    pub completed_this_minute: u32,
    /// Real time elapsed in the current minute window (ms).
    minute_elapsed_ms: f64,
}

impl SimulationStats {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed non-training task.
    pub fn record(&mut self, severity: Severity, queue_time_ms: f64) {
        self.completed += 1;
        self.total_queue_time_ms += queue_time_ms;
        self.completed_by_severity[(severity.rank() - 1) as usize] += 1;
        self.completed_this_minute += 1;
    }

    /// Advances the per-minute rolling window by a real-time delta.
    pub fn advance_window(&mut self, real_delta_ms: f64) {
        self.minute_elapsed_ms += real_delta_ms;
        while self.minute_elapsed_ms >= MINUTE_WINDOW_MS {
            self.minute_elapsed_ms -= MINUTE_WINDOW_MS;
            self.completed_this_minute = 0;
        }
    }

    /// Mean queue-to-completion latency (simulated ms). Zero when empty.
    pub fn avg_queue_time_ms(&self) -> f64 {
        if self.completed == 0 {
            0.0
        } else {
            self.total_queue_time_ms / self.completed as f64
        }
    }

    /// Mean queue-to-completion latency in simulated hours.
    pub fn avg_queue_time_hours(&self) -> f64 {
        self.avg_queue_time_ms() / SIM_HOUR_MS
    }

    /// Clears all accumulated metrics.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_averages_are_zero() {
        let stats = SimulationStats::new();
        assert_eq!(stats.avg_queue_time_ms(), 0.0);
        assert_eq!(stats.avg_queue_time_hours(), 0.0);
    }

    #[test]
    fn test_record_accumulates() {
        let mut stats = SimulationStats::new();
        stats.record(Severity::Critical, 1000.0);
        stats.record(Severity::Critical, 3000.0);
        stats.record(Severity::Low, 5000.0);

        assert_eq!(stats.completed, 3);
        assert_eq!(stats.completed_by_severity, [2, 0, 0, 1]);
        assert!((stats.avg_queue_time_ms() - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn test_avg_in_hours() {
        let mut stats = SimulationStats::new();
        // One simulated hour of queue time.
        stats.record(Severity::Medium, SIM_HOUR_MS);
        assert!((stats.avg_queue_time_hours() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_minute_window_rolls_over() {
        let mut stats = SimulationStats::new();
        stats.record(Severity::Medium, 0.0);
        stats.advance_window(30_000.0);
        assert_eq!(stats.completed_this_minute, 1);

        stats.advance_window(30_000.0);
        assert_eq!(stats.completed_this_minute, 0);
        // Totals survive the window reset.
        assert_eq!(stats.completed, 1);
    }

    #[test]
    fn test_reset() {
        let mut stats = SimulationStats::new();
        stats.record(Severity::High, 500.0);
        stats.reset();
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.completed_this_minute, 0);
        assert_eq!(stats.total_queue_time_ms, 0.0);
    }
}
