//! Simulation configuration and boundary validation.
//!
//! Configuration is a snapshot struct handed to the engine, never read
//! live mid-tick. [`Simulation::update_config`](crate::sim::Simulation)
//! validates a snapshot before applying it; on rejection the engine keeps
//! its last valid configuration.
//!
//! # Error Taxonomy
//! Everything here is a configuration error: rejected where applied,
//! surfaced to the caller, never silently defaulted. Transient conditions
//! (zero workers, zero arrival rate) are not errors — they produce empty
//! or no-op behavior instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::WorkingHours;
use crate::routing::RoutingPolicy;

/// Severity distribution mode for arrival generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SeverityMode {
    /// Shifted normal distribution over ranks 1-4.
    ///
    /// Mean is `2.5 - shift` with a fixed standard deviation of 0.8; draws
    /// are clamped to [1, 4] and rounded. The useful shift range is roughly
    /// [-2, 2] — larger magnitudes saturate at one boundary.
    Normal {
        /// Distribution shift. Positive shifts toward Critical.
        shift: f64,
    },
    /// Categorical distribution over ranks 1-4.
    ///
    /// Weights 1-3 are normalized against the total; severity 4 is the
    /// remainder bucket. Weights must be non-negative and not all zero.
    Custom {
        /// Relative weights for severities 1-4.
        weights: [f64; 4],
    },
}

impl Default for SeverityMode {
    fn default() -> Self {
        SeverityMode::Normal { shift: 0.0 }
    }
}

/// Errors rejected at the configuration boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Clock speed multiplier must be positive and finite.
    #[error("speed multiplier must be positive and finite, got {0}")]
    InvalidSpeed(f64),

    /// Complexity bounds must satisfy `0 <= min <= max`.
    #[error("complexity bounds must satisfy 0 <= min <= max, got [{min}, {max}]")]
    InvalidComplexityBounds {
        /// Lower bound (simulated hours).
        min: f64,
        /// Upper bound (simulated hours).
        max: f64,
    },

    /// A custom severity weight is negative.
    #[error("severity weight for S{rank} must be non-negative, got {weight}")]
    NegativeSeverityWeight {
        /// Severity rank of the offending weight (1-4).
        rank: u8,
        /// The rejected weight.
        weight: f64,
    },

    /// Custom severity weights sum to zero.
    #[error("custom severity weights must not all be zero")]
    ZeroSeverityWeights,

    /// Working hours must satisfy `start < end <= 24`.
    #[error("working hours must satisfy start < end <= 24, got [{start}, {end})")]
    InvalidWorkingHours {
        /// Start hour.
        start: u8,
        /// End hour.
        end: u8,
    },

    /// Throughput override must be non-negative and finite.
    #[error("throughput multiplier must be non-negative and finite, got {0}")]
    InvalidThroughput(f64),

    /// Travel time must be non-negative and finite.
    #[error("travel time must be non-negative and finite, got {0}ms")]
    InvalidTravelTime(f64),
}

/// Snapshot of all tunable simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of workers in the pool. Zero is allowed (tasks pool up
    /// unassigned).
    pub worker_count: usize,
    /// Arrival rate in tasks per simulated day. Zero disables arrivals.
    pub tasks_per_day: u32,
    /// Lower complexity bound (simulated hours).
    pub min_complexity_hours: f64,
    /// Upper complexity bound (simulated hours).
    pub max_complexity_hours: f64,
    /// Clock speed multiplier (> 0).
    pub speed_multiplier: f64,
    /// Daily working-hours window.
    pub working_hours: WorkingHours,
    /// Severity distribution for arrivals.
    pub severity_mode: SeverityMode,
    /// Load-distribution policy for routing unassigned tasks.
    pub routing: RoutingPolicy,
    /// Simulated travel delay between assignment and arrival (ms).
    pub travel_time_ms: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            worker_count: 3,
            tasks_per_day: 20,
            min_complexity_hours: 1.0,
            max_complexity_hours: 8.0,
            speed_multiplier: 1.0,
            working_hours: WorkingHours::default(),
            severity_mode: SeverityMode::default(),
            routing: RoutingPolicy::RoundRobin,
            travel_time_ms: 0.0,
        }
    }
}

impl SimulationConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the worker count.
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count;
        self
    }

    /// Sets the arrival rate (tasks per simulated day).
    pub fn with_tasks_per_day(mut self, rate: u32) -> Self {
        self.tasks_per_day = rate;
        self
    }

    /// Sets the complexity bounds (simulated hours).
    pub fn with_complexity_hours(mut self, min: f64, max: f64) -> Self {
        self.min_complexity_hours = min;
        self.max_complexity_hours = max;
        self
    }

    /// Sets the clock speed multiplier.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed_multiplier = speed;
        self
    }

    /// Sets the working-hours window.
    pub fn with_working_hours(mut self, start_hour: u8, end_hour: u8) -> Self {
        self.working_hours = WorkingHours::new(start_hour, end_hour);
        self
    }

    /// Sets the severity distribution mode.
    pub fn with_severity_mode(mut self, mode: SeverityMode) -> Self {
        self.severity_mode = mode;
        self
    }

    /// Sets the routing policy.
    pub fn with_routing(mut self, policy: RoutingPolicy) -> Self {
        self.routing = policy;
        self
    }

    /// Sets the simulated travel delay (ms).
    pub fn with_travel_time_ms(mut self, travel_ms: f64) -> Self {
        self.travel_time_ms = travel_ms;
        self
    }

    /// Validates the snapshot.
    ///
    /// Returns the first violation found. A `Ok(())` result means the
    /// snapshot is safe to apply to a running simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.speed_multiplier > 0.0) || !self.speed_multiplier.is_finite() {
            return Err(ConfigError::InvalidSpeed(self.speed_multiplier));
        }
        if self.min_complexity_hours < 0.0
            || self.min_complexity_hours > self.max_complexity_hours
            || !self.min_complexity_hours.is_finite()
            || !self.max_complexity_hours.is_finite()
        {
            return Err(ConfigError::InvalidComplexityBounds {
                min: self.min_complexity_hours,
                max: self.max_complexity_hours,
            });
        }
        if self.working_hours.start_hour >= self.working_hours.end_hour
            || self.working_hours.end_hour > 24
        {
            return Err(ConfigError::InvalidWorkingHours {
                start: self.working_hours.start_hour,
                end: self.working_hours.end_hour,
            });
        }
        if !(self.travel_time_ms >= 0.0) || !self.travel_time_ms.is_finite() {
            return Err(ConfigError::InvalidTravelTime(self.travel_time_ms));
        }
        if let SeverityMode::Custom { weights } = &self.severity_mode {
            for (i, &weight) in weights.iter().enumerate() {
                if !(weight >= 0.0) || !weight.is_finite() {
                    return Err(ConfigError::NegativeSeverityWeight {
                        rank: (i + 1) as u8,
                        weight,
                    });
                }
            }
            if weights.iter().sum::<f64>() <= 0.0 {
                return Err(ConfigError::ZeroSeverityWeights);
            }
        }
        Ok(())
    }
}
