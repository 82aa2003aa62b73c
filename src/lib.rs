//! # dispatch-sim
//!
//! A priority-preemptive incident dispatch simulation: stochastic task
//! arrivals are routed to a pool of workers, each of which processes its
//! own severity-ordered queue with preemption, against a simulated clock
//! with a daily working-hours window.
//!
//! ## Modules
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`models`] | Clock, working hours, task lifecycle, worker queues |
//! | [`config`] | Configuration snapshot and boundary validation |
//! | [`generator`] | Stochastic severity and complexity draws |
//! | [`routing`] | Round-robin and least-occupied load distribution |
//! | [`sim`] | The dispatcher: tick loop, triggers, stats, views |
//!
//! ## Quick Start
//!
//! ```
//! use dispatch_sim::config::SimulationConfig;
//! use dispatch_sim::sim::{IncidentSize, Simulation};
//!
//! let config = SimulationConfig::new()
//!     .with_worker_count(3)
//!     .with_tasks_per_day(144);
//! let mut sim = Simulation::seeded(config, 42)?;
//!
//! // Drive at ~10 ticks per real second.
//! for _ in 0..600 {
//!     sim.tick(100.0);
//! }
//! sim.trigger_incident(IncidentSize::Moderate);
//! sim.tick(100.0);
//!
//! println!(
//!     "completed {} tasks, avg queue time {:.1} sim-hours",
//!     sim.stats().completed,
//!     sim.stats().avg_queue_time_hours(),
//! );
//! # Ok::<(), dispatch_sim::config::ConfigError>(())
//! ```
//!
//! ## Time Model
//!
//! One simulated day is 60 real seconds at 1.0x speed. Task cost is
//! measured in engine-seconds (one simulated hour of work = 2.5
//! engine-seconds); the clock speed multiplier scales both the passage of
//! simulated time and processing progress, so a faster clock finishes the
//! same work in proportionally less real time.

pub mod config;
pub mod generator;
pub mod models;
pub mod routing;
pub mod sim;
