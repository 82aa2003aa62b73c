//! Simulation domain models.
//!
//! Core data types for the dispatch simulation: the simulated clock and
//! working-hours window, the task lifecycle state machine, and the worker
//! with its preemptive per-worker queue.

mod clock;
mod task;
mod worker;

pub use clock::{
    hours_to_engine_secs, SimClock, WorkingHours, ENGINE_SECS_PER_SIM_HOUR, SIM_DAY_MS,
    SIM_HOUR_MS,
};
pub use task::{Severity, Task, TaskId, TaskState, WorkerId};
pub use worker::{Completion, Worker, TRAINING_THROUGHPUT_DELTA};
