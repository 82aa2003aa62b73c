//! Task (incident) model and lifecycle state machine.
//!
//! A task is a unit of work with a severity rank, a processing cost in
//! engine-seconds, and a resumable remaining-cost countdown.
//!
//! # Lifecycle
//! `Traveling → Queued → Processing → Completed`. A task cycles
//! `Processing → Queued` exactly when preempted by a more urgent arrival;
//! its remaining cost is preserved. `Completed` is terminal. Training tasks
//! skip `Traveling` and are created directly in `Queued`.

use serde::{Deserialize, Serialize};

/// Urgency rank of a task. Lower rank preempts higher rank.
///
/// The variant order gives the natural `Ord`: `Critical` sorts before
/// `Low`, so an ascending sort puts the most urgent work first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Rank 1: drop everything.
    Critical,
    /// Rank 2.
    High,
    /// Rank 3.
    Medium,
    /// Rank 4: background work.
    Low,
}

impl Severity {
    /// All severities, most urgent first.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    /// Numeric rank (1 = most urgent, 4 = least urgent).
    #[inline]
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 1,
            Severity::High => 2,
            Severity::Medium => 3,
            Severity::Low => 4,
        }
    }

    /// Severity for a numeric rank, if in range.
    pub fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            1 => Some(Severity::Critical),
            2 => Some(Severity::High),
            3 => Some(Severity::Medium),
            4 => Some(Severity::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{}", self.rank())
    }
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    /// Assigned, en route to its worker.
    Traveling,
    /// Waiting in a worker's pending queue.
    Queued,
    /// Actively consuming clock ticks as a worker's current task.
    Processing,
    /// Finished. Terminal.
    Completed,
}

/// Identifier of a task (monotonic per simulation).
pub type TaskId = u64;

/// Identifier of a worker (index into the worker pool).
pub type WorkerId = usize;

/// A unit of work flowing through the simulation.
///
/// Cost and remaining time are in engine-seconds. Timestamps are in
/// simulated milliseconds. Invariant: `0 <= remaining_secs <= cost_secs`;
/// `remaining_secs` only decreases while `Processing` during working hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// Urgency rank.
    pub severity: Severity,
    /// Total processing cost (engine-seconds).
    pub cost_secs: f64,
    /// Cost left to process (engine-seconds).
    pub remaining_secs: f64,
    /// Lifecycle state.
    pub state: TaskState,
    /// Worker this task is assigned to, once routed.
    pub assigned_worker: Option<WorkerId>,
    /// Whether this task was ever pushed out of `Processing` by a more
    /// urgent arrival. Sticky once set.
    pub was_preempted: bool,
    /// Simulated time at which the task entered its worker's queue.
    /// Stamped at most once.
    pub queue_entered_at_ms: Option<f64>,
    /// Simulated completion time. Stamped at most once.
    pub completed_at_ms: Option<f64>,
    /// Whether this is a synthetic training task.
    pub is_training: bool,
    /// Simulated travel time left before arrival at the worker.
    pub travel_remaining_ms: f64,
}

impl Task {
    /// Creates a task in `Traveling` state.
    pub fn new(id: TaskId, severity: Severity, cost_secs: f64, travel_ms: f64) -> Self {
        debug_assert!(cost_secs >= 0.0);
        Self {
            id,
            severity,
            cost_secs,
            remaining_secs: cost_secs,
            state: TaskState::Traveling,
            assigned_worker: None,
            was_preempted: false,
            queue_entered_at_ms: None,
            completed_at_ms: None,
            is_training: false,
            travel_remaining_ms: travel_ms.max(0.0),
        }
    }

    /// Creates a severity-Low training task, already `Queued`.
    ///
    /// Training tasks bypass travel and are inserted directly into a
    /// worker's pending queue.
    pub fn training(id: TaskId, cost_secs: f64, worker: WorkerId, now_ms: f64) -> Self {
        Self {
            id,
            severity: Severity::Low,
            cost_secs,
            remaining_secs: cost_secs,
            state: TaskState::Queued,
            assigned_worker: Some(worker),
            was_preempted: false,
            queue_entered_at_ms: Some(now_ms),
            completed_at_ms: None,
            is_training: true,
            travel_remaining_ms: 0.0,
        }
    }

    /// Completed fraction of the total cost (0.0..=1.0).
    pub fn progress(&self) -> f64 {
        if self.cost_secs <= 0.0 {
            return 1.0;
        }
        ((self.cost_secs - self.remaining_secs) / self.cost_secs).clamp(0.0, 1.0)
    }

    /// Whether this task is in its terminal state.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.state == TaskState::Completed
    }
}
