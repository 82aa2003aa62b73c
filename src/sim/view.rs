//! Read-only snapshots for renderers and selection surfaces.
//!
//! Everything here is a pure projection of simulation state: building a
//! view mutates nothing, so external consumers (renderers, control panels,
//! queue popups) can poll at any cadence. All snapshot types serialize
//! with `serde` for consumers living outside the process.

use serde::Serialize;

use crate::models::{Severity, Task, TaskId, TaskState, Worker, WorkerId};

/// How many completed tasks a queue snapshot retains (newest first).
const SNAPSHOT_COMPLETED_LIMIT: usize = 10;

/// Renderer-facing projection of a single task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskView {
    /// Task id.
    pub id: TaskId,
    /// Urgency rank.
    pub severity: Severity,
    /// Lifecycle state.
    pub state: TaskState,
    /// Total cost (engine-seconds).
    pub cost_secs: f64,
    /// Remaining cost (engine-seconds).
    pub remaining_secs: f64,
    /// Completed fraction (0.0..=1.0).
    pub progress: f64,
    /// Whether the task was ever preempted.
    pub was_preempted: bool,
    /// Whether this is a training task.
    pub is_training: bool,
    /// Owning worker, if routed.
    pub assigned_worker: Option<WorkerId>,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            severity: task.severity,
            state: task.state,
            cost_secs: task.cost_secs,
            remaining_secs: task.remaining_secs.max(0.0),
            progress: task.progress(),
            was_preempted: task.was_preempted,
            is_training: task.is_training,
            assigned_worker: task.assigned_worker,
        }
    }
}

/// Renderer-facing projection of a single worker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerView {
    /// Worker id.
    pub id: WorkerId,
    /// Display name.
    pub name: String,
    /// Id of the task being processed, if any.
    pub current_task: Option<TaskId>,
    /// Queued plus in-progress task count.
    pub pending_count: usize,
    /// Tasks still traveling here.
    pub incoming_count: usize,
    /// Completed non-training tasks.
    pub completed_count: usize,
    /// Processing speed multiplier.
    pub throughput: f64,
    /// Whether no task is being processed.
    pub is_idle: bool,
}

impl From<&Worker> for WorkerView {
    fn from(worker: &Worker) -> Self {
        Self {
            id: worker.id,
            name: worker.name.clone(),
            current_task: worker.current().map(|t| t.id),
            pending_count: worker.pending_count(),
            incoming_count: worker.incoming_count(),
            completed_count: worker.completed_count(),
            throughput: worker.throughput(),
            is_idle: worker.is_idle(),
        }
    }
}

/// Full per-tick snapshot for a renderer.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationView {
    /// Completed simulated days.
    pub day: u64,
    /// Hour of the simulated day (0-23).
    pub hour_of_day: u8,
    /// Minute of the simulated hour (0-59).
    pub minute_of_hour: u8,
    /// Whether workers are inside the working-hours window.
    pub is_working_hours: bool,
    /// Whether the stepping signal is currently ignored.
    pub paused: bool,
    /// Tasks not yet routed to any worker.
    pub unassigned_count: usize,
    /// All live (non-completed) tasks, unassigned pool first.
    pub tasks: Vec<TaskView>,
    /// One entry per worker, in pool order.
    pub workers: Vec<WorkerView>,
}

/// Detailed queue snapshot of a selected worker, for popup display.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerQueueSnapshot {
    /// Worker summary.
    pub worker: WorkerView,
    /// Counts of current + pending tasks per severity rank (index 0 = S1).
    pub severity_counts: [usize; 4],
    /// The task being processed, if any.
    pub current: Option<TaskView>,
    /// Pending tasks in queue order (most urgent first).
    pub pending: Vec<TaskView>,
    /// Tasks still traveling here.
    pub incoming: Vec<TaskView>,
    /// The most recently completed tasks, newest first (capped at 10).
    pub recent_completed: Vec<TaskView>,
}

impl WorkerQueueSnapshot {
    /// Captures a snapshot of one worker's queues.
    pub fn capture(worker: &Worker) -> Self {
        let recent_completed = worker
            .completed()
            .iter()
            .rev()
            .take(SNAPSHOT_COMPLETED_LIMIT)
            .map(TaskView::from)
            .collect();
        Self {
            worker: WorkerView::from(worker),
            severity_counts: worker.severity_counts(),
            current: worker.current().map(TaskView::from),
            pending: worker.pending().iter().map(TaskView::from).collect(),
            incoming: worker.incoming().iter().map(TaskView::from).collect(),
            recent_completed,
        }
    }
}
