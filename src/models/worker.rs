//! Worker (engineer) model: per-worker queues and preemptive processing.
//!
//! A worker owns four task containers — `incoming` (assigned, still
//! traveling), `pending` (severity-sorted queue), `current` (the single
//! task consuming clock ticks), and `completed` (append-only history).
//! A task lives in exactly one container at a time; transitions move the
//! task by value, so double-entry is unrepresentable.
//!
//! # Preemption
//! When a task arrives with a strictly more urgent severity than the
//! current task, the current task is pushed back into `pending` with its
//! remaining cost intact and the newcomer is selected instead.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::task::{Severity, Task, TaskId, TaskState, WorkerId};

/// Permanent throughput gain from completing one training task.
pub const TRAINING_THROUGHPUT_DELTA: f64 = 0.1;

/// Record of a completed task, emitted by [`Worker::tick`].
///
/// Training completions carry `training = true` and are excluded from the
/// worker's history and from dispatcher statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Completed task id.
    pub task_id: TaskId,
    /// Severity of the completed task.
    pub severity: Severity,
    /// Queue-to-completion latency in simulated milliseconds.
    pub queue_time_ms: f64,
    /// Whether the completed task was a training task.
    pub training: bool,
}

/// A worker processing tasks from a severity-ordered personal queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    /// Worker identifier (index into the dispatcher's pool).
    pub id: WorkerId,
    /// Display name.
    pub name: String,
    /// Processing speed multiplier (>= 0). Grows by
    /// [`TRAINING_THROUGHPUT_DELTA`] per completed training task.
    throughput: f64,
    /// The task actively consuming clock ticks, if any.
    current: Option<Task>,
    /// Severity-sorted queue, most urgent first; ties keep arrival order.
    pending: Vec<Task>,
    /// Assigned tasks still traveling to this worker.
    incoming: Vec<Task>,
    /// Completed non-training tasks, in completion order.
    completed: Vec<Task>,
}

impl Worker {
    /// Creates an idle worker with throughput 1.0.
    pub fn new(id: WorkerId) -> Self {
        Self {
            id,
            name: format!("Eng {}", id + 1),
            throughput: 1.0,
            current: None,
            pending: Vec::new(),
            incoming: Vec::new(),
            completed: Vec::new(),
        }
    }

    /// Current throughput multiplier.
    #[inline]
    pub fn throughput(&self) -> f64 {
        self.throughput
    }

    /// Overrides the throughput multiplier. Caller validates `value >= 0`.
    pub fn set_throughput(&mut self, value: f64) {
        debug_assert!(value >= 0.0);
        self.throughput = value;
    }

    /// The task currently being processed.
    #[inline]
    pub fn current(&self) -> Option<&Task> {
        self.current.as_ref()
    }

    /// Pending tasks, most urgent first.
    #[inline]
    pub fn pending(&self) -> &[Task] {
        &self.pending
    }

    /// Assigned tasks still traveling here.
    #[inline]
    pub fn incoming(&self) -> &[Task] {
        &self.incoming
    }

    /// Completed non-training tasks, oldest first.
    #[inline]
    pub fn completed(&self) -> &[Task] {
        &self.completed
    }

    /// Queued plus in-progress task count.
    pub fn pending_count(&self) -> usize {
        self.pending.len() + usize::from(self.current.is_some())
    }

    /// Count of assigned tasks still traveling.
    #[inline]
    pub fn incoming_count(&self) -> usize {
        self.incoming.len()
    }

    /// Count of completed non-training tasks.
    #[inline]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Total open workload: pending + in-progress + incoming.
    ///
    /// This is the quantity the least-occupied routing policy minimizes.
    pub fn load(&self) -> usize {
        self.pending_count() + self.incoming_count()
    }

    /// Whether no task is being processed.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    /// Counts of current + pending tasks per severity rank (index 0 = S1).
    pub fn severity_counts(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        if let Some(task) = &self.current {
            counts[(task.severity.rank() - 1) as usize] += 1;
        }
        for task in &self.pending {
            counts[(task.severity.rank() - 1) as usize] += 1;
        }
        counts
    }

    /// Accepts a routed task into the incoming set.
    ///
    /// The task stays `Traveling` until its travel delay elapses; see
    /// [`Worker::advance_travel`].
    pub fn assign(&mut self, mut task: Task) {
        task.assigned_worker = Some(self.id);
        task.state = TaskState::Traveling;
        self.incoming.push(task);
    }

    /// Advances travel for incoming tasks and fires arrivals.
    ///
    /// `sim_delta_ms` is simulated time; `now_ms` is the simulated clock
    /// after this tick's advance.
    pub fn advance_travel(&mut self, sim_delta_ms: f64, now_ms: f64) {
        let mut i = 0;
        while i < self.incoming.len() {
            self.incoming[i].travel_remaining_ms -= sim_delta_ms;
            if self.incoming[i].travel_remaining_ms <= 0.0 {
                let task = self.incoming.remove(i);
                self.arrive(task, now_ms);
            } else {
                i += 1;
            }
        }
    }

    /// Arrival event: moves a task into the pending queue.
    ///
    /// Stamps `queue_entered_at_ms` if unset, re-sorts the queue, and
    /// preempts the current task when the newcomer is strictly more urgent.
    /// If the worker is idle the newcomer (or the queue head) starts
    /// immediately; working-hours gating applies to progress, not to
    /// selection.
    pub fn arrive(&mut self, mut task: Task, now_ms: f64) {
        task.state = TaskState::Queued;
        task.travel_remaining_ms = 0.0;
        if task.queue_entered_at_ms.is_none() {
            task.queue_entered_at_ms = Some(now_ms);
        }
        let severity = task.severity;
        self.pending.push(task);
        self.sort_pending();

        match &self.current {
            Some(current) if severity < current.severity => {
                self.preempt_current();
                self.select_next();
            }
            None => self.select_next(),
            Some(_) => {}
        }
    }

    /// Inserts a training task at the front of the queue, then re-sorts.
    ///
    /// Severity-Low training sinks behind any more urgent pending work but
    /// ahead of other Low tasks already queued. An idle worker starts it
    /// immediately.
    pub fn enqueue_training(&mut self, task: Task) {
        debug_assert!(task.is_training);
        self.pending.insert(0, task);
        self.sort_pending();
        if self.current.is_none() {
            self.select_next();
        }
    }

    /// Advances processing by one tick.
    ///
    /// During working hours the current task's remaining cost drops by
    /// `real_delta_ms / 1000 × throughput × speed`; reaching zero completes
    /// it and the next queued task (if any) is selected. Outside working
    /// hours nothing changes. Returns the completion produced this tick,
    /// if any.
    pub fn tick(
        &mut self,
        real_delta_ms: f64,
        speed: f64,
        working_hours: bool,
        now_ms: f64,
    ) -> Option<Completion> {
        if !working_hours {
            return None;
        }

        let mut completion = None;
        if let Some(task) = self.current.as_mut() {
            debug_assert!(task.state == TaskState::Processing);
            task.remaining_secs -= (real_delta_ms / 1000.0) * self.throughput * speed;
            if task.remaining_secs <= 0.0 {
                completion = Some(self.complete_current(now_ms));
            }
        }

        if self.current.is_none() && !self.pending.is_empty() {
            self.select_next();
        }
        completion
    }

    /// Pops the queue head into `current` and marks it `Processing`.
    fn select_next(&mut self) {
        if self.current.is_some() || self.pending.is_empty() {
            return;
        }
        let mut task = self.pending.remove(0);
        task.state = TaskState::Processing;
        debug!(
            worker = %self.name,
            task = task.id,
            severity = %task.severity,
            "started processing"
        );
        self.current = Some(task);
    }

    /// Pushes the current task back into the queue, progress preserved.
    fn preempt_current(&mut self) {
        if let Some(mut task) = self.current.take() {
            task.state = TaskState::Queued;
            task.was_preempted = true;
            debug!(
                worker = %self.name,
                task = task.id,
                remaining_secs = task.remaining_secs,
                "preempted"
            );
            self.pending.push(task);
            self.sort_pending();
        }
    }

    /// Finalizes the current task.
    ///
    /// Training tasks raise the throughput multiplier and are discarded;
    /// everything else is appended to the completed history. Taking the
    /// task out of `current` by value makes a second completion of the
    /// same task impossible.
    fn complete_current(&mut self, now_ms: f64) -> Completion {
        let mut task = self
            .current
            .take()
            .unwrap_or_else(|| unreachable!("complete_current called with no current task"));
        task.remaining_secs = 0.0;
        task.state = TaskState::Completed;
        task.completed_at_ms = Some(now_ms);

        let queue_time_ms = task
            .queue_entered_at_ms
            .map(|entered| now_ms - entered)
            .unwrap_or(0.0);
        let completion = Completion {
            task_id: task.id,
            severity: task.severity,
            queue_time_ms,
            training: task.is_training,
        };

        if task.is_training {
            self.throughput += TRAINING_THROUGHPUT_DELTA;
            info!(
                worker = %self.name,
                throughput = self.throughput,
                "completed training"
            );
        } else {
            debug!(worker = %self.name, task = task.id, "completed task");
            self.completed.push(task);
        }

        self.select_next();
        completion
    }

    /// Stable ascending sort: most urgent first, arrival order on ties.
    fn sort_pending(&mut self) {
        self.pending.sort_by_key(|t| t.severity);
    }

    /// Drops all queued, traveling, and historical tasks.
    ///
    /// Keeps the worker's identity and learned throughput multiplier.
    pub fn clear(&mut self) {
        self.current = None;
        self.pending.clear();
        self.incoming.clear();
        self.completed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: TaskId, severity: Severity, cost_secs: f64) -> Task {
        Task::new(id, severity, cost_secs, 0.0)
    }

    /// Checks the standing queue invariant: most urgent first.
    fn assert_sorted(worker: &Worker) {
        let ranks: Vec<u8> = worker.pending().iter().map(|t| t.severity.rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn test_arrive_starts_idle_worker() {
        let mut worker = Worker::new(0);
        worker.arrive(task(1, Severity::Medium, 5.0), 100.0);
        let current = worker.current().unwrap();
        assert_eq!(current.id, 1);
        assert_eq!(current.state, TaskState::Processing);
        assert_eq!(current.queue_entered_at_ms, Some(100.0));
        assert!(worker.pending().is_empty());
    }

    #[test]
    fn test_pending_sorted_most_urgent_first() {
        let mut worker = Worker::new(0);
        worker.arrive(task(1, Severity::Low, 5.0), 0.0);
        worker.arrive(task(2, Severity::Low, 5.0), 0.0);
        worker.arrive(task(3, Severity::Medium, 5.0), 0.0);
        worker.arrive(task(4, Severity::High, 5.0), 0.0);

        // Task 1 is current; the rest queue up by severity.
        assert_eq!(worker.current().unwrap().id, 1);
        let ids: Vec<TaskId> = worker.pending().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4, 3, 2]);
        assert_sorted(&worker);
    }

    #[test]
    fn test_severity_ties_keep_arrival_order() {
        let mut worker = Worker::new(0);
        worker.arrive(task(1, Severity::Critical, 5.0), 0.0); // becomes current
        worker.arrive(task(2, Severity::Medium, 5.0), 1.0);
        worker.arrive(task(3, Severity::Medium, 5.0), 2.0);
        worker.arrive(task(4, Severity::Medium, 5.0), 3.0);

        let ids: Vec<TaskId> = worker.pending().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_preemption_postcondition() {
        let mut worker = Worker::new(0);
        worker.arrive(task(1, Severity::Medium, 10.0), 0.0);

        // Burn some progress on task 1.
        worker.tick(2000.0, 1.0, true, 2000.0);
        let remaining_before = worker.current().unwrap().remaining_secs;
        assert!(remaining_before < 10.0);

        // A strictly more urgent arrival preempts immediately.
        worker.arrive(task(2, Severity::Critical, 5.0), 2000.0);

        assert_eq!(worker.current().unwrap().id, 2);
        let suspended = &worker.pending()[0];
        assert_eq!(suspended.id, 1);
        assert_eq!(suspended.state, TaskState::Queued);
        assert!(suspended.was_preempted);
        assert_eq!(suspended.remaining_secs, remaining_before);
        assert_sorted(&worker);
    }

    #[test]
    fn test_equal_severity_does_not_preempt() {
        let mut worker = Worker::new(0);
        worker.arrive(task(1, Severity::High, 10.0), 0.0);
        worker.arrive(task(2, Severity::High, 5.0), 0.0);
        assert_eq!(worker.current().unwrap().id, 1);
        assert!(!worker.pending()[0].was_preempted);
    }

    #[test]
    fn test_preempted_task_resumes_and_finishes() {
        let mut worker = Worker::new(0);
        worker.arrive(task(1, Severity::Medium, 4.0), 0.0);
        worker.tick(1000.0, 1.0, true, 1000.0); // 3.0s left on task 1
        worker.arrive(task(2, Severity::Critical, 2.0), 1000.0);

        // Finish the critical task: 2.0s of work.
        let done = worker.tick(2000.0, 1.0, true, 3000.0).unwrap();
        assert_eq!(done.task_id, 2);
        // Task 1 resumes with its saved progress.
        assert_eq!(worker.current().unwrap().id, 1);
        assert!((worker.current().unwrap().remaining_secs - 3.0).abs() < 1e-9);

        let done = worker.tick(3000.0, 1.0, true, 6000.0).unwrap();
        assert_eq!(done.task_id, 1);
        // Total processed time equals the original cost.
        let finished = &worker.completed()[1];
        assert_eq!(finished.remaining_secs, 0.0);
        assert!(finished.was_preempted);
        assert_eq!(finished.completed_at_ms, Some(6000.0));
    }

    #[test]
    fn test_remaining_clamped_to_zero_on_completion() {
        let mut worker = Worker::new(0);
        worker.arrive(task(1, Severity::Low, 1.0), 0.0);
        // Overshoot: 5 seconds of work against a 1-second task.
        worker.tick(5000.0, 1.0, true, 5000.0);
        assert_eq!(worker.completed()[0].remaining_secs, 0.0);
    }

    #[test]
    fn test_no_progress_outside_working_hours() {
        let mut worker = Worker::new(0);
        worker.arrive(task(1, Severity::Medium, 10.0), 0.0);
        for step in 0..50 {
            assert!(worker.tick(1000.0, 1.0, false, step as f64 * 1000.0).is_none());
        }
        assert_eq!(worker.current().unwrap().remaining_secs, 10.0);
        assert_eq!(worker.current().unwrap().state, TaskState::Processing);
    }

    #[test]
    fn test_throughput_and_speed_scale_processing() {
        let mut worker = Worker::new(0);
        worker.set_throughput(2.0);
        worker.arrive(task(1, Severity::Medium, 10.0), 0.0);
        // 1 real second × 2.0 throughput × 2.5 speed = 5 engine-seconds.
        worker.tick(1000.0, 2.5, true, 1000.0);
        assert!((worker.current().unwrap().remaining_secs - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_completion_latency_uses_queue_entry() {
        let mut worker = Worker::new(0);
        worker.arrive(task(1, Severity::Medium, 1.0), 500.0);
        let done = worker.tick(1000.0, 1.0, true, 1500.0).unwrap();
        assert!((done.queue_time_ms - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_completion_appears_in_history_once() {
        let mut worker = Worker::new(0);
        worker.arrive(task(1, Severity::Medium, 1.0), 0.0);
        assert!(worker.tick(1000.0, 1.0, true, 1000.0).is_some());
        // Further ticks with an empty queue complete nothing.
        assert!(worker.tick(1000.0, 1.0, true, 2000.0).is_none());
        assert_eq!(worker.completed_count(), 1);
    }

    #[test]
    fn test_training_completion_raises_throughput() {
        let mut worker = Worker::new(0);
        worker.enqueue_training(Task::training(9, 2.5, 0, 0.0));
        assert_eq!(worker.current().unwrap().id, 9);

        let done = worker.tick(2500.0, 1.0, true, 2500.0).unwrap();
        assert!(done.training);
        assert!((worker.throughput() - 1.1).abs() < 1e-12);
        // Training never enters the completed history.
        assert_eq!(worker.completed_count(), 0);
    }

    #[test]
    fn test_training_sinks_behind_urgent_work() {
        let mut worker = Worker::new(0);
        worker.arrive(task(1, Severity::Low, 5.0), 0.0); // becomes current
        worker.arrive(task(2, Severity::High, 5.0), 0.0);
        worker.enqueue_training(Task::training(9, 2.5, 0, 0.0));

        let ids: Vec<TaskId> = worker.pending().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 9]);
        assert_sorted(&worker);
    }

    #[test]
    fn test_training_ahead_of_other_low_tasks() {
        let mut worker = Worker::new(0);
        worker.arrive(task(1, Severity::Critical, 50.0), 0.0); // busy current
        worker.arrive(task(2, Severity::Low, 5.0), 0.0);
        worker.enqueue_training(Task::training(9, 2.5, 0, 0.0));

        // Front insertion + stable sort puts training before queued Low work.
        let ids: Vec<TaskId> = worker.pending().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![9, 2]);
    }

    #[test]
    fn test_travel_delay_then_arrival() {
        let mut worker = Worker::new(0);
        worker.assign(Task::new(1, Severity::Medium, 5.0, 1000.0));
        assert_eq!(worker.incoming_count(), 1);
        assert!(worker.is_idle());

        worker.advance_travel(400.0, 400.0);
        assert_eq!(worker.incoming_count(), 1);

        worker.advance_travel(600.0, 1000.0);
        assert_eq!(worker.incoming_count(), 0);
        let current = worker.current().unwrap();
        assert_eq!(current.id, 1);
        assert_eq!(current.queue_entered_at_ms, Some(1000.0));
    }

    #[test]
    fn test_load_counts_all_open_work() {
        let mut worker = Worker::new(0);
        worker.arrive(task(1, Severity::Medium, 5.0), 0.0); // current
        worker.arrive(task(2, Severity::Medium, 5.0), 0.0); // pending
        worker.assign(Task::new(3, Severity::Medium, 5.0, 1000.0)); // incoming
        assert_eq!(worker.pending_count(), 2);
        assert_eq!(worker.incoming_count(), 1);
        assert_eq!(worker.load(), 3);
    }

    #[test]
    fn test_severity_counts() {
        let mut worker = Worker::new(0);
        worker.arrive(task(1, Severity::Critical, 5.0), 0.0); // current
        worker.arrive(task(2, Severity::Medium, 5.0), 0.0);
        worker.arrive(task(3, Severity::Medium, 5.0), 0.0);
        worker.arrive(task(4, Severity::Low, 5.0), 0.0);
        assert_eq!(worker.severity_counts(), [1, 0, 2, 1]);
    }

    #[test]
    fn test_clear_keeps_throughput() {
        let mut worker = Worker::new(0);
        worker.set_throughput(1.4);
        worker.arrive(task(1, Severity::Medium, 5.0), 0.0);
        worker.clear();
        assert!(worker.is_idle());
        assert_eq!(worker.load(), 0);
        assert!((worker.throughput() - 1.4).abs() < 1e-12);
    }
}
