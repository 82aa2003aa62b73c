//! Simulation loop: arrivals, routing, ticking, triggers, and statistics.
//!
//! [`Simulation`] is the dispatcher. Each call to [`Simulation::tick`]
//! advances the whole system synchronously: the clock moves, due arrivals
//! spawn, unassigned tasks are routed by the configured policy, travel and
//! processing advance per worker, and completions feed the statistics
//! accumulator. Nothing suspends mid-tick and no other thread mutates
//! shared state; a paused simulation simply skips the tick entirely.
//!
//! Randomness is injected: the simulation is generic over `rand::Rng`, so
//! a seeded generator reproduces a run exactly.

mod stats;
mod view;

pub use stats::SimulationStats;
pub use view::{SimulationView, TaskView, WorkerQueueSnapshot, WorkerView};

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, SimulationConfig};
use crate::generator::{sample_complexity_secs, sample_severity};
use crate::models::{
    hours_to_engine_secs, Severity, SimClock, Task, TaskId, Worker, WorkerId, SIM_DAY_MS,
};
use crate::routing::{Router, RoutingPolicy};

/// Duration of a training task in simulated hours.
pub const TRAINING_COST_HOURS: f64 = 1.0;

/// Size of a bulk incident injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentSize {
    /// 5 critical tasks.
    Minor,
    /// 10 critical tasks.
    Moderate,
    /// 20 critical tasks.
    Major,
}

impl IncidentSize {
    /// Number of tasks injected for this incident size.
    pub fn task_count(&self) -> usize {
        match self {
            IncidentSize::Minor => 5,
            IncidentSize::Moderate => 10,
            IncidentSize::Major => 20,
        }
    }
}

/// The priority-preemptive dispatch simulation.
///
/// Owns the clock, the worker pool, the unassigned task pool, the routing
/// state, and the statistics accumulator. All state transitions happen
/// inside [`Simulation::tick`] or one of the synchronous control-surface
/// methods.
///
/// # Example
///
/// ```
/// use dispatch_sim::config::SimulationConfig;
/// use dispatch_sim::sim::Simulation;
///
/// let config = SimulationConfig::new().with_worker_count(2);
/// let mut sim = Simulation::seeded(config, 42).unwrap();
/// for _ in 0..100 {
///     sim.tick(100.0); // 100ms of real time per step
/// }
/// let view = sim.view();
/// assert_eq!(view.workers.len(), 2);
/// ```
#[derive(Debug)]
pub struct Simulation<R: Rng> {
    config: SimulationConfig,
    clock: SimClock,
    rng: R,
    workers: Vec<Worker>,
    /// Spawned or injected tasks awaiting routing.
    unassigned: VecDeque<Task>,
    router: Router,
    stats: SimulationStats,
    next_task_id: TaskId,
    paused: bool,
    /// Simulated ms accumulated since the arrival rate last changed.
    spawn_elapsed_ms: f64,
    /// Arrivals spawned since the arrival rate last changed.
    spawned_since_rate_change: u64,
}

impl Simulation<SmallRng> {
    /// Creates a simulation with a deterministic, seeded random source.
    pub fn seeded(config: SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        Simulation::new(config, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Creates a simulation from a validated configuration and an injected
    /// random source.
    pub fn new(config: SimulationConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let workers = (0..config.worker_count).map(Worker::new).collect();
        Ok(Self {
            clock: SimClock::new(config.speed_multiplier),
            router: Router::new(config.routing),
            config,
            rng,
            workers,
            unassigned: VecDeque::new(),
            stats: SimulationStats::new(),
            next_task_id: 0,
            paused: false,
            spawn_elapsed_ms: 0.0,
            spawned_since_rate_change: 0,
        })
    }

    /// Advances the whole simulation by one real-time step.
    ///
    /// A paused simulation ignores the step entirely — the clock does not
    /// advance and nothing spawns or processes.
    pub fn tick(&mut self, real_delta_ms: f64) {
        if self.paused || real_delta_ms <= 0.0 {
            return;
        }
        self.clock.advance(real_delta_ms);
        let sim_delta_ms = real_delta_ms * self.clock.speed();

        self.spawn_arrivals(sim_delta_ms);
        self.route_unassigned();

        let now_ms = self.clock.now_ms();
        let speed = self.clock.speed();
        let working = self.clock.is_working_hours(&self.config.working_hours);
        for worker in &mut self.workers {
            worker.advance_travel(sim_delta_ms, now_ms);
            if let Some(done) = worker.tick(real_delta_ms, speed, working, now_ms) {
                if !done.training {
                    self.stats.record(done.severity, done.queue_time_ms);
                }
            }
        }
        self.stats.advance_window(real_delta_ms);
    }

    /// Spawns all arrivals due by the current simulated time.
    ///
    /// Drift-free: the number due is `floor(elapsed × rate / day)` against
    /// the accumulated simulated time since the rate last changed, so long
    /// runs spawn exactly rate × days tasks regardless of tick size.
    fn spawn_arrivals(&mut self, sim_delta_ms: f64) {
        if self.config.tasks_per_day == 0 {
            return;
        }
        self.spawn_elapsed_ms += sim_delta_ms;
        let due =
            (self.spawn_elapsed_ms * f64::from(self.config.tasks_per_day) / SIM_DAY_MS) as u64;
        while self.spawned_since_rate_change < due {
            self.spawned_since_rate_change += 1;
            let severity = sample_severity(&self.config.severity_mode, &mut self.rng);
            let cost_secs = sample_complexity_secs(
                self.config.min_complexity_hours,
                self.config.max_complexity_hours,
                &mut self.rng,
            );
            let task = Task::new(
                self.alloc_task_id(),
                severity,
                cost_secs,
                self.config.travel_time_ms,
            );
            debug!(task = task.id, severity = %task.severity, "spawned arrival");
            self.unassigned.push_back(task);
        }
    }

    /// Routes every unassigned task to a worker by the active policy.
    ///
    /// With an empty worker pool the tasks stay put — a transient
    /// condition, not an error.
    fn route_unassigned(&mut self) {
        while !self.unassigned.is_empty() {
            let Some(worker_id) = self.router.select(&self.workers) else {
                break;
            };
            if let (Some(task), Some(worker)) =
                (self.unassigned.pop_front(), self.workers.get_mut(worker_id))
            {
                worker.assign(task);
            }
        }
    }

    /// Injects a bulk incident: `size.task_count()` critical tasks.
    ///
    /// Bypasses the arrival-rate gate and the severity distribution; the
    /// tasks are routed on the next tick.
    pub fn trigger_incident(&mut self, size: IncidentSize) {
        self.inject_incident_tasks(size.task_count());
    }

    /// Injects `count` severity-Critical tasks into the unassigned pool.
    pub fn inject_incident_tasks(&mut self, count: usize) {
        info!(count, "incident triggered");
        for _ in 0..count {
            let cost_secs = sample_complexity_secs(
                self.config.min_complexity_hours,
                self.config.max_complexity_hours,
                &mut self.rng,
            );
            let task = Task::new(
                self.alloc_task_id(),
                Severity::Critical,
                cost_secs,
                self.config.travel_time_ms,
            );
            self.unassigned.push_back(task);
        }
    }

    /// Queues one training task directly on every worker.
    ///
    /// Training tasks bypass travel and the arrival gate; each worker's
    /// throughput rises permanently by 0.1 when its task completes.
    pub fn trigger_training(&mut self) {
        info!(workers = self.workers.len(), "training triggered");
        let now_ms = self.clock.now_ms();
        let cost_secs = hours_to_engine_secs(TRAINING_COST_HOURS);
        for i in 0..self.workers.len() {
            let id = self.alloc_task_id();
            let worker_id = self.workers[i].id;
            self.workers[i].enqueue_training(Task::training(id, cost_secs, worker_id, now_ms));
        }
    }

    /// Stops consuming tick steps. Simulated time freezes.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes consuming tick steps.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether tick steps are currently ignored.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Clears all tasks, queues, statistics, and the clock.
    ///
    /// Workers keep their identity and learned throughput multipliers.
    /// The paused flag is left as-is.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.unassigned.clear();
        self.stats.reset();
        self.router.reset();
        self.next_task_id = 0;
        self.spawn_elapsed_ms = 0.0;
        self.spawned_since_rate_change = 0;
        for worker in &mut self.workers {
            worker.clear();
        }
    }

    /// Applies a new configuration snapshot.
    ///
    /// Validation happens first; on rejection the running configuration is
    /// untouched and the error is returned to the caller. A changed
    /// arrival rate resets the spawn baseline; a changed routing policy
    /// resets the round-robin cursor; a changed worker count resizes the
    /// pool (surviving workers keep their queues and throughput).
    pub fn update_config(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        if let Err(err) = config.validate() {
            warn!(%err, "configuration rejected");
            return Err(err);
        }
        if config.tasks_per_day != self.config.tasks_per_day {
            self.spawn_elapsed_ms = 0.0;
            self.spawned_since_rate_change = 0;
        }
        if config.routing != self.config.routing {
            self.router.set_policy(config.routing);
        }
        self.clock.set_speed(config.speed_multiplier);
        if config.worker_count != self.workers.len() {
            self.resize_workers(config.worker_count);
        }
        self.config = config;
        Ok(())
    }

    /// Sets the number of workers in the pool.
    pub fn set_worker_count(&mut self, count: usize) {
        self.config.worker_count = count;
        self.resize_workers(count);
    }

    /// Switches the routing policy, resetting the round-robin cursor.
    pub fn set_routing(&mut self, policy: RoutingPolicy) {
        self.config.routing = policy;
        self.router.set_policy(policy);
    }

    /// Overrides one worker's throughput multiplier.
    ///
    /// The value is validated (non-negative, finite); an unknown worker id
    /// is a no-op.
    pub fn set_throughput(&mut self, worker: WorkerId, value: f64) -> Result<(), ConfigError> {
        if !(value >= 0.0) || !value.is_finite() {
            return Err(ConfigError::InvalidThroughput(value));
        }
        if let Some(worker) = self.workers.get_mut(worker) {
            worker.set_throughput(value);
        }
        Ok(())
    }

    fn resize_workers(&mut self, count: usize) {
        if count < self.workers.len() {
            self.workers.truncate(count);
        } else {
            for id in self.workers.len()..count {
                self.workers.push(Worker::new(id));
            }
        }
        self.router.reset();
    }

    /// Queue snapshot of one worker, for popup display.
    ///
    /// Pure read: safe to poll at any cadence.
    pub fn select_worker(&self, worker: WorkerId) -> Option<WorkerQueueSnapshot> {
        self.workers.get(worker).map(WorkerQueueSnapshot::capture)
    }

    /// Full renderer snapshot of the current state.
    pub fn view(&self) -> SimulationView {
        let mut tasks: Vec<TaskView> = self.unassigned.iter().map(TaskView::from).collect();
        for worker in &self.workers {
            tasks.extend(worker.incoming().iter().map(TaskView::from));
            tasks.extend(worker.pending().iter().map(TaskView::from));
            if let Some(current) = worker.current() {
                tasks.push(TaskView::from(current));
            }
        }
        SimulationView {
            day: self.clock.day(),
            hour_of_day: self.clock.hour_of_day(),
            minute_of_hour: self.clock.minute_of_hour(),
            is_working_hours: self.clock.is_working_hours(&self.config.working_hours),
            paused: self.paused,
            unassigned_count: self.unassigned.len(),
            tasks,
            workers: self.workers.iter().map(WorkerView::from).collect(),
        }
    }

    /// Active configuration snapshot.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The simulated clock.
    #[inline]
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// The worker pool, in id order.
    #[inline]
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Accumulated statistics.
    #[inline]
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Count of tasks awaiting routing.
    #[inline]
    pub fn unassigned_count(&self) -> usize {
        self.unassigned.len()
    }

    fn alloc_task_id(&mut self) -> TaskId {
        let id = self.next_task_id;
        self.next_task_id += 1;
        id
    }
}
