//! Load-distribution policies for routing unassigned tasks to workers.
//!
//! Two policies:
//! - **Round-robin**: cyclic index over the pool, advancing by one per
//!   assignment regardless of load.
//! - **Least-occupied**: the worker minimizing open workload
//!   (pending + in-progress + incoming), ties broken by the
//!   first-encountered worker in pool order.

use serde::{Deserialize, Serialize};

use crate::models::{Worker, WorkerId};

/// Rule for selecting a worker for a newly arrived, unassigned task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingPolicy {
    /// Cyclic assignment across the pool.
    #[default]
    RoundRobin,
    /// Assign to the worker with the smallest open workload.
    LeastOccupied,
}

/// Stateful router: holds the round-robin cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Router {
    policy: RoutingPolicy,
    next_index: usize,
}

impl Router {
    /// Creates a router for the given policy.
    pub fn new(policy: RoutingPolicy) -> Self {
        Self {
            policy,
            next_index: 0,
        }
    }

    /// Active policy.
    #[inline]
    pub fn policy(&self) -> RoutingPolicy {
        self.policy
    }

    /// Switches policy and resets the round-robin cursor.
    pub fn set_policy(&mut self, policy: RoutingPolicy) {
        self.policy = policy;
        self.next_index = 0;
    }

    /// Resets the round-robin cursor (used when the pool is rebuilt).
    pub fn reset(&mut self) {
        self.next_index = 0;
    }

    /// Picks a worker for the next assignment.
    ///
    /// Returns `None` for an empty pool (the task stays unassigned).
    /// Round-robin advances its cursor on every call.
    pub fn select(&mut self, workers: &[Worker]) -> Option<WorkerId> {
        if workers.is_empty() {
            return None;
        }
        match self.policy {
            RoutingPolicy::RoundRobin => {
                let index = self.next_index % workers.len();
                self.next_index = (index + 1) % workers.len();
                Some(workers[index].id)
            }
            RoutingPolicy::LeastOccupied => {
                let mut best = 0;
                for (i, worker) in workers.iter().enumerate().skip(1) {
                    // Strict comparison keeps the first-encountered worker
                    // on ties.
                    if worker.load() < workers[best].load() {
                        best = i;
                    }
                }
                Some(workers[best].id)
            }
        }
    }
}
