//! Stochastic generators for arriving tasks.
//!
//! Severity and complexity draws are pure functions of their parameters
//! plus an injected `rand::Rng`, so seeded runs reproduce exactly.

mod complexity;
mod severity;

pub use complexity::{sample_complexity_hours, sample_complexity_secs};
pub use severity::{sample_severity, SEVERITY_MEAN_BASE, SEVERITY_STD_DEV};
