//! # Prometheus Stepwise
//!
//! A single-threaded cooperative task scheduler for event-driven I/O programs.
//!
//! Work is split into tasks that advance one non-blocking step at a time. Each
//! round the scheduler steps every eligible task once. When no task made
//! progress it performs exactly one blocking wait on the file descriptors and
//! timeouts the tasks registered during the round.
//!
//! ## Key Features
//!
//! - **Step outcomes**: every step reports `STALL`, `MOVED` and optionally `WANT_DIE`
//! - **Deferred deletion**: tasks are reference counted and reclaimed only between steps
//! - **Suspension**: explicit and owner-propagated flags with suspend/resume hooks
//! - **Reentrancy**: steps may drive nested rounds or advance other tasks directly
//! - **One wait per stall**: interest is aggregated into a single `poll(2)` call
//!
//! ```rust
//! use std::time::Duration;
//! use prometheus_stepwise::{Outcome, Scheduler, Task};
//!
//! struct Ticker {
//!     ticks: u32,
//! }
//!
//! impl Task for Ticker {
//!     fn step(&mut self, cx: &Scheduler) -> Outcome {
//!         if self.ticks == 5 {
//!             return Outcome::STALL;
//!         }
//!         self.ticks += 1;
//!         cx.want_timeout(Duration::from_millis(1));
//!         Outcome::MOVED
//!     }
//! }
//!
//! let sched = Scheduler::default();
//! let ticker = sched.spawn(Ticker { ticks: 0 });
//! sched.run_until(|_| ticker.get().is_some_and(|t| t.ticks == 5)).unwrap();
//! ```
//!
//! For a process-wide context, see [`runtime::init`] and [`runtime::finalize`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

#[cfg(not(unix))]
compile_error!("prometheus_stepwise waits on file descriptors and supports unix targets only");

/// Core scheduling abstractions: tasks, outcomes, lifecycle and the engine.
pub mod core;
/// Configuration models for scheduler tuning.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Readiness aggregators backed by OS primitives.
pub mod infra;
/// Process-wide scheduler lifecycle.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::core::{Outcome, Scheduler, Task, TaskId, TaskRef};
