//! Task abstraction and identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Outcome, Scheduler};

/// Stable identity of a registered task.
///
/// Combines the arena slot with a process-unique serial, so an id kept after its
/// task was collected never resolves to a newer task that reused the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId {
    pub(crate) slot: usize,
    pub(crate) serial: u64,
}

impl TaskId {
    /// Monotonic serial assigned at registration.
    #[must_use]
    pub const fn serial(self) -> u64 {
        self.serial
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.serial)
    }
}

/// Anything that may name a task: an id, an optional id, or a handle.
///
/// Scheduler operations accept `impl AsTaskId`; the null identity (`None`, a null
/// handle) turns every operation into a no-op.
pub trait AsTaskId {
    /// The named task, if any.
    fn as_task_id(&self) -> Option<TaskId>;
}

impl AsTaskId for TaskId {
    fn as_task_id(&self) -> Option<TaskId> {
        Some(*self)
    }
}

impl AsTaskId for Option<TaskId> {
    fn as_task_id(&self) -> Option<TaskId> {
        *self
    }
}

impl<A: AsTaskId + ?Sized> AsTaskId for &A {
    fn as_task_id(&self) -> Option<TaskId> {
        (**self).as_task_id()
    }
}

/// A unit of cooperative work, advanced one non-blocking step at a time.
///
/// A step must never block. To wait, register interest through the scheduler
/// ([`Scheduler::want_fd`], [`Scheduler::want_timeout`]) and return
/// [`Outcome::STALL`].
///
/// Tasks should not store a [`Scheduler`] clone; the context is passed into every
/// call. Holding one inside a task creates a reference cycle through the registry.
///
/// # Example
///
/// ```
/// use prometheus_stepwise::core::{Outcome, Scheduler, Task};
///
/// struct Countdown(u32);
///
/// impl Task for Countdown {
///     fn step(&mut self, _cx: &Scheduler) -> Outcome {
///         if self.0 == 0 {
///             return Outcome::STALL;
///         }
///         self.0 -= 1;
///         Outcome::MOVED
///     }
/// }
/// ```
pub trait Task: 'static {
    /// Perform one non-blocking progress step.
    fn step(&mut self, cx: &Scheduler) -> Outcome;

    /// Called when the task becomes suspended by either flag.
    ///
    /// Tasks owning slaves override this to call [`Scheduler::suspend_slave`] on them.
    fn on_suspend(&mut self, _cx: &Scheduler) {}

    /// Called when the last suspension flag clears.
    fn on_resume(&mut self, _cx: &Scheduler) {}

    /// Delivered after a round in which this task returned [`Outcome::WANT_DIE`].
    fn on_die_request(&mut self, _cx: &Scheduler) {}

    /// Short label for diagnostics.
    fn log_context(&self) -> Option<String> {
        None
    }

    /// Type name shown in task listings.
    fn kind(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
