//! Core scheduling abstractions: tasks, outcomes, the lifecycle registry and
//! the round-robin engine.

pub mod errno;
pub mod error;
pub mod handle;
pub mod outcome;
pub mod readiness;
pub mod registry;
pub mod scheduler;
pub mod task;

pub use errno::{ErrorClass, is_non_fatal, is_temporary_network_error};
pub use error::{AppResult, SchedulerError};
pub use handle::TaskRef;
pub use outcome::Outcome;
pub use readiness::{Interest, Readiness};
pub use registry::TaskState;
pub use scheduler::{Scheduler, TaskInfo};
pub use task::{AsTaskId, Task, TaskId};
