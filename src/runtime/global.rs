//! One scheduler per process, owned by the thread that initialized it.
//!
//! The scheduler itself is single-threaded, so the process-wide slot only
//! records which thread owns the context; the context lives in that thread's
//! local storage. Other threads see [`SchedulerError::NotInitialized`].

use std::cell::RefCell;
use std::thread::{self, ThreadId};

use parking_lot::{Mutex, Once};
use tracing::info;

use crate::builders::SchedulerBuilder;
use crate::config::SchedulerConfig;
use crate::core::{Scheduler, SchedulerError};
use crate::util::telemetry::init_tracing;

static TRACING: Once = Once::new();
static OWNER: Mutex<Option<ThreadId>> = parking_lot::const_mutex(None);

thread_local! {
    static CURRENT: RefCell<Option<Scheduler>> = const { RefCell::new(None) };
}

/// Install tracing (first call only) and a scheduler built from `config`
/// for the calling thread.
///
/// # Errors
///
/// [`SchedulerError::AlreadyInitialized`] while a scheduler is installed,
/// [`SchedulerError::InvalidConfig`] when `config` does not validate.
pub fn init(config: SchedulerConfig) -> Result<Scheduler, SchedulerError> {
    init_with(SchedulerBuilder::new().with_config(config))
}

/// Like [`init`], with full control over construction.
///
/// # Errors
///
/// See [`init`].
pub fn init_with(builder: SchedulerBuilder) -> Result<Scheduler, SchedulerError> {
    TRACING.call_once(init_tracing);
    let mut owner = OWNER.lock();
    if owner.is_some() {
        return Err(SchedulerError::AlreadyInitialized);
    }
    let sched = builder.build()?;
    CURRENT.with(|slot| *slot.borrow_mut() = Some(sched.clone()));
    *owner = Some(thread::current().id());
    info!(config = ?sched.config(), "scheduler initialized");
    Ok(sched)
}

/// The installed scheduler, when called from its owning thread.
///
/// # Errors
///
/// [`SchedulerError::NotInitialized`] when nothing is installed for this thread.
pub fn current() -> Result<Scheduler, SchedulerError> {
    CURRENT
        .with(|slot| slot.borrow().clone())
        .ok_or(SchedulerError::NotInitialized)
}

/// True while a scheduler is installed anywhere in the process.
#[must_use]
pub fn is_initialized() -> bool {
    OWNER.lock().is_some()
}

/// Shut down the installed scheduler and free the process-wide slot.
/// Returns the number of tasks still alive after shutdown.
///
/// # Errors
///
/// [`SchedulerError::NotInitialized`] when the calling thread has nothing
/// installed.
pub fn finalize() -> Result<usize, SchedulerError> {
    let mut owner = OWNER.lock();
    let sched = CURRENT
        .with(|slot| slot.borrow_mut().take())
        .ok_or(SchedulerError::NotInitialized)?;
    *owner = None;
    drop(owner);
    let left = sched.shutdown();
    info!(remaining = left, rounds = sched.rounds(), "scheduler finalized");
    Ok(left)
}
