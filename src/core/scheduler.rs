//! The scheduler context: lifecycle manager, suspension, reentrancy stack and
//! the round-robin engine.
//!
//! A [`Scheduler`] is a cheap, clonable handle to one single-threaded context.
//! All state lives behind `RefCell`s and is never borrowed while task code runs,
//! so steps and hooks may freely call back into the scheduler: spawn, release,
//! suspend, or drive nested rounds.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use prometheus_stepwise::core::{Outcome, Scheduler, Task};
//! use prometheus_stepwise::infra::PollVec;
//!
//! struct Countdown(u32);
//!
//! impl Task for Countdown {
//!     fn step(&mut self, _cx: &Scheduler) -> Outcome {
//!         if self.0 == 0 {
//!             return Outcome::STALL;
//!         }
//!         self.0 -= 1;
//!         Outcome::MOVED
//!     }
//! }
//!
//! let sched = Scheduler::new(PollVec::new());
//! let task = sched.spawn(Countdown(3));
//! sched.roll_all(Duration::from_millis(10)).unwrap();
//! assert_eq!(task.get().unwrap().0, 0);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::io;
use std::os::fd::RawFd;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, error, info, trace, warn};

use super::errno::{self, ErrorClass};
use super::registry::{Registry, TaskCell, TaskState};
use super::{AsTaskId, Interest, Outcome, Readiness, SchedulerError, Task, TaskId, TaskRef};
use crate::builders::SchedulerBuilder;
use crate::config::SchedulerConfig;
use crate::infra::PollVec;
use crate::util::clock::ClockCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    Suspend,
    Resume,
    DieRequest,
}

#[derive(Debug, Clone, Copy)]
enum SuspendFlag {
    Direct,
    Slave,
}

pub(crate) struct Shared {
    config: SchedulerConfig,
    registry: RefCell<Registry>,
    stack: RefCell<Vec<TaskId>>,
    clock: ClockCache,
    readiness: RefCell<Box<dyn Readiness>>,
    /// Hooks aimed at a task that was busy; delivered when it goes idle.
    pending_hooks: RefCell<Vec<(TaskId, Hook)>>,
    rounds: Cell<u64>,
    blocks: Cell<u64>,
}

/// Diagnostic view of one registered task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskInfo {
    /// Task identity.
    pub id: TaskId,
    /// Type name captured at registration.
    pub kind: &'static str,
    /// Task-supplied label, absent while the task is executing.
    pub context: Option<String>,
    /// Scheduler bookkeeping.
    pub state: TaskState,
}

/// Cooperative, single-threaded scheduler context.
#[derive(Clone)]
pub struct Scheduler {
    shared: Rc<Shared>,
}

/// Marks a task busy for the lifetime of the guard and, for steps, keeps a
/// reentrancy frame pushed. Pops and decrements on drop, so frames stay paired
/// however the step exits. Deferred hooks are flushed by the caller once both
/// the frame and the task borrow are gone.
struct Frame<'a> {
    sched: &'a Scheduler,
    id: TaskId,
    pushed: bool,
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        if self.pushed {
            let popped = self.sched.shared.stack.borrow_mut().pop();
            debug_assert_eq!(popped, Some(self.id), "reentrancy stack out of order");
            trace!(task = %self.id, "leave");
        }
        if let Some(state) = self.sched.shared.registry.borrow_mut().state_mut(self.id) {
            state.running = state.running.saturating_sub(1);
        }
    }
}

impl Scheduler {
    /// Scheduler with default configuration over `readiness`.
    pub fn new(readiness: impl Readiness + 'static) -> Self {
        Self::from_parts(SchedulerConfig::default(), Box::new(readiness))
    }

    /// Scheduler with a validated configuration.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidConfig`] when `config` fails validation.
    pub fn with_config(
        config: SchedulerConfig,
        readiness: impl Readiness + 'static,
    ) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;
        Ok(Self::from_parts(config, Box::new(readiness)))
    }

    /// Start building a scheduler with non-default settings.
    #[must_use]
    pub fn builder() -> SchedulerBuilder {
        SchedulerBuilder::new()
    }

    pub(crate) fn from_parts(config: SchedulerConfig, readiness: Box<dyn Readiness>) -> Self {
        Self {
            shared: Rc::new(Shared {
                config,
                registry: RefCell::new(Registry::default()),
                stack: RefCell::new(Vec::new()),
                clock: ClockCache::new(),
                readiness: RefCell::new(readiness),
                pending_hooks: RefCell::new(Vec::new()),
                rounds: Cell::new(0),
                blocks: Cell::new(0),
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<Shared> {
        Rc::downgrade(&self.shared)
    }

    pub(crate) const fn from_shared(shared: Rc<Shared>) -> Self {
        Self { shared }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.shared.config
    }

    // ------------------------------------------------------------------
    // Registration and lifecycle
    // ------------------------------------------------------------------

    /// Add a task to the registry without binding a handle to it.
    ///
    /// The task stays alive until something requests its deletion.
    pub fn register<T: Task>(&self, task: T) -> TaskId {
        let kind = task.kind();
        self.insert(Rc::new(RefCell::new(task)), kind)
    }

    /// Add a task to the registry and return the first owning handle.
    pub fn spawn<T: Task>(&self, task: T) -> TaskRef<T> {
        let kind = task.kind();
        let cell = Rc::new(RefCell::new(task));
        let erased: TaskCell = cell.clone();
        let id = self.insert(erased, kind);
        TaskRef::bound(self, id, cell)
    }

    fn insert(&self, cell: TaskCell, kind: &'static str) -> TaskId {
        let id = self.shared.registry.borrow_mut().insert(cell, kind);
        debug!(task = %id, kind, "task registered");
        id
    }

    /// Increment the reference count. Returns the identity, or `None` for the
    /// null identity or a task that no longer exists.
    pub fn bind(&self, task: impl AsTaskId) -> Option<TaskId> {
        let id = task.as_task_id()?;
        let mut registry = self.shared.registry.borrow_mut();
        let state = registry.state_mut(id)?;
        state.ref_count = state.ref_count.saturating_add(1);
        trace!(task = %id, refs = state.ref_count, "bind");
        Some(id)
    }

    /// Decrement the reference count (never below zero) and request deletion.
    ///
    /// Every release re-evaluates whether the task can be freed; the task is
    /// reclaimed by the next collection pass once nothing references or runs it.
    pub fn release(&self, task: impl AsTaskId) {
        let Some(id) = task.as_task_id() else {
            return;
        };
        {
            let mut registry = self.shared.registry.borrow_mut();
            let Some(state) = registry.state_mut(id) else {
                return;
            };
            state.ref_count = state.ref_count.saturating_sub(1);
            trace!(task = %id, refs = state.ref_count, "release");
        }
        self.request_delete(id);
    }

    /// Decrement the reference count without requesting deletion.
    ///
    /// Used when a handle gives up ownership but the task should keep living.
    pub fn disown(&self, task: impl AsTaskId) {
        let Some(id) = task.as_task_id() else {
            return;
        };
        if let Some(state) = self.shared.registry.borrow_mut().state_mut(id) {
            state.ref_count = state.ref_count.saturating_sub(1);
            trace!(task = %id, refs = state.ref_count, "disown");
        }
    }

    /// Mark the task for deferred deletion. Never frees immediately.
    pub fn request_delete(&self, task: impl AsTaskId) {
        let Some(id) = task.as_task_id() else {
            return;
        };
        if let Some(state) = self.shared.registry.borrow_mut().state_mut(id) {
            state.deleting = true;
        }
    }

    /// Destroy every task with no references, a pending deletion and no active
    /// step. Returns how many were destroyed.
    pub fn collect_garbage(&self) -> usize {
        let freed = self.shared.registry.borrow_mut().sweep();
        let count = freed.len();
        if count > 0 {
            let registry = self.shared.registry.borrow();
            self.shared
                .pending_hooks
                .borrow_mut()
                .retain(|(id, _)| registry.contains(*id));
        }
        // Destructors may release handles they hold, so the registry borrow must
        // be gone before the cells drop.
        drop(freed);
        if count > 0 {
            debug!(collected = count, remaining = self.task_count(), "garbage collected");
        }
        count
    }

    /// Condemn every unreferenced task and collect until nothing more goes.
    /// Returns the number of tasks left, which are still referenced or running.
    pub fn shutdown(&self) -> usize {
        loop {
            self.shared.registry.borrow_mut().condemn_unreferenced();
            if self.collect_garbage() == 0 {
                break;
            }
        }
        let left = self.task_count();
        if left > 0 {
            warn!(remaining = left, "tasks still alive at shutdown");
            self.log_tasks();
        }
        left
    }

    /// Bookkeeping for a task, if it exists.
    #[must_use]
    pub fn state(&self, task: impl AsTaskId) -> Option<TaskState> {
        let id = task.as_task_id()?;
        self.shared.registry.borrow().state(id)
    }

    /// True while the task is registered.
    #[must_use]
    pub fn contains(&self, task: impl AsTaskId) -> bool {
        task.as_task_id()
            .is_some_and(|id| self.shared.registry.borrow().contains(id))
    }

    /// Number of registered tasks.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.shared.registry.borrow().len()
    }

    // ------------------------------------------------------------------
    // Suspension
    // ------------------------------------------------------------------

    /// Suspend the task explicitly.
    pub fn suspend(&self, task: impl AsTaskId) {
        self.set_suspended(task, SuspendFlag::Direct, true);
    }

    /// Clear the explicit suspension.
    pub fn resume(&self, task: impl AsTaskId) {
        self.set_suspended(task, SuspendFlag::Direct, false);
    }

    /// Suspend a slave on behalf of its owner. Meant for [`Task::on_suspend`].
    pub fn suspend_slave(&self, task: impl AsTaskId) {
        self.set_suspended(task, SuspendFlag::Slave, true);
    }

    /// Clear owner-propagated suspension. Meant for [`Task::on_resume`].
    pub fn resume_slave(&self, task: impl AsTaskId) {
        self.set_suspended(task, SuspendFlag::Slave, false);
    }

    /// Suspended by either flag.
    #[must_use]
    pub fn is_suspended(&self, task: impl AsTaskId) -> bool {
        self.state(task).is_some_and(|state| state.is_suspended())
    }

    fn set_suspended(&self, task: impl AsTaskId, flag: SuspendFlag, on: bool) {
        let Some(id) = task.as_task_id() else {
            return;
        };
        let hook = {
            let mut registry = self.shared.registry.borrow_mut();
            let Some(state) = registry.state_mut(id) else {
                return;
            };
            let was_suspended = state.is_suspended();
            let field = match flag {
                SuspendFlag::Direct => &mut state.suspended,
                SuspendFlag::Slave => &mut state.suspended_slave,
            };
            if *field == on {
                return;
            }
            *field = on;
            match (was_suspended, state.is_suspended()) {
                (false, true) => Some(Hook::Suspend),
                (true, false) => Some(Hook::Resume),
                _ => None,
            }
        };
        debug!(task = %id, ?flag, on, "suspension changed");
        if let Some(hook) = hook {
            self.dispatch_hook(id, hook);
        }
    }

    // ------------------------------------------------------------------
    // Reentrancy
    // ------------------------------------------------------------------

    /// The task whose step is innermost on the stack.
    #[must_use]
    pub fn current(&self) -> Option<TaskId> {
        self.shared.stack.borrow().last().copied()
    }

    /// Number of nested steps currently executing.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.shared.stack.borrow().len()
    }

    fn enter(&self, id: TaskId, push: bool) -> Option<Frame<'_>> {
        if push && self.depth() >= self.shared.config.max_nesting_depth {
            warn!(task = %id, depth = self.depth(), "nesting limit reached, step refused");
            return None;
        }
        self.shared.registry.borrow_mut().state_mut(id)?.running += 1;
        if push {
            self.shared.stack.borrow_mut().push(id);
            trace!(task = %id, depth = self.depth(), "enter");
        }
        Some(Frame {
            sched: self,
            id,
            pushed: push,
        })
    }

    fn cell(&self, id: TaskId) -> Option<TaskCell> {
        self.shared
            .registry
            .borrow()
            .get(id)
            .map(|slot| Rc::clone(&slot.task))
    }

    /// One step of `id` inside a frame. `None` when the step could not run.
    fn run_step(&self, id: TaskId) -> Option<Outcome> {
        let cell = self.cell(id)?;
        let outcome = {
            let Ok(mut task) = cell.try_borrow_mut() else {
                trace!(task = %id, "task busy, step skipped");
                return None;
            };
            let _frame = self.enter(id, true)?;
            task.step(self)
        };
        trace!(task = %id, ?outcome, "step");
        self.flush_if_idle(id);
        Some(outcome)
    }

    /// Queue a hook behind any earlier ones for the task and deliver what can
    /// be delivered now.
    fn dispatch_hook(&self, id: TaskId, hook: Hook) {
        self.shared.pending_hooks.borrow_mut().push((id, hook));
        self.flush_if_idle(id);
    }

    /// Deliver queued hooks of `id` in order while the task is idle and not
    /// borrowed. Hooks raised by a hook are queued and picked up by this loop.
    fn flush_if_idle(&self, id: TaskId) {
        loop {
            if !self.state(id).is_some_and(|state| state.running == 0) {
                return;
            }
            let Some(cell) = self.cell(id) else {
                return;
            };
            let Ok(mut task) = cell.try_borrow_mut() else {
                trace!(task = %id, "task borrowed, hooks deferred");
                return;
            };
            let next = {
                let mut pending = self.shared.pending_hooks.borrow_mut();
                pending
                    .iter()
                    .position(|(task, _)| *task == id)
                    .map(|index| pending.remove(index).1)
            };
            let Some(hook) = next else {
                return;
            };
            let Some(_frame) = self.enter(id, false) else {
                return;
            };
            trace!(task = %id, ?hook, "hook");
            match hook {
                Hook::Suspend => task.on_suspend(self),
                Hook::Resume => task.on_resume(self),
                Hook::DieRequest => task.on_die_request(self),
            }
        }
    }

    /// Deliver hooks left queued for tasks that have since gone idle.
    fn flush_pending(&self) {
        let mut ids: Vec<TaskId> = self
            .shared
            .pending_hooks
            .borrow()
            .iter()
            .map(|(id, _)| *id)
            .collect();
        ids.dedup();
        for id in ids {
            self.flush_if_idle(id);
        }
    }

    // ------------------------------------------------------------------
    // Readiness and time
    // ------------------------------------------------------------------

    /// Wait for `fd` becoming ready for `interest` when the round stalls.
    pub fn want_fd(&self, fd: RawFd, interest: Interest) {
        self.shared.readiness.borrow_mut().want_fd(fd, interest);
    }

    /// Wake up after `timeout` when the round stalls.
    pub fn want_timeout(&self, timeout: Duration) {
        self.shared.readiness.borrow_mut().want_timeout(timeout);
    }

    /// Readiness the last wait reported for `fd`, if the aggregator tracks it.
    #[must_use]
    pub fn ready(&self, fd: RawFd) -> Option<Interest> {
        self.shared.readiness.borrow().ready(fd)
    }

    /// Wake up at `deadline`, measured against the round's clock snapshot.
    pub fn want_deadline(&self, deadline: Instant) {
        self.want_timeout(self.shared.clock.until(deadline));
    }

    /// Monotonic time of the current round.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.shared.clock.now()
    }

    /// Wall-clock milliseconds of the current round.
    #[must_use]
    pub fn now_ms(&self) -> u128 {
        self.shared.clock.now_ms()
    }

    /// Classify an I/O error seen by the current task.
    ///
    /// For retryable errors that need a back-off, registers the back-off as a
    /// timeout for this round so the stalled task is woken to try again.
    pub fn classify_io_error(&self, err: &io::Error) -> ErrorClass {
        let config = &self.shared.config;
        let class = errno::classify(err, config.disk_full_fatal);
        if class == ErrorClass::Retry {
            let delay = err.raw_os_error().and_then(|code| {
                errno::retry_delay(
                    code,
                    config.disk_full_fatal,
                    Duration::from_millis(config.resource_retry_ms),
                )
            });
            if let Some(delay) = delay.filter(|d| !d.is_zero()) {
                self.want_timeout(delay);
            }
        }
        class
    }

    // ------------------------------------------------------------------
    // Engine
    // ------------------------------------------------------------------

    /// One round: refresh the clock, deliver hooks deferred by earlier borrows,
    /// step every eligible task once, deliver termination requests and collect
    /// garbage per policy.
    ///
    /// A nested round keeps the clock snapshot and the readiness registrations
    /// of the outermost one.
    ///
    /// Returns the OR of all step outcomes. Never blocks.
    pub fn schedule(&self) -> Outcome {
        let depth = self.depth();
        if depth == 0 {
            self.shared.clock.refresh();
            self.shared.readiness.borrow_mut().clear();
        }
        self.flush_pending();

        let order = self.shared.registry.borrow().snapshot();
        let mut combined = Outcome::STALL;
        let mut stepped = 0usize;
        let mut dying = Vec::new();
        for id in order {
            let eligible = self
                .shared
                .registry
                .borrow()
                .state(id)
                .is_some_and(|state| state.is_schedulable());
            if !eligible {
                continue;
            }
            if let Some(outcome) = self.run_step(id) {
                stepped += 1;
                if outcome.wants_die() {
                    dying.push(id);
                }
                combined |= outcome;
            }
        }

        for id in dying {
            debug!(task = %id, "termination requested");
            self.dispatch_hook(id, Hook::DieRequest);
        }

        let round = self.shared.rounds.get() + 1;
        self.shared.rounds.set(round);
        if round % u64::from(self.shared.config.gc_interval_rounds) == 0 {
            self.collect_garbage();
        }

        debug_assert_eq!(self.depth(), depth, "round left frames on the stack");
        trace!(round, stepped, outcome = ?combined, depth, "round complete");
        combined
    }

    /// Perform the readiness wait for the registrations of this round.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::Readiness`] when the OS wait fails.
    pub fn block(&self) -> Result<(), SchedulerError> {
        self.shared.blocks.set(self.shared.blocks.get() + 1);
        debug!(round = self.shared.rounds.get(), "blocking for readiness");
        self.shared.readiness.borrow_mut().block().map_err(|e| {
            error!("readiness wait failed: {e}");
            SchedulerError::from(e)
        })
    }

    /// One round, then block exactly once if nothing moved.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::Readiness`] when the OS wait fails.
    pub fn run_round(&self) -> Result<Outcome, SchedulerError> {
        let outcome = self.schedule();
        if outcome.is_stall() {
            self.block()?;
        }
        Ok(outcome)
    }

    /// Run rounds until `done` returns true. Returns the number of rounds run.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::Readiness`] when the OS wait fails.
    pub fn run_until(&self, mut done: impl FnMut(&Self) -> bool) -> Result<u64, SchedulerError> {
        let mut rounds = 0;
        while !done(self) {
            self.run_round()?;
            rounds += 1;
        }
        Ok(rounds)
    }

    /// Make as much progress as possible within `budget`.
    ///
    /// Rounds repeat while they move; a stalled round blocks for at most the
    /// remaining budget, rounded down to whole milliseconds since that is the
    /// resolution of the wait. Returns the OR of all round outcomes once the
    /// budget is spent, or straight away when a round stalls with less than a
    /// millisecond left.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::Readiness`] when the OS wait fails.
    pub fn roll_all(&self, budget: Duration) -> Result<Outcome, SchedulerError> {
        let deadline = Instant::now().checked_add(budget);
        let remaining = || deadline.map(|d| d.saturating_duration_since(Instant::now()));
        let mut combined = Outcome::STALL;
        loop {
            let outcome = self.schedule();
            combined |= outcome;
            let left = remaining();
            if left.is_some_and(|d| d.is_zero()) {
                break;
            }
            if outcome.is_moved() {
                continue;
            }
            if let Some(left) = left {
                let wait = whole_millis(left);
                if wait.is_zero() {
                    break;
                }
                self.want_timeout(wait);
            }
            self.block()?;
            if remaining().is_some_and(|d| d.is_zero()) {
                break;
            }
        }
        Ok(combined)
    }

    /// Invoke exactly one step of `task`, outside the registry walk.
    ///
    /// Suspension does not prevent it. Returns `STALL` without stepping when the
    /// task is unknown, already executing, or being deleted.
    pub fn advance(&self, task: impl AsTaskId) -> Outcome {
        let Some(id) = self.drivable(task) else {
            return Outcome::STALL;
        };
        self.run_step(id).unwrap_or(Outcome::STALL)
    }

    /// Step `task` repeatedly while it reports progress and is not being
    /// deleted. Returns `MOVED` if any step moved.
    ///
    /// A task that always reports `MOVED` keeps this call spinning.
    pub fn roll(&self, task: impl AsTaskId) -> Outcome {
        let Some(id) = self.drivable(task) else {
            return Outcome::STALL;
        };
        let Some(cell) = self.cell(id) else {
            return Outcome::STALL;
        };
        let mut moved = false;
        {
            let Ok(mut task) = cell.try_borrow_mut() else {
                return Outcome::STALL;
            };
            let Some(_frame) = self.enter(id, true) else {
                return Outcome::STALL;
            };
            loop {
                if task.step(self).is_stall() {
                    break;
                }
                moved = true;
                if self.state(id).is_none_or(|state| state.deleting) {
                    break;
                }
            }
        }
        self.flush_if_idle(id);
        Outcome::moved_if(moved)
    }

    fn drivable(&self, task: impl AsTaskId) -> Option<TaskId> {
        let id = task.as_task_id()?;
        let state = self.state(id)?;
        (state.running == 0 && !state.deleting).then_some(id)
    }

    /// Rounds completed so far.
    #[must_use]
    pub fn rounds(&self) -> u64 {
        self.shared.rounds.get()
    }

    /// Blocking waits performed so far.
    #[must_use]
    pub fn blocks(&self) -> u64 {
        self.shared.blocks.get()
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Snapshot of the registry in walk order.
    #[must_use]
    pub fn tasks(&self) -> Vec<TaskInfo> {
        let entries: Vec<_> = self
            .shared
            .registry
            .borrow()
            .iter()
            .map(|slot| (slot.id, slot.kind, slot.state, Rc::clone(&slot.task)))
            .collect();
        entries
            .into_iter()
            .map(|(id, kind, state, cell)| TaskInfo {
                id,
                kind,
                context: cell.try_borrow().ok().and_then(|task| task.log_context()),
                state,
            })
            .collect()
    }

    /// Print one line per task: id, kind, flags, label.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn write_tasks(&self, out: &mut impl io::Write) -> io::Result<()> {
        for info in self.tasks() {
            let mut flags = Vec::new();
            if info.state.running > 0 {
                flags.push("running");
            }
            if info.state.suspended {
                flags.push("suspended");
            }
            if info.state.suspended_slave {
                flags.push("suspended-slave");
            }
            if info.state.deleting {
                flags.push("deleting");
            }
            writeln!(
                out,
                "{}\t{}\trefs={}\t[{}]\t{}",
                info.id,
                info.kind,
                info.state.ref_count,
                flags.join(","),
                info.context.as_deref().unwrap_or("")
            )?;
        }
        Ok(())
    }

    /// Log the registry at info level.
    pub fn log_tasks(&self) {
        for info in self.tasks() {
            info!(
                task = %info.id,
                kind = info.kind,
                refs = info.state.ref_count,
                running = info.state.running,
                suspended = info.state.is_suspended(),
                deleting = info.state.deleting,
                context = info.context.as_deref().unwrap_or(""),
                "live task"
            );
        }
    }
}

/// `poll(2)` takes whole milliseconds and rounds partial ones up.
fn whole_millis(d: Duration) -> Duration {
    Duration::from_millis(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(PollVec::new())
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("tasks", &self.task_count())
            .field("depth", &self.depth())
            .field("rounds", &self.rounds())
            .field("blocks", &self.blocks())
            .finish_non_exhaustive()
    }
}
