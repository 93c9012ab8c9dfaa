//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io;
use std::os::fd::RawFd;
use std::rc::Rc;
use std::time::Duration;

use prometheus_stepwise::core::{Interest, Readiness};
use prometheus_stepwise::{Outcome, Scheduler, Task};

/// What a [`RecordingReadiness`] saw.
#[derive(Debug, Default)]
pub struct ReadinessLog {
    /// Number of `block` calls.
    pub blocks: u32,
    /// Number of `clear` calls.
    pub clears: u32,
    /// Timeout in effect at each `block`.
    pub waits: Vec<Option<Duration>>,
    /// Descriptors registered at each `block`.
    pub fds_at_block: Vec<Vec<(RawFd, Interest)>>,
    fds: Vec<(RawFd, Interest)>,
    timeout: Option<Duration>,
}

/// Readiness that records registrations and returns from `block` at once.
#[derive(Clone, Default)]
pub struct RecordingReadiness {
    pub log: Rc<RefCell<ReadinessLog>>,
}

impl RecordingReadiness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> u32 {
        self.log.borrow().blocks
    }

    pub fn clears(&self) -> u32 {
        self.log.borrow().clears
    }

    pub fn last_wait(&self) -> Option<Option<Duration>> {
        self.log.borrow().waits.last().copied()
    }
}

impl Readiness for RecordingReadiness {
    fn want_fd(&mut self, fd: RawFd, interest: Interest) {
        self.log.borrow_mut().fds.push((fd, interest));
    }

    fn want_timeout(&mut self, timeout: Duration) {
        let mut log = self.log.borrow_mut();
        log.timeout = Some(log.timeout.map_or(timeout, |t| t.min(timeout)));
    }

    fn clear(&mut self) {
        let mut log = self.log.borrow_mut();
        log.clears += 1;
        log.fds.clear();
        log.timeout = None;
    }

    fn block(&mut self) -> io::Result<()> {
        let mut log = self.log.borrow_mut();
        log.blocks += 1;
        let timeout = log.timeout.take();
        log.waits.push(timeout);
        let fds = std::mem::take(&mut log.fds);
        log.fds_at_block.push(fds);
        Ok(())
    }
}

/// Scheduler over a fresh [`RecordingReadiness`].
pub fn recording_scheduler() -> (Scheduler, RecordingReadiness) {
    let readiness = RecordingReadiness::new();
    (Scheduler::new(readiness.clone()), readiness)
}

/// Task driven by a closure.
pub struct FnTask<F>(pub F);

impl<F: FnMut(&Scheduler) -> Outcome + 'static> Task for FnTask<F> {
    fn step(&mut self, cx: &Scheduler) -> Outcome {
        (self.0)(cx)
    }
}

/// Counts its steps; moves for the first `moves` steps, stalls afterwards.
pub struct Counter {
    pub steps: Rc<Cell<u32>>,
    pub moves: u32,
}

impl Counter {
    pub fn new(moves: u32) -> (Self, Rc<Cell<u32>>) {
        let steps = Rc::new(Cell::new(0));
        (
            Self {
                steps: Rc::clone(&steps),
                moves,
            },
            steps,
        )
    }
}

impl Task for Counter {
    fn step(&mut self, _cx: &Scheduler) -> Outcome {
        let n = self.steps.get() + 1;
        self.steps.set(n);
        Outcome::moved_if(n <= self.moves)
    }
}

/// Stalls forever and bumps a counter when dropped.
pub struct DropProbe(pub Rc<Cell<u32>>);

impl Task for DropProbe {
    fn step(&mut self, _cx: &Scheduler) -> Outcome {
        Outcome::STALL
    }
}

impl Drop for DropProbe {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}
