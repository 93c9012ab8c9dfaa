//! `poll(2)`-backed readiness aggregator.

use std::fmt;
use std::io;
use std::os::fd::RawFd;
use std::time::Duration;

use tracing::trace;

use crate::core::{Interest, Readiness};

/// Accumulates descriptor interest and the earliest timeout for one round and
/// waits on them with a single `poll(2)` call.
#[derive(Default)]
pub struct PollVec {
    fds: Vec<libc::pollfd>,
    timeout: Option<Duration>,
    /// Descriptors and `revents` from the last completed wait.
    last: Vec<libc::pollfd>,
}

impl PollVec {
    /// Empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered descriptors.
    #[must_use]
    pub fn fd_count(&self) -> usize {
        self.fds.len()
    }

    /// Earliest registered timeout.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn finish(&mut self) {
        self.last = std::mem::take(&mut self.fds);
        self.timeout = None;
    }
}

fn poll_events(interest: Interest) -> libc::c_short {
    let mut events = 0;
    if interest.contains(Interest::READABLE) {
        events |= libc::POLLIN;
    }
    if interest.contains(Interest::WRITABLE) {
        events |= libc::POLLOUT;
    }
    if interest.contains(Interest::PRIORITY) {
        events |= libc::POLLPRI;
    }
    events
}

/// `None` waits forever; partial milliseconds round up so a short timeout
/// never turns into a busy spin.
fn timeout_ms(timeout: Option<Duration>) -> libc::c_int {
    timeout.map_or(-1, |d| {
        let ms = d.as_nanos().div_ceil(1_000_000);
        libc::c_int::try_from(ms).unwrap_or(libc::c_int::MAX)
    })
}

#[allow(unsafe_code)]
fn sys_poll(fds: &mut [libc::pollfd], timeout: libc::c_int) -> io::Result<usize> {
    let nfds = libc::nfds_t::try_from(fds.len())
        .map_err(|_| io::Error::other("too many descriptors for poll"))?;
    // SAFETY: `fds` is an exclusively borrowed slice of initialized `pollfd`
    // for the whole call and `nfds` is its length.
    let rc = unsafe { libc::poll(fds.as_mut_ptr(), nfds, timeout) };
    usize::try_from(rc).map_err(|_| io::Error::last_os_error())
}

impl Readiness for PollVec {
    fn want_fd(&mut self, fd: RawFd, interest: Interest) {
        let events = poll_events(interest);
        if let Some(existing) = self.fds.iter_mut().find(|p| p.fd == fd) {
            existing.events |= events;
            return;
        }
        self.fds.push(libc::pollfd {
            fd,
            events,
            revents: 0,
        });
    }

    fn want_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(self.timeout.map_or(timeout, |t| t.min(timeout)));
    }

    fn clear(&mut self) {
        self.fds.clear();
        self.timeout = None;
    }

    /// Hang-ups and errors are reported as readable and writable so the owner
    /// attempts I/O and sees the failure.
    fn ready(&self, fd: RawFd) -> Option<Interest> {
        let revents = self.last.iter().find(|p| p.fd == fd)?.revents;
        let mut bits = 0u8;
        if revents & libc::POLLIN != 0 {
            bits |= Interest::READABLE.bits();
        }
        if revents & libc::POLLOUT != 0 {
            bits |= Interest::WRITABLE.bits();
        }
        if revents & libc::POLLPRI != 0 {
            bits |= Interest::PRIORITY.bits();
        }
        if revents & (libc::POLLHUP | libc::POLLERR | libc::POLLNVAL) != 0 {
            bits |= Interest::READABLE.bits() | Interest::WRITABLE.bits();
        }
        Interest::from_bits(bits)
    }

    fn block(&mut self) -> io::Result<()> {
        if self.fds.is_empty() && self.timeout == Some(Duration::ZERO) {
            self.finish();
            return Ok(());
        }
        let timeout = timeout_ms(self.timeout);
        trace!(fds = self.fds.len(), timeout_ms = timeout, "poll");
        let result = sys_poll(&mut self.fds, timeout);
        self.finish();
        match result {
            Ok(ready) => {
                trace!(ready, "poll returned");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl fmt::Debug for PollVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fds: Vec<_> = self.fds.iter().map(|p| (p.fd, p.events)).collect();
        f.debug_struct("PollVec")
            .field("fds", &fds)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
