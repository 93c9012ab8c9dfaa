//! Readiness aggregator interface.

use std::io;
use std::ops::BitOr;
use std::os::fd::RawFd;
use std::time::Duration;

/// Event interest for a file descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interest(u8);

impl Interest {
    /// Data can be read.
    pub const READABLE: Self = Self(0b001);
    /// Data can be written.
    pub const WRITABLE: Self = Self(0b010);
    /// Urgent/out-of-band data.
    pub const PRIORITY: Self = Self(0b100);

    /// True when every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// `None` for an empty set.
    pub(crate) const fn from_bits(bits: u8) -> Option<Self> {
        let bits = bits & 0b111;
        if bits == 0 { None } else { Some(Self(bits)) }
    }
}

impl BitOr for Interest {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Collects the wait conditions of a round and performs the one blocking wait.
///
/// Implementations accumulate [`want_fd`](Self::want_fd) and
/// [`want_timeout`](Self::want_timeout) calls made by tasks during a round.
/// [`block`](Self::block) waits until any registered descriptor is ready or the
/// earliest timeout elapses, then forgets every registration.
pub trait Readiness {
    /// Register interest in `fd` for the current round.
    fn want_fd(&mut self, fd: RawFd, interest: Interest);

    /// Register a wake-up after `timeout`. The earliest request wins.
    fn want_timeout(&mut self, timeout: Duration);

    /// Forget all registrations without waiting.
    fn clear(&mut self);

    /// Wait for the first registered condition, then clear.
    ///
    /// # Errors
    ///
    /// Returns the OS error when the wait itself fails. An interrupted wait is not
    /// an error.
    fn block(&mut self) -> io::Result<()>;

    /// Readiness the last [`block`](Self::block) reported for `fd`. The default
    /// tracks nothing.
    fn ready(&self, _fd: RawFd) -> Option<Interest> {
        None
    }
}

impl<R: Readiness + ?Sized> Readiness for Box<R> {
    fn want_fd(&mut self, fd: RawFd, interest: Interest) {
        (**self).want_fd(fd, interest);
    }

    fn want_timeout(&mut self, timeout: Duration) {
        (**self).want_timeout(timeout);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn block(&mut self) -> io::Result<()> {
        (**self).block()
    }

    fn ready(&self, fd: RawFd) -> Option<Interest> {
        (**self).ready(fd)
    }
}
