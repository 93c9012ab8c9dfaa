//! Per-step outcome bitmask.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Result of a single progress step.
///
/// Outcomes combine with `|` across a round: `STALL | MOVED == MOVED`, and
/// `WANT_DIE` rides alongside either of them.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Outcome(u8);

impl Outcome {
    /// No progress, nothing to report.
    pub const STALL: Self = Self(0);
    /// Progress occurred; the scheduler keeps spinning without blocking.
    pub const MOVED: Self = Self(1);
    /// The task asks for cooperative termination.
    pub const WANT_DIE: Self = Self(2);

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, dropping unknown ones.
    #[must_use]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & (Self::MOVED.0 | Self::WANT_DIE.0))
    }

    /// True when every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when progress was made.
    #[must_use]
    pub const fn is_moved(self) -> bool {
        self.contains(Self::MOVED)
    }

    /// True when no progress was made.
    #[must_use]
    pub const fn is_stall(self) -> bool {
        !self.is_moved()
    }

    /// True when termination was requested.
    #[must_use]
    pub const fn wants_die(self) -> bool {
        self.contains(Self::WANT_DIE)
    }

    /// `MOVED` when `moved` is true, otherwise `STALL`.
    #[must_use]
    pub const fn moved_if(moved: bool) -> Self {
        if moved {
            Self::MOVED
        } else {
            Self::STALL
        }
    }
}

impl BitOr for Outcome {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Outcome {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_moved(), self.wants_die()) {
            (false, false) => f.write_str("STALL"),
            (true, false) => f.write_str("MOVED"),
            (false, true) => f.write_str("WANT_DIE"),
            (true, true) => f.write_str("MOVED | WANT_DIE"),
        }
    }
}
