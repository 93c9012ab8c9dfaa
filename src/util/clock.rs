//! Clock helpers and the per-round time snapshot.

use std::cell::Cell;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

/// "Current time" shared by every task in a round.
///
/// Refreshed once at the start of each round so all steps observe the same
/// timestamp; never re-sampled mid-round.
#[derive(Debug)]
pub struct ClockCache {
    instant: Cell<Instant>,
    wall_ms: Cell<u128>,
}

impl ClockCache {
    /// Snapshot taken now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            instant: Cell::new(Instant::now()),
            wall_ms: Cell::new(now_ms()),
        }
    }

    /// Take a fresh snapshot.
    pub fn refresh(&self) {
        self.instant.set(Instant::now());
        self.wall_ms.set(now_ms());
    }

    /// Monotonic snapshot.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.instant.get()
    }

    /// Wall-clock snapshot in milliseconds since the epoch.
    #[must_use]
    pub fn now_ms(&self) -> u128 {
        self.wall_ms.get()
    }

    /// Time from the snapshot until `deadline`, zero if already past.
    #[must_use]
    pub fn until(&self, deadline: Instant) -> Duration {
        deadline.saturating_duration_since(self.now())
    }
}

impl Default for ClockCache {
    fn default() -> Self {
        Self::new()
    }
}
