//! Tests for utility functions

use std::time::{Duration, Instant};

use prometheus_stepwise::util::{now_ms, ClockCache};

#[test]
fn test_now_ms_is_after_2020() {
    assert!(now_ms() > 1_577_836_800_000);
}

#[test]
fn test_clock_until() {
    let clock = ClockCache::new();
    let later = clock.now() + Duration::from_millis(30);
    assert_eq!(clock.until(later), Duration::from_millis(30));
    assert_eq!(clock.until(clock.now()), Duration::ZERO);

    std::thread::sleep(Duration::from_millis(2));
    clock.refresh();
    assert!(clock.now() <= Instant::now());
    assert!(clock.until(later) < Duration::from_millis(30));
}

#[test]
fn test_init_tracing_is_idempotent() {
    prometheus_stepwise::util::init_tracing_with("prometheus_stepwise=debug");
    prometheus_stepwise::util::init_tracing();
}
