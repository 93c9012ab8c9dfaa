//! Benchmarks for the round-robin engine.
//!
//! Benchmarks cover:
//! - Rounds over registries of stalled and moving tasks
//! - Spawn/release/collect churn
//! - Nested advancement through the reentrancy stack

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::io;
use std::os::fd::RawFd;
use std::time::Duration;

use prometheus_stepwise::core::{Interest, Readiness};
use prometheus_stepwise::{Outcome, Scheduler, Task, TaskId};

// ============================================================================
// Fixtures
// ============================================================================

/// Readiness that never waits, so benchmarks measure the engine alone.
struct NoWait;

impl Readiness for NoWait {
    fn want_fd(&mut self, _fd: RawFd, _interest: Interest) {}

    fn want_timeout(&mut self, _timeout: Duration) {}

    fn clear(&mut self) {}

    fn block(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct Idle;

impl Task for Idle {
    fn step(&mut self, cx: &Scheduler) -> Outcome {
        cx.want_timeout(Duration::from_millis(100));
        Outcome::STALL
    }
}

struct Spinner(u64);

impl Task for Spinner {
    fn step(&mut self, _cx: &Scheduler) -> Outcome {
        self.0 = self.0.wrapping_add(1);
        Outcome::MOVED
    }
}

struct Relay(Option<TaskId>);

impl Task for Relay {
    fn step(&mut self, cx: &Scheduler) -> Outcome {
        cx.advance(self.0)
    }
}

// ============================================================================
// Round Benchmarks
// ============================================================================

fn bench_round_stalled(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_stalled");

    for size in [10u64, 100, 1_000] {
        let sched = Scheduler::new(NoWait);
        let _tasks: Vec<_> = (0..size).map(|_| sched.spawn(Idle)).collect();
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(sched.run_round().unwrap()));
        });
    }
    group.finish();
}

fn bench_round_moving(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_moving");

    for size in [10u64, 100, 1_000] {
        let sched = Scheduler::new(NoWait);
        let _tasks: Vec<_> = (0..size).map(|_| sched.spawn(Spinner(0))).collect();
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(sched.schedule()));
        });
    }
    group.finish();
}

// ============================================================================
// Lifecycle Benchmarks
// ============================================================================

fn bench_spawn_release_collect(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn_release_collect");

    for size in [100u64, 1_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let sched = Scheduler::new(NoWait);
            b.iter(|| {
                for _ in 0..size {
                    drop(sched.spawn(Idle));
                }
                black_box(sched.collect_garbage());
            });
        });
    }
    group.finish();
}

fn bench_nested_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_advance");

    for depth in [4usize, 16, 48] {
        let sched = Scheduler::new(NoWait);
        let mut next = Some(sched.register(Spinner(0)));
        for _ in 1..depth {
            next = Some(sched.register(Relay(next)));
        }
        group.bench_with_input(BenchmarkId::from_parameter(depth), &next, |b, &top| {
            b.iter(|| black_box(sched.advance(top)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_round_stalled,
    bench_round_moving,
    bench_spawn_release_collect,
    bench_nested_advance
);
criterion_main!(benches);
