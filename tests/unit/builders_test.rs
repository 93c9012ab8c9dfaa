//! Tests for builder modules

use prometheus_stepwise::builders::{build_scheduler, SchedulerBuilder};
use prometheus_stepwise::config::SchedulerConfig;
use prometheus_stepwise::core::SchedulerError;
use prometheus_stepwise::infra::PollVec;

#[test]
fn test_builder_defaults() {
    let sched = SchedulerBuilder::new().build().unwrap();
    assert_eq!(*sched.config(), SchedulerConfig::default());
    assert_eq!(sched.task_count(), 0);
}

#[test]
fn test_builder_overrides() {
    let sched = SchedulerBuilder::new()
        .with_gc_interval_rounds(10)
        .with_max_nesting_depth(4)
        .with_resource_retry_ms(50)
        .with_disk_full_fatal(true)
        .with_readiness(PollVec::new())
        .build()
        .unwrap();
    let cfg = sched.config();
    assert_eq!(cfg.gc_interval_rounds, 10);
    assert_eq!(cfg.max_nesting_depth, 4);
    assert_eq!(cfg.resource_retry_ms, 50);
    assert!(cfg.disk_full_fatal);
}

#[test]
fn test_builder_rejects_invalid_config() {
    let result = SchedulerBuilder::new().with_max_nesting_depth(0).build();
    assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
}

#[test]
fn test_build_scheduler_with_factory() {
    let cfg = SchedulerConfig {
        gc_interval_rounds: 2,
        ..SchedulerConfig::default()
    };
    let sched = build_scheduler(&cfg, |_| Ok(PollVec::new())).unwrap();
    assert_eq!(sched.config().gc_interval_rounds, 2);

    let failed = build_scheduler(&cfg, |_| -> Result<PollVec, SchedulerError> {
        Err(SchedulerError::InvalidConfig("no readiness".into()))
    });
    assert!(failed.is_err());
}
