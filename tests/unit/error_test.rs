//! Tests for error types

use std::io;

use prometheus_stepwise::core::SchedulerError;

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("gc_interval_rounds must be greater than 0".to_string());
    assert_eq!(
        format!("{err}"),
        "invalid configuration: gc_interval_rounds must be greater than 0"
    );
}

#[test]
fn test_readiness_error_from_io() {
    let err: SchedulerError = io::Error::from_raw_os_error(libc::EBADF).into();
    assert!(matches!(err, SchedulerError::Readiness(_)));
    assert!(format!("{err}").starts_with("readiness wait failed: "));
}

#[test]
fn test_lifecycle_errors() {
    assert_eq!(
        format!("{}", SchedulerError::AlreadyInitialized),
        "scheduler already initialized"
    );
    assert_eq!(
        format!("{}", SchedulerError::NotInitialized),
        "scheduler not initialized"
    );
}

#[test]
fn test_errors_convert_to_anyhow() {
    let result: prometheus_stepwise::core::AppResult<()> = Err(SchedulerError::NotInitialized.into());
    let err = result.unwrap_err();
    assert!(err.downcast_ref::<SchedulerError>().is_some());
}
