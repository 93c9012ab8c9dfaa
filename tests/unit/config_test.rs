//! Tests for configuration validation and loading

use std::collections::HashMap;
use std::io::Write;

use prometheus_stepwise::config::SchedulerConfig;

#[test]
fn test_default_config_is_valid() {
    let cfg = SchedulerConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.gc_interval_rounds, 1);
    assert_eq!(cfg.max_nesting_depth, 64);
    assert_eq!(cfg.resource_retry_ms, 1000);
    assert!(!cfg.disk_full_fatal);
}

#[test]
fn test_zero_values_rejected() {
    let cfg = SchedulerConfig {
        gc_interval_rounds: 0,
        ..SchedulerConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = SchedulerConfig {
        max_nesting_depth: 0,
        ..SchedulerConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_json_partial_uses_defaults() {
    let cfg = SchedulerConfig::from_json_str(r#"{"gc_interval_rounds": 8}"#).unwrap();
    assert_eq!(cfg.gc_interval_rounds, 8);
    assert_eq!(cfg.max_nesting_depth, 64);

    assert!(SchedulerConfig::from_json_str(r#"{"gc_interval_rounds": 0}"#).is_err());
    assert!(SchedulerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_from_file() {
    let path = std::env::temp_dir().join(format!("stepwise-config-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, r#"{{"disk_full_fatal": true, "resource_retry_ms": 250}}"#).unwrap();
    drop(file);

    let cfg = SchedulerConfig::from_file(&path).unwrap();
    assert!(cfg.disk_full_fatal);
    assert_eq!(cfg.resource_retry_ms, 250);
    std::fs::remove_file(&path).unwrap();

    let err = SchedulerConfig::from_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("stepwise-config"));
}

#[test]
fn test_from_lookup_overrides() {
    let vars: HashMap<&str, &str> = [
        ("STEPWISE_GC_INTERVAL_ROUNDS", "5"),
        ("STEPWISE_DISK_FULL_FATAL", "true"),
    ]
    .into_iter()
    .collect();
    let cfg = SchedulerConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string())).unwrap();
    assert_eq!(cfg.gc_interval_rounds, 5);
    assert!(cfg.disk_full_fatal);
    assert_eq!(cfg.max_nesting_depth, 64);
}

#[test]
fn test_from_lookup_rejects_garbage() {
    let result = SchedulerConfig::from_lookup(|key| {
        (key == "STEPWISE_MAX_NESTING_DEPTH").then(|| "deep".to_string())
    });
    assert!(result.is_err());
}
