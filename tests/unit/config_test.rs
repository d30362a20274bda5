//! Tests for configuration validation

use bounded_batch::config::SchedulerConfig;

fn config(max_concurrency: i64, name: &str) -> SchedulerConfig {
    SchedulerConfig {
        max_concurrency,
        name: name.to_string(),
        log_settlements: true,
    }
}

#[test]
fn test_scheduler_config_validation() {
    assert!(config(4, "ingest").validate().is_ok());
    assert_eq!(config(4, "ingest").limit().unwrap().get(), 4);
}

#[test]
fn test_scheduler_config_invalid_limits() {
    assert!(config(0, "ingest").validate().is_err());
    assert!(config(-1, "ingest").validate().is_err());
    assert!(config(-1, "ingest").limit().is_err());
}

#[test]
fn test_scheduler_config_empty_name() {
    assert!(config(2, "").validate().is_err());
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "max_concurrency": 3,
        "name": "mock_requests",
        "log_settlements": false
    }"#;

    let cfg = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.max_concurrency, 3);
    assert_eq!(cfg.name, "mock_requests");
    assert!(!cfg.log_settlements);
}

#[test]
fn test_scheduler_config_from_json_defaults() {
    let cfg = SchedulerConfig::from_json_str(r#"{ "max_concurrency": 2 }"#).unwrap();
    assert_eq!(cfg.name, "default");
    assert!(cfg.log_settlements);
}

#[test]
fn test_scheduler_config_from_json_rejects_negative() {
    let err = SchedulerConfig::from_json_str(r#"{ "max_concurrency": -5 }"#).unwrap_err();
    assert!(err.contains("-5"), "{err}");

    let err = SchedulerConfig::from_json_str("not json").unwrap_err();
    assert!(err.starts_with("parse error"), "{err}");
}
