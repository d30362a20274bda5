//! Tests for error types

use bounded_batch::core::{ConcurrencyLimit, SchedulerError};

#[test]
fn test_invalid_limit_error() {
    let err = SchedulerError::InvalidLimit(-4);
    assert_eq!(
        format!("{err}"),
        "invalid concurrency limit: -4 (must be at least 1)"
    );
}

#[test]
fn test_config_error() {
    let err = SchedulerError::Config("name must not be empty".to_string());
    assert_eq!(format!("{err}"), "config error: name must not be empty");
}

#[test]
fn test_limit_conversion_reports_original_value() {
    let err = ConcurrencyLimit::try_from(-9_i64).unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidLimit(-9)));

    let err = ConcurrencyLimit::try_from(0_usize).unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidLimit(0)));
}
