//! Scheduler configuration structures.

use std::env;

use serde::{Deserialize, Serialize};

use crate::core::ConcurrencyLimit;

/// Environment key for [`SchedulerConfig::max_concurrency`].
pub const ENV_MAX_CONCURRENCY: &str = "BOUNDED_BATCH_MAX_CONCURRENCY";
/// Environment key for [`SchedulerConfig::name`].
pub const ENV_NAME: &str = "BOUNDED_BATCH_NAME";
/// Environment key for [`SchedulerConfig::log_settlements`].
pub const ENV_LOG_SETTLEMENTS: &str = "BOUNDED_BATCH_LOG_SETTLEMENTS";

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum tasks in flight. Signed so that negative input is reported
    /// as invalid rather than failing to parse.
    pub max_concurrency: i64,
    /// Name used in log spans and audit events.
    pub name: String,
    /// Log failed settlements at `warn`.
    pub log_settlements: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: i64::from(ConcurrencyLimit::available_parallelism()),
            name: "default".into(),
            log_settlements: true,
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency < 1 {
            return Err(format!(
                "max_concurrency must be at least 1, got {}",
                self.max_concurrency
            ));
        }
        if self.name.trim().is_empty() {
            return Err("name must not be empty".into());
        }
        Ok(())
    }

    /// The validated concurrency limit.
    pub fn limit(&self) -> Result<ConcurrencyLimit, String> {
        ConcurrencyLimit::try_from(self.max_concurrency).map_err(|e| e.to_string())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from the process environment, loading `.env`
    /// first if one exists. Unset keys keep their defaults.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(raw) = get(ENV_MAX_CONCURRENCY) {
            cfg.max_concurrency = raw
                .trim()
                .parse()
                .map_err(|e| format!("{ENV_MAX_CONCURRENCY}={raw}: {e}"))?;
        }
        if let Some(name) = get(ENV_NAME) {
            cfg.name = name;
        }
        if let Some(raw) = get(ENV_LOG_SETTLEMENTS) {
            cfg.log_settlements = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => return Err(format!("{ENV_LOG_SETTLEMENTS}={other}: expected a boolean")),
            };
        }

        cfg.validate()?;
        Ok(cfg)
    }
}
