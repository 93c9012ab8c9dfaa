//! Scheduler configuration structures.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;

const ENV_GC_INTERVAL_ROUNDS: &str = "STEPWISE_GC_INTERVAL_ROUNDS";
const ENV_MAX_NESTING_DEPTH: &str = "STEPWISE_MAX_NESTING_DEPTH";
const ENV_RESOURCE_RETRY_MS: &str = "STEPWISE_RESOURCE_RETRY_MS";
const ENV_DISK_FULL_FATAL: &str = "STEPWISE_DISK_FULL_FATAL";

/// Scheduler tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Run a garbage-collection pass every this many rounds.
    pub gc_interval_rounds: u32,
    /// Maximum depth of nested progress steps.
    pub max_nesting_depth: usize,
    /// Back-off before retrying after resource exhaustion (`EMFILE`, `ENOBUFS`, ...).
    pub resource_retry_ms: u64,
    /// Treat `ENOSPC`/`EDQUOT` as hard failures instead of retrying.
    pub disk_full_fatal: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            gc_interval_rounds: 1,
            max_nesting_depth: 64,
            resource_retry_ms: 1000,
            disk_full_fatal: false,
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.gc_interval_rounds == 0 {
            return Err("gc_interval_rounds must be greater than 0".into());
        }
        if self.max_nesting_depth == 0 {
            return Err("max_nesting_depth must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, parsed, or validated.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading scheduler config {}", path.display()))?;
        Self::from_json_str(&raw)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("loading scheduler config {}", path.display()))
    }

    /// Defaults overridden by `STEPWISE_*` environment variables, after loading
    /// a `.env` file if one is present.
    ///
    /// # Errors
    ///
    /// Returns a message naming the variable that failed to parse, or the
    /// validation failure.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by values from `lookup`, keyed like [`Self::from_env`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut cfg = Self::default();
        if let Some(v) = lookup(ENV_GC_INTERVAL_ROUNDS) {
            cfg.gc_interval_rounds = parse_var(ENV_GC_INTERVAL_ROUNDS, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_NESTING_DEPTH) {
            cfg.max_nesting_depth = parse_var(ENV_MAX_NESTING_DEPTH, &v)?;
        }
        if let Some(v) = lookup(ENV_RESOURCE_RETRY_MS) {
            cfg.resource_retry_ms = parse_var(ENV_RESOURCE_RETRY_MS, &v)?;
        }
        if let Some(v) = lookup(ENV_DISK_FULL_FATAL) {
            cfg.disk_full_fatal = parse_var(ENV_DISK_FULL_FATAL, &v)?;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| format!("{key}={value:?}: {e}"))
}
