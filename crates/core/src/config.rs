use std::time::Duration;

use crate::error::CoreError;
use crate::retry::{RetryPolicy, DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS};

/// Default number of revision snapshots loaded concurrently per timeline.
pub const DEFAULT_MAX_CONCURRENT_LOADS: usize = 8;

/// Runtime knobs for the timeline builder and revision store.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Upper bound on in-flight snapshot loads while building a timeline.
    pub max_concurrent_loads: usize,
    /// Retry policy for revision store reads that fail transiently.
    pub load_retry: RetryPolicy,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_concurrent_loads: DEFAULT_MAX_CONCURRENT_LOADS,
            load_retry: RetryPolicy::default(),
        }
    }
}

impl HistoryConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                              | Default |
    /// |--------------------------------------|---------|
    /// | `FIELD_HISTORY_MAX_CONCURRENT_LOADS` | `8`     |
    /// | `FIELD_HISTORY_RETRY_MAX_ATTEMPTS`   | `3`     |
    /// | `FIELD_HISTORY_RETRY_BACKOFF_MS`     | `250`   |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_concurrent_loads: usize = parse_var(
            &lookup,
            "FIELD_HISTORY_MAX_CONCURRENT_LOADS",
            DEFAULT_MAX_CONCURRENT_LOADS,
        )?;
        if max_concurrent_loads == 0 {
            return Err(CoreError::Config(
                "FIELD_HISTORY_MAX_CONCURRENT_LOADS must be at least 1".into(),
            ));
        }

        let max_attempts: u32 =
            parse_var(&lookup, "FIELD_HISTORY_RETRY_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            return Err(CoreError::Config(
                "FIELD_HISTORY_RETRY_MAX_ATTEMPTS must be at least 1".into(),
            ));
        }

        let backoff_ms: u64 = parse_var(
            &lookup,
            "FIELD_HISTORY_RETRY_BACKOFF_MS",
            DEFAULT_BACKOFF.as_millis() as u64,
        )?;

        Ok(Self {
            max_concurrent_loads,
            load_retry: RetryPolicy::new(max_attempts, Duration::from_millis(backoff_ms)),
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T, CoreError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CoreError::Config(format!("{key} must be a non-negative integer, got '{raw}'"))),
    }
}
