// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the registry client.
//!
//! Values can be embedded in a larger serde config or loaded from the
//! environment with [`Config::from_env`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Registry endpoint configuration
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Outbound rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Where and how to reach the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// API base URL, without the document path (default: https://ismp.crpt.ru/api/v3)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds (default: 30000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Outbound request budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window (default: 10)
    #[serde(default = "default_capacity")]
    pub capacity: u32,

    /// Unit of the window (default: second)
    #[serde(default)]
    pub per: TimeUnit,

    /// Number of `per` units in one window (default: 1)
    #[serde(default = "default_units")]
    pub units: u32,

    /// What to do when the budget is exhausted (default: fail_fast)
    #[serde(default)]
    pub mode: AcquireMode,

    /// Upper bound on a blocking wait in milliseconds (default: unbounded)
    #[serde(default)]
    pub acquire_timeout_ms: Option<u64>,
}

/// Window unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Millisecond,
    #[default]
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    /// Length of one unit.
    pub fn duration(self) -> Duration {
        match self {
            Self::Millisecond => Duration::from_millis(1),
            Self::Second => Duration::from_secs(1),
            Self::Minute => Duration::from_secs(60),
            Self::Hour => Duration::from_secs(3600),
            Self::Day => Duration::from_secs(86_400),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ms" | "millisecond" | "milliseconds" => Ok(Self::Millisecond),
            "s" | "sec" | "second" | "seconds" => Ok(Self::Second),
            "m" | "min" | "minute" | "minutes" => Ok(Self::Minute),
            "h" | "hour" | "hours" => Ok(Self::Hour),
            "d" | "day" | "days" => Ok(Self::Day),
            other => Err(Error::config(format!(
                "invalid time unit `{other}`; expected one of: millisecond|second|minute|hour|day"
            ))),
        }
    }
}

/// Behaviour of the client when no permit is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquireMode {
    /// Return `RateLimited` immediately
    #[default]
    FailFast,
    /// Wait for the next window, bounded by `acquire_timeout_ms` if set
    Blocking,
}

impl FromStr for AcquireMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail_fast" | "fail-fast" | "failfast" => Ok(Self::FailFast),
            "blocking" | "block" | "wait" => Ok(Self::Blocking),
            other => Err(Error::config(format!(
                "invalid acquire mode `{other}`; expected fail_fast|blocking"
            ))),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://ismp.crpt.ru/api/v3".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_capacity() -> u32 {
    10
}

fn default_units() -> u32 {
    1
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            per: TimeUnit::default(),
            units: default_units(),
            mode: AcquireMode::default(),
            acquire_timeout_ms: None,
        }
    }
}

impl RegistryConfig {
    /// Get the request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        self.per.duration() * self.units
    }

    /// Get the blocking wait bound, if any
    pub fn acquire_timeout(&self) -> Option<Duration> {
        self.acquire_timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::config("rate limit capacity must be positive"));
        }
        if self.units == 0 {
            return Err(Error::config("rate limit window must be positive"));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `REGISTRY_BASE_URL`: API base URL
    /// - `REGISTRY_TIMEOUT_MS`: request timeout
    /// - `RATE_LIMIT_CAPACITY`: max requests per window
    /// - `RATE_LIMIT_PER`: window unit (second, minute, ...)
    /// - `RATE_LIMIT_UNITS`: window length in units
    /// - `RATE_LIMIT_MODE`: fail_fast or blocking
    /// - `RATE_LIMIT_ACQUIRE_TIMEOUT_MS`: bound on blocking waits
    ///
    /// Unset variables fall back to defaults; set but malformed ones are errors.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("REGISTRY_BASE_URL") {
            config.registry.base_url = url;
        }
        if let Some(ms) = parse_var(&lookup, "REGISTRY_TIMEOUT_MS")? {
            config.registry.timeout_ms = ms;
        }
        if let Some(capacity) = parse_var(&lookup, "RATE_LIMIT_CAPACITY")? {
            config.rate_limit.capacity = capacity;
        }
        if let Some(per) = parse_var(&lookup, "RATE_LIMIT_PER")? {
            config.rate_limit.per = per;
        }
        if let Some(units) = parse_var(&lookup, "RATE_LIMIT_UNITS")? {
            config.rate_limit.units = units;
        }
        if let Some(mode) = parse_var(&lookup, "RATE_LIMIT_MODE")? {
            config.rate_limit.mode = mode;
        }
        if let Some(ms) = parse_var(&lookup, "RATE_LIMIT_ACQUIRE_TIMEOUT_MS")? {
            config.rate_limit.acquire_timeout_ms = Some(ms);
        }

        config.rate_limit.validate()?;
        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::config(format!("{key}={raw}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.registry.base_url, "https://ismp.crpt.ru/api/v3");
        assert_eq!(config.rate_limit.window_duration(), Duration::from_secs(1));
        assert_eq!(config.rate_limit.mode, AcquireMode::FailFast);
        assert!(config.rate_limit.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = Config::from_lookup(env(&[
            ("RATE_LIMIT_CAPACITY", "5"),
            ("RATE_LIMIT_PER", "minute"),
            ("RATE_LIMIT_UNITS", "2"),
            ("RATE_LIMIT_MODE", "blocking"),
            ("RATE_LIMIT_ACQUIRE_TIMEOUT_MS", "1500"),
        ]))
        .unwrap();

        assert_eq!(config.rate_limit.capacity, 5);
        assert_eq!(config.rate_limit.window_duration(), Duration::from_secs(120));
        assert_eq!(config.rate_limit.mode, AcquireMode::Blocking);
        assert_eq!(
            config.rate_limit.acquire_timeout(),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_negative_capacity_rejected() {
        let err = Config::from_lookup(env(&[("RATE_LIMIT_CAPACITY", "-1")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = Config::from_lookup(env(&[("RATE_LIMIT_CAPACITY", "0")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: Config = serde_json::from_str(
            r#"{"rate_limit": {"capacity": 3, "per": "hour", "mode": "blocking"}}"#,
        )
        .unwrap();
        assert_eq!(config.rate_limit.capacity, 3);
        assert_eq!(config.rate_limit.per, TimeUnit::Hour);
        assert_eq!(config.rate_limit.units, 1);
        assert_eq!(config.registry.timeout_ms, 30_000);
    }
}
