//! Client configuration from the environment

use crate::state_machine::state::{DEFAULT_NOTICE_DURATION, DEFAULT_SOURCE_COUNT};
use crate::state_machine::SessionContext;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Range of `k` the answer backend accepts
pub const SOURCE_COUNT_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid number: {value:?}")]
    NotANumber { var: &'static str, value: String },
    #[error("AGRI_SOURCE_COUNT must be between 1 and 10, got {0}")]
    SourceCountOutOfRange(u8),
    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidUrl { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    /// Defaults to `api_url`
    pub feedback_url: String,
    pub source_count: u8,
    pub notice_duration: Duration,
    /// No timeout unless set
    pub http_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            feedback_url: DEFAULT_API_URL.to_string(),
            source_count: DEFAULT_SOURCE_COUNT,
            notice_duration: DEFAULT_NOTICE_DURATION,
            http_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let api_url = match var("AGRI_API_URL") {
            Some(url) => checked_url("AGRI_API_URL", url)?,
            None => defaults.api_url,
        };
        let feedback_url = match var("AGRI_FEEDBACK_URL") {
            Some(url) => checked_url("AGRI_FEEDBACK_URL", url)?,
            None => api_url.clone(),
        };

        let source_count = match var("AGRI_SOURCE_COUNT") {
            Some(value) => {
                let k: u8 = parse_number("AGRI_SOURCE_COUNT", &value)?;
                if !SOURCE_COUNT_RANGE.contains(&k) {
                    return Err(ConfigError::SourceCountOutOfRange(k));
                }
                k
            }
            None => defaults.source_count,
        };

        let notice_duration = match var("AGRI_NOTICE_MS") {
            Some(value) => Duration::from_millis(parse_number("AGRI_NOTICE_MS", &value)?),
            None => defaults.notice_duration,
        };

        let http_timeout = var("AGRI_HTTP_TIMEOUT_SECS")
            .map(|value| parse_number("AGRI_HTTP_TIMEOUT_SECS", &value).map(Duration::from_secs))
            .transpose()?;

        Ok(Self {
            api_url,
            feedback_url,
            source_count,
            notice_duration,
            http_timeout,
        })
    }

    /// Per-conversation constants for a new session
    pub fn session_context(&self, session_id: impl Into<String>) -> SessionContext {
        SessionContext::new(session_id)
            .with_source_count(self.source_count)
            .with_notice_duration(self.notice_duration)
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::NotANumber {
        var,
        value: value.to_string(),
    })
}

fn checked_url(var: &'static str, value: String) -> Result<String, ConfigError> {
    let value = value.trim().to_string();
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value)
    } else {
        Err(ConfigError::InvalidUrl { var, value })
    }
}
