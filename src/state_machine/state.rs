//! Exchange state and session context types

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Text of the synthetic turn appended when an exchange fails
pub const DEFAULT_APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Notice raised alongside the apology turn
pub const DEFAULT_FAILURE_NOTICE: &str =
    "Failed to get response. Please check your connection and try again.";

/// Evidence passages requested per question
pub const DEFAULT_SOURCE_COUNT: u8 = 3;

pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(3000);

/// The question currently awaiting an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingExchange {
    pub question: String,
    pub started_at: DateTime<Utc>,
}

/// Lifecycle of the single in-flight exchange
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExchangeState {
    /// Ready for a question
    #[default]
    Idle,

    /// Question sent, answer outstanding
    Pending(PendingExchange),
}

impl ExchangeState {
    pub fn is_busy(&self) -> bool {
        matches!(self, ExchangeState::Pending(_))
    }

    pub fn pending(&self) -> Option<&PendingExchange> {
        match self {
            ExchangeState::Pending(pending) => Some(pending),
            ExchangeState::Idle => None,
        }
    }
}

/// Immutable per-session configuration consulted by transitions
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    /// `k` sent with every question
    pub source_count: u8,
    pub apology_text: String,
    pub failure_notice: String,
    pub notice_duration: Duration,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            source_count: DEFAULT_SOURCE_COUNT,
            apology_text: DEFAULT_APOLOGY.to_string(),
            failure_notice: DEFAULT_FAILURE_NOTICE.to_string(),
            notice_duration: DEFAULT_NOTICE_DURATION,
        }
    }

    #[must_use]
    pub fn with_source_count(mut self, k: u8) -> Self {
        self.source_count = k;
        self
    }

    #[must_use]
    pub fn with_notice_duration(mut self, duration: Duration) -> Self {
        self.notice_duration = duration;
        self
    }
}
