//! Events that drive the exchange lifecycle

use crate::backend::{AnswerResponse, BackendError};
use chrono::{DateTime, Utc};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Submit {
        text: String,
        at: DateTime<Utc>,
    },

    // Backend events
    ExchangeSucceeded {
        response: AnswerResponse,
    },
    ExchangeFailed {
        error: BackendError,
    },
}

impl Event {
    pub fn submit(text: impl Into<String>) -> Self {
        Event::Submit {
            text: text.into(),
            at: Utc::now(),
        }
    }

    pub fn from_outcome(outcome: Result<AnswerResponse, BackendError>) -> Self {
        match outcome {
            Ok(response) => Event::ExchangeSucceeded { response },
            Err(error) => Event::ExchangeFailed { error },
        }
    }
}
