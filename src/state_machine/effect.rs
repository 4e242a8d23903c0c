//! Effects produced by state transitions

use crate::backend::AnswerRequest;
use crate::conversation::TurnDraft;
use std::time::Duration;

/// Effects to be executed after state transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a turn to the message log
    AppendTurn(TurnDraft),

    /// Send the question to the answer backend
    RequestAnswer(AnswerRequest),

    /// Raise a transient notice
    Notify { message: String, duration: Duration },
}

impl Effect {
    pub fn append_user(text: impl Into<String>) -> Self {
        Effect::AppendTurn(TurnDraft::user(text))
    }

    pub fn append_apology(text: impl Into<String>) -> Self {
        Effect::AppendTurn(TurnDraft::apology(text))
    }

    pub fn notify(message: impl Into<String>, duration: Duration) -> Self {
        Effect::Notify {
            message: message.into(),
            duration,
        }
    }
}
