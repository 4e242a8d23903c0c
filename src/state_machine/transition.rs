//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! result and performs no I/O.

use super::{Effect, Event, ExchangeState, PendingExchange, SessionContext};
use crate::backend::AnswerRequest;
use crate::conversation::TurnDraft;
use crate::language::needs_local_translation;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ExchangeState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ExchangeState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Rejected events. None of these change state or reach the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Question is empty")]
    BlankQuestion,
    #[error("An answer is still pending, wait for it before asking again")]
    ExchangeInFlight,
    #[error("No exchange in flight")]
    NoExchangeInFlight,
}

pub fn transition(
    state: &ExchangeState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Busy + Submit -> Reject (not queued, does not cancel)
        (ExchangeState::Pending(_), Event::Submit { .. }) => Err(TransitionError::ExchangeInFlight),

        // Idle + Submit -> Pending
        (ExchangeState::Idle, Event::Submit { text, at }) => {
            let question = text.trim();
            if question.is_empty() {
                return Err(TransitionError::BlankQuestion);
            }

            let request = AnswerRequest {
                question: question.to_string(),
                k: context.source_count,
                translate_local: needs_local_translation(question),
            };

            Ok(TransitionResult::new(ExchangeState::Pending(PendingExchange {
                question: question.to_string(),
                started_at: at,
            }))
            .with_effect(Effect::append_user(question))
            .with_effect(Effect::RequestAnswer(request)))
        }

        // Pending + success -> Idle with the answer appended
        (ExchangeState::Pending(_), Event::ExchangeSucceeded { response }) => {
            Ok(TransitionResult::new(ExchangeState::Idle)
                .with_effect(Effect::AppendTurn(response.into_turn())))
        }

        // Pending + failure -> Idle with apology and notice
        (ExchangeState::Pending(_), Event::ExchangeFailed { .. }) => {
            Ok(TransitionResult::new(ExchangeState::Idle)
                .with_effect(Effect::AppendTurn(TurnDraft::apology(
                    context.apology_text.clone(),
                )))
                .with_effect(Effect::notify(
                    context.failure_notice.clone(),
                    context.notice_duration,
                )))
        }

        (
            ExchangeState::Idle,
            Event::ExchangeSucceeded { .. } | Event::ExchangeFailed { .. },
        ) => Err(TransitionError::NoExchangeInFlight),
    }
}
