//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::transition::*;
use super::*;
use crate::backend::{AnswerResponse, BackendError, BackendErrorKind, Source};
use crate::conversation::{Author, TurnDraft};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> SessionContext {
    SessionContext::new("test-session")
}

/// Minimal stand-in for the message log: just the authors, in order
#[derive(Default)]
struct LogModel {
    authors: Vec<Author>,
}

impl LogModel {
    fn count(&self, author: Author) -> usize {
        self.authors.iter().filter(|a| **a == author).count()
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_error_kind() -> impl Strategy<Value = BackendErrorKind> {
    prop_oneof![
        Just(BackendErrorKind::Network),
        Just(BackendErrorKind::ServerError),
        Just(BackendErrorKind::ClientError),
        Just(BackendErrorKind::InvalidResponse),
    ]
}

fn arb_source() -> impl Strategy<Value = Source> {
    ("[a-zA-Z ]{1,30}", proptest::option::of("[a-z]{3,8}")).prop_map(|(text, crop)| {
        let source = Source::new(text);
        match crop {
            Some(crop) => source.with_metadata("crop", crop),
            None => source,
        }
    })
}

fn arb_response() -> impl Strategy<Value = AnswerResponse> {
    (
        "[a-zA-Z .]{0,40}",
        proptest::option::of(proptest::collection::vec(arb_source(), 0..4)),
        proptest::option::of("[a-z-]{3,12}"),
        proptest::option::of("[a-f0-9]{8}"),
    )
        .prop_map(|(answer, sources, backend, question_id)| AnswerResponse {
            answer,
            sources,
            backend,
            question_id,
        })
}

fn arb_submit_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-zA-Z ?]{1,30}".prop_map(Event::submit),
        "[ \t\n]{0,5}".prop_map(Event::submit),
        "[ሀ-ፚ ]{1,10}".prop_map(Event::submit),
    ]
}

fn arb_success_event() -> impl Strategy<Value = Event> {
    arb_response().prop_map(|response| Event::ExchangeSucceeded { response })
}

fn arb_failure_event() -> impl Strategy<Value = Event> {
    ("[a-zA-Z ]{1,30}", arb_error_kind()).prop_map(|(message, kind)| Event::ExchangeFailed {
        error: BackendError::new(kind, message),
    })
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![arb_submit_event(), arb_success_event(), arb_failure_event()]
}

fn arb_pending_state() -> impl Strategy<Value = ExchangeState> {
    "[a-zA-Z ]{1,30}".prop_map(|question| {
        ExchangeState::Pending(PendingExchange {
            question,
            started_at: chrono::Utc::now(),
        })
    })
}

// ============================================================================
// Validity Checkers
// ============================================================================

fn effects_are_valid(old_state: &ExchangeState, effects: &[Effect], new_state: &ExchangeState) -> bool {
    let requests = effects
        .iter()
        .filter(|e| matches!(e, Effect::RequestAnswer(_)))
        .count();
    let appends = effects
        .iter()
        .filter(|e| matches!(e, Effect::AppendTurn(_)))
        .count();

    match (old_state, new_state) {
        // Entering Pending: exactly one user turn, then exactly one request
        (ExchangeState::Idle, ExchangeState::Pending(_)) => {
            requests == 1
                && appends == 1
                && matches!(
                    effects.first(),
                    Some(Effect::AppendTurn(TurnDraft {
                        author: Author::User,
                        ..
                    }))
                )
        }
        // Leaving Pending: exactly one assistant turn, no request
        (ExchangeState::Pending(_), ExchangeState::Idle) => {
            requests == 0
                && appends == 1
                && matches!(
                    effects.first(),
                    Some(Effect::AppendTurn(TurnDraft {
                        author: Author::Assistant,
                        ..
                    }))
                )
        }
        _ => false,
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: every accepted transition emits the right effects
    #[test]
    fn prop_transitions_emit_valid_effects(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = ExchangeState::Idle;
        let ctx = test_context();

        for event in events {
            if let Ok(result) = transition(&state, &ctx, event) {
                prop_assert!(
                    effects_are_valid(&state, &result.effects, &result.new_state),
                    "Invalid effects {:?} for {:?} -> {:?}",
                    result.effects,
                    state,
                    result.new_state
                );
                state = result.new_state;
            }
        }
    }

    // Invariant 2: the log model stays balanced - busy iff one unanswered question
    #[test]
    fn prop_one_answer_per_question(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut state = ExchangeState::Idle;
        let mut log = LogModel::default();
        let ctx = test_context();

        for event in events {
            if let Ok(result) = transition(&state, &ctx, event) {
                for effect in &result.effects {
                    if let Effect::AppendTurn(draft) = effect {
                        log.authors.push(draft.author);
                    }
                }
                state = result.new_state;
            }

            let users = log.count(Author::User);
            let assistants = log.count(Author::Assistant);
            if state.is_busy() {
                prop_assert_eq!(users, assistants + 1);
                prop_assert_eq!(log.authors.last(), Some(&Author::User));
            } else {
                prop_assert_eq!(users, assistants);
            }
        }
    }

    // Invariant 3: busy rejects every submission
    #[test]
    fn prop_pending_rejects_submit(state in arb_pending_state(), event in arb_submit_event()) {
        let result = transition(&state, &test_context(), event);
        prop_assert!(matches!(result, Err(TransitionError::ExchangeInFlight)));
    }

    // Invariant 4: idle accepts any non-blank question and stores it trimmed
    #[test]
    fn prop_idle_accepts_non_blank(text in "[ ]{0,3}[a-zA-Z?]{1,20}[ ]{0,3}") {
        let result = transition(&ExchangeState::Idle, &test_context(), Event::submit(text.clone()));
        prop_assert!(result.is_ok(), "Idle should accept: {:?}", result);
        let result = result.unwrap();
        prop_assert_eq!(
            result.new_state.pending().map(|p| p.question.clone()),
            Some(text.trim().to_string())
        );
        prop_assert_eq!(&result.effects[0], &Effect::append_user(text.trim()));
    }

    // Invariant 5: failures never carry evidence or an exchange id
    #[test]
    fn prop_failure_turn_is_bare(state in arb_pending_state(), event in arb_failure_event()) {
        let result = transition(&state, &test_context(), event).unwrap();
        let Some(Effect::AppendTurn(draft)) = result.effects.first() else {
            return Err(TestCaseError::fail("failure must append a turn"));
        };
        prop_assert!(draft.evidence.is_none());
        prop_assert!(draft.exchange_id.is_none());
        prop_assert!(draft.backend_label.is_none());
        let notified = result.effects.iter().any(|e| matches!(e, Effect::Notify { .. }));
        prop_assert!(notified);
    }

    // Invariant 6: success never raises a notice
    #[test]
    fn prop_success_is_quiet(state in arb_pending_state(), event in arb_success_event()) {
        let result = transition(&state, &test_context(), event).unwrap();
        let notified = result.effects.iter().any(|e| matches!(e, Effect::Notify { .. }));
        prop_assert!(!notified);
    }
}
