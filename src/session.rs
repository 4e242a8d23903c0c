//! Conversation session
//!
//! Owns the message log, the exchange state, the per-turn disclosure and
//! feedback maps and the notification slot, and executes the effects the
//! state machine produces. One session is one conversation.

#[cfg(test)]
pub mod testing;

use crate::backend::{
    AnswerRequest, AnswerService, BackendError, FeedbackRequest, FeedbackService, HttpBackend,
    LoggingService,
};
use crate::conversation::{ConversationTurn, MessageLog, TurnId};
use crate::disclosure::DisclosureMap;
use crate::feedback::{AlreadyRated, FeedbackLedger, FeedbackState, Rating};
use crate::notification::{Notification, NotificationChannel};
use crate::state_machine::{
    transition, Effect, Event, ExchangeState, PendingExchange, SessionContext, TransitionError,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::{broadcast, watch};

/// Type alias for a session talking to the real HTTP backend
pub type ProductionSession =
    ConversationSession<LoggingService<HttpBackend>, LoggingService<HttpBackend>>;

/// Changes published to the rendering layer
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    TurnAppended(ConversationTurn),
    BusyChanged(bool),
    DisclosureChanged { turn: TurnId, open: bool },
    FeedbackRecorded { turn: TurnId, rating: Rating },
}

/// A per-turn action that did not apply. State is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no turn {0}")]
    UnknownTurn(TurnId),
    #[error("turn {0} is not an answer")]
    NotAnAnswer(TurnId),
    #[error("turn {0} has no sources")]
    NoEvidence(TurnId),
    #[error("turn {0} cannot be rated")]
    NoExchange(TurnId),
    #[error("turn {0} is already rated")]
    AlreadyRated(TurnId),
}

impl From<AlreadyRated> for Rejection {
    fn from(err: AlreadyRated) -> Self {
        Rejection::AlreadyRated(err.0)
    }
}

#[derive(Debug, Default)]
struct SessionState {
    log: MessageLog,
    exchange: ExchangeState,
    disclosure: DisclosureMap,
    feedback: FeedbackLedger,
}

/// Output of applying one event
#[derive(Debug, Default)]
struct Applied {
    request: Option<AnswerRequest>,
    appended: Vec<TurnId>,
}

/// State and collaborators shared with in-flight exchanges
struct SessionCore<A> {
    context: SessionContext,
    /// Never held across an await
    state: Mutex<SessionState>,
    answers: A,
    notifications: NotificationChannel,
    updates: broadcast::Sender<SessionUpdate>,
}

impl<A: AnswerService> SessionCore<A> {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one event through the state machine and execute its effects.
    /// Turns are appended before the new exchange state is stored.
    fn apply(&self, state: &mut SessionState, event: Event) -> Result<Applied, TransitionError> {
        let result = transition(&state.exchange, &self.context, event)?;
        let mut applied = Applied::default();

        for effect in result.effects {
            match effect {
                Effect::AppendTurn(draft) => {
                    let turn = state.log.append(draft);
                    tracing::debug!(
                        session_id = %self.context.session_id,
                        turn_id = %turn.id(),
                        author = ?turn.author(),
                        "Turn appended"
                    );
                    applied.appended.push(turn.id());
                    let _ = self.updates.send(SessionUpdate::TurnAppended(turn.clone()));
                }
                Effect::RequestAnswer(request) => applied.request = Some(request),
                Effect::Notify { message, duration } => {
                    self.notifications.notify(message, duration);
                }
            }
        }

        let was_busy = state.exchange.is_busy();
        state.exchange = result.new_state;
        if was_busy != state.exchange.is_busy() {
            let _ = self
                .updates
                .send(SessionUpdate::BusyChanged(state.exchange.is_busy()));
        }

        Ok(applied)
    }
}

pub struct ConversationSession<A, F>
where
    A: AnswerService + 'static,
    F: FeedbackService + 'static,
{
    core: Arc<SessionCore<A>>,
    feedback: Arc<F>,
}

impl<A, F> ConversationSession<A, F>
where
    A: AnswerService + 'static,
    F: FeedbackService + 'static,
{
    pub fn new(context: SessionContext, answers: A, feedback: F) -> Self {
        let (updates, _) = broadcast::channel(128);
        tracing::info!(session_id = %context.session_id, "Starting conversation session");
        Self {
            core: Arc::new(SessionCore {
                context,
                state: Mutex::new(SessionState::default()),
                answers,
                notifications: NotificationChannel::new(),
                updates,
            }),
            feedback: Arc::new(feedback),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.core.lock()
    }

    pub fn context(&self) -> &SessionContext {
        &self.core.context
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Ask a question and wait for the exchange to resolve.
    ///
    /// The user turn is in the log before the request leaves. Returns the id
    /// of the assistant turn appended on resolution, which is an answer or,
    /// if the exchange failed, the apology.
    ///
    /// # Errors
    ///
    /// Blank text or a question already in flight is rejected without
    /// touching the log.
    pub async fn submit(&self, text: &str) -> Result<TurnId, TransitionError> {
        let request = {
            let mut state = self.lock();
            let applied = match self.core.apply(&mut state, Event::submit(text)) {
                Ok(applied) => applied,
                Err(e) => {
                    tracing::debug!(session_id = %self.core.context.session_id, reason = %e, "Submission ignored");
                    return Err(e);
                }
            };
            match applied.request {
                Some(request) => request,
                None => return Err(TransitionError::NoExchangeInFlight),
            }
        };

        tracing::info!(
            session_id = %self.core.context.session_id,
            translate_local = request.translate_local,
            "Question submitted"
        );
        // The exchange runs to resolution even if this future is dropped
        let core = Arc::clone(&self.core);
        let exchange = tokio::spawn(async move {
            let outcome = core.answers.ask(&request).await;
            let mut state = core.lock();
            core.apply(&mut state, Event::from_outcome(outcome))
        });

        let applied = match exchange.await {
            Ok(applied) => applied?,
            Err(e) => {
                tracing::error!(
                    session_id = %self.core.context.session_id,
                    error = %e,
                    "Exchange task failed"
                );
                let mut state = self.lock();
                let error = BackendError::network(format!("exchange task failed: {e}"));
                self.core.apply(&mut state, Event::ExchangeFailed { error })?
            }
        };
        applied
            .appended
            .last()
            .copied()
            .ok_or(TransitionError::NoExchangeInFlight)
    }

    /// Flip the evidence panel of one answer. Returns the new open state.
    ///
    /// # Errors
    ///
    /// Only existing assistant turns with evidence have a panel.
    pub fn toggle_evidence(&self, turn_id: TurnId) -> Result<bool, Rejection> {
        let mut state = self.lock();
        let turn = state.log.get(turn_id).ok_or(Rejection::UnknownTurn(turn_id))?;
        if !turn.is_assistant() {
            return Err(Rejection::NotAnAnswer(turn_id));
        }
        if turn.evidence().is_none() {
            return Err(Rejection::NoEvidence(turn_id));
        }

        let open = state.disclosure.toggle(turn_id);
        let _ = self
            .core.updates
            .send(SessionUpdate::DisclosureChanged { turn: turn_id, open });
        Ok(open)
    }

    /// Rate an answer. The rating commits immediately; delivery to the
    /// feedback backend happens in the background and its outcome is only
    /// logged.
    ///
    /// # Errors
    ///
    /// The turn must exist, carry an exchange id, and not be rated yet.
    pub fn rate(
        &self,
        turn_id: TurnId,
        rating: Rating,
        comment: Option<String>,
    ) -> Result<(), Rejection> {
        let mut state = self.lock();
        let turn = state.log.get(turn_id).ok_or(Rejection::UnknownTurn(turn_id))?;
        let question_id = turn
            .exchange_id()
            .ok_or(Rejection::NoExchange(turn_id))?
            .to_string();

        state.feedback.record(turn_id, rating)?;
        drop(state);

        tracing::info!(
            session_id = %self.core.context.session_id,
            turn_id = %turn_id,
            question_id = %question_id,
            rating = rating.get(),
            "Answer rated"
        );
        let _ = self
            .core.updates
            .send(SessionUpdate::FeedbackRecorded { turn: turn_id, rating });

        self.send_feedback(FeedbackRequest {
            question_id,
            rating,
            comment: comment.filter(|c| !c.trim().is_empty()),
        });
        Ok(())
    }

    fn send_feedback(&self, request: FeedbackRequest) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(question_id = %request.question_id, "No async runtime, feedback dropped");
            return;
        };

        let feedback = Arc::clone(&self.feedback);
        runtime.spawn(async move {
            if let Err(e) = feedback.submit(&request).await {
                tracing::warn!(
                    question_id = %request.question_id,
                    error = %e,
                    "Feedback not delivered"
                );
            }
        });
    }

    pub fn dismiss_notification(&self) {
        self.core.notifications.dismiss();
    }

    // ========================================================================
    // Read-only views for rendering
    // ========================================================================

    pub fn snapshot(&self) -> Vec<ConversationTurn> {
        self.lock().log.snapshot()
    }

    pub fn turn(&self, turn_id: TurnId) -> Option<ConversationTurn> {
        self.lock().log.get(turn_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().log.is_empty()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().exchange.is_busy()
    }

    pub fn pending(&self) -> Option<PendingExchange> {
        self.lock().exchange.pending().cloned()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.core.notifications.current()
    }

    pub fn is_disclosed(&self, turn_id: TurnId) -> bool {
        self.lock().disclosure.is_open(turn_id)
    }

    pub fn feedback(&self, turn_id: TurnId) -> FeedbackState {
        self.lock().feedback.state(turn_id)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.core.updates.subscribe()
    }

    pub fn subscribe_notifications(&self) -> watch::Receiver<Option<Notification>> {
        self.core.notifications.subscribe()
    }
}

impl<A, F> Drop for ConversationSession<A, F>
where
    A: AnswerService + 'static,
    F: FeedbackService + 'static,
{
    fn drop(&mut self) {
        // stop any dismissal timer outliving the session
        self.core.notifications.dismiss();
        tracing::info!(session_id = %self.core.context.session_id, "Conversation session closed");
    }
}
