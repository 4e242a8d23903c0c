//! Agricultural assistant chat client
//!
//! Conversation core for a retrieval-augmented question-answering service:
//! an append-only message log, a request lifecycle state machine, transient
//! notifications, and per-answer evidence disclosure and feedback.

pub mod backend;
pub mod command;
pub mod config;
pub mod conversation;
pub mod disclosure;
pub mod feedback;
pub mod language;
pub mod notification;
pub mod render;
pub mod session;
pub mod state_machine;

pub use backend::{BackendError, BackendErrorKind, HttpBackend, LoggingService};
pub use config::{ClientConfig, ConfigError};
pub use conversation::{Author, ConversationTurn, MessageLog, TurnId};
pub use feedback::{FeedbackState, Rating};
pub use notification::{Notification, NotificationChannel};
pub use session::{ConversationSession, ProductionSession, Rejection, SessionUpdate};
pub use state_machine::{ExchangeState, SessionContext, TransitionError};
