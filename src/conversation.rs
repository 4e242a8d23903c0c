//! Conversation turns and the append-only message log

mod log;
mod turn;

pub use log::MessageLog;
pub use turn::{Author, ConversationTurn, EvidenceItem, TurnDraft, TurnId};
