//! Append-only message log

use super::turn::{ConversationTurn, TurnDraft, TurnId};
use chrono::Utc;

/// Ordered, append-only sequence of turns.
///
/// There is no removal and no mutable access to stored turns; the only way to
/// revise the conversation is to append.
#[derive(Debug, Default)]
pub struct MessageLog {
    turns: Vec<ConversationTurn>,
    next_id: u64,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn, assigning its id and creation time.
    pub fn append(&mut self, draft: TurnDraft) -> &ConversationTurn {
        self.next_id += 1;
        let turn = ConversationTurn::from_draft(TurnId::new(self.next_id), Utc::now(), draft);
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    /// Full ordered copy for rendering
    pub fn snapshot(&self) -> Vec<ConversationTurn> {
        self.turns.clone()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn get(&self, id: TurnId) -> Option<&ConversationTurn> {
        // ids are dense and start at 1
        let index = usize::try_from(id.get()).ok()?.checked_sub(1)?;
        self.turns.get(index).filter(|t| t.id() == id)
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
