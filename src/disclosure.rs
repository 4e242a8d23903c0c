//! Open/closed state of each answer's evidence panel

use crate::conversation::TurnId;
use std::collections::HashSet;

/// Set of turns whose evidence is currently expanded. Absent means closed.
#[derive(Debug, Default)]
pub struct DisclosureMap {
    open: HashSet<TurnId>,
}

impl DisclosureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one turn and return its new state
    pub fn toggle(&mut self, turn: TurnId) -> bool {
        if self.open.remove(&turn) {
            false
        } else {
            self.open.insert(turn);
            true
        }
    }

    pub fn is_open(&self, turn: TurnId) -> bool {
        self.open.contains(&turn)
    }
}
