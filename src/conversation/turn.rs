//! Conversation turn types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identity of a turn within one conversation.
///
/// Assigned by the [`MessageLog`](super::MessageLog) at append time, strictly
/// increasing in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TurnId(u64);

impl TurnId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    Assistant,
}

/// A grounding excerpt returned alongside an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub text: String,
    /// Open-ended attribute set (crop, topic, source, ...)
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl EvidenceItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Everything about a turn except the fields the log assigns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnDraft {
    pub author: Author,
    pub text: String,
    pub evidence: Option<Vec<EvidenceItem>>,
    pub backend_label: Option<String>,
    pub exchange_id: Option<String>,
}

impl TurnDraft {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            text: text.into(),
            evidence: None,
            backend_label: None,
            exchange_id: None,
        }
    }

    /// An assistant answer. An empty evidence list is normalised to `None`.
    pub fn answer(
        text: impl Into<String>,
        evidence: Vec<EvidenceItem>,
        backend_label: Option<String>,
        exchange_id: Option<String>,
    ) -> Self {
        Self {
            author: Author::Assistant,
            text: text.into(),
            evidence: if evidence.is_empty() {
                None
            } else {
                Some(evidence)
            },
            backend_label,
            exchange_id,
        }
    }

    /// Synthetic assistant turn standing in for a failed exchange
    pub fn apology(text: impl Into<String>) -> Self {
        Self {
            author: Author::Assistant,
            text: text.into(),
            evidence: None,
            backend_label: None,
            exchange_id: None,
        }
    }
}

/// One message in the conversation log. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    id: TurnId,
    author: Author,
    text: String,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    evidence: Option<Vec<EvidenceItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backend_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exchange_id: Option<String>,
}

impl ConversationTurn {
    pub(crate) fn from_draft(id: TurnId, created_at: DateTime<Utc>, draft: TurnDraft) -> Self {
        Self {
            id,
            author: draft.author,
            text: draft.text,
            created_at,
            evidence: draft.evidence,
            backend_label: draft.backend_label,
            exchange_id: draft.exchange_id,
        }
    }

    pub fn id(&self) -> TurnId {
        self.id
    }

    pub fn author(&self) -> Author {
        self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn evidence(&self) -> Option<&[EvidenceItem]> {
        self.evidence.as_deref()
    }

    pub fn backend_label(&self) -> Option<&str> {
        self.backend_label.as_deref()
    }

    pub fn exchange_id(&self) -> Option<&str> {
        self.exchange_id.as_deref()
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }

    pub fn is_assistant(&self) -> bool {
        self.author == Author::Assistant
    }
}
