//! Wire types for the answer and feedback endpoints

use crate::conversation::{EvidenceItem, TurnDraft};
use crate::feedback::Rating;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Body of `POST /ask`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
    /// Number of evidence passages to retrieve
    pub k: u8,
    /// Ask the backend to translate from/to a local language
    pub translate_local: bool,
}

/// Successful `/ask` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default)]
    pub question_id: Option<String>,
}

/// One retrieved passage as the backend reports it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub text: String,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Source {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), Value::String(value.into()));
        self
    }

    /// Null values are dropped; other non-string scalars keep their JSON text.
    pub fn into_evidence(self) -> EvidenceItem {
        let attributes: BTreeMap<String, String> = self
            .metadata
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((key, s)),
                other => Some((key, other.to_string())),
            })
            .collect();
        EvidenceItem {
            text: self.text,
            attributes,
        }
    }
}

impl AnswerResponse {
    pub fn into_turn(self) -> TurnDraft {
        let evidence = self
            .sources
            .unwrap_or_default()
            .into_iter()
            .map(Source::into_evidence)
            .collect();
        TurnDraft::answer(self.answer, evidence, self.backend, self.question_id)
    }
}

/// Body of `POST /feedback`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub question_id: String,
    pub rating: Rating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
