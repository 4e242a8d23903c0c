//! Terminal rendering of session state
//!
//! Pure formatting: every function takes read-only views and returns text.

use crate::conversation::{Author, ConversationTurn, EvidenceItem};
use crate::feedback::FeedbackState;
use crate::notification::Notification;
use crossterm::style::Stylize;
use std::fmt::Write;

/// Starter questions offered while the conversation is empty
pub const SUGGESTIONS: [&str; 3] = [
    "How do I plant teff?",
    "What pests affect maize?",
    "Soil fertility tips",
];

/// Evidence attributes shown with each source, in display order
const EVIDENCE_TAGS: [(&str, &str); 3] = [("crop", "Crop"), ("topic", "Topic"), ("source", "Source")];

pub fn welcome() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Agricultural assistant".bold());
    let _ = writeln!(
        out,
        "Evidence-based crop guidance. Ask in English, Amharic, or Tigrigna."
    );
    let _ = writeln!(out, "Try one of these (/suggest N):");
    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        let _ = writeln!(out, "  {}. {suggestion}", i + 1);
    }
    out
}

pub fn help() -> String {
    [
        "/sources N            show or hide the sources of answer N",
        "/rate N up|down [..]  rate answer N, optionally with a comment",
        "/dismiss              close the current notice",
        "/suggest N            ask suggested question N",
        "/quit                 leave",
    ]
    .join("\n")
}

pub fn busy() -> String {
    "…thinking".dim().to_string()
}

pub fn notification(notice: &Notification) -> String {
    format!("{} {}", "!".red().bold(), notice.message.as_str().red())
}

/// One turn with its per-turn affordances
pub fn turn(turn: &ConversationTurn, disclosed: bool, feedback: FeedbackState) -> String {
    let mut out = String::new();
    let id = format!("[{}]", turn.id()).dim();

    match turn.author() {
        Author::User => {
            let _ = writeln!(out, "{id} {} {}", "you:".cyan().bold(), turn.text());
            return out;
        }
        Author::Assistant => {
            let _ = writeln!(out, "{id} {} {}", "assistant:".green().bold(), turn.text());
        }
    }

    if let Some(label) = turn.backend_label() {
        let _ = writeln!(out, "    {}", format!("Backend: {label}").dim());
    }

    if let Some(items) = turn.evidence() {
        out.push_str(&evidence(items, disclosed));
    }

    if turn.exchange_id().is_some() {
        let line = if feedback.is_rated() {
            "Thank you for your feedback!".to_string()
        } else {
            format!("Was this helpful? /rate {} up|down", turn.id())
        };
        let _ = writeln!(out, "    {}", line.italic());
    }

    out
}

/// The collapsible sources block of an answer
pub fn evidence(items: &[EvidenceItem], open: bool) -> String {
    let mut out = String::new();
    let marker = if open { '▼' } else { '▶' };
    let _ = writeln!(out, "    {marker} Sources ({})", items.len());
    if !open {
        return out;
    }

    for item in items {
        let _ = writeln!(out, "      - {}", item.text);
        let tags: Vec<String> = EVIDENCE_TAGS
            .iter()
            .filter_map(|(key, label)| item.attribute(key).map(|v| format!("{label}: {v}")))
            .collect();
        if !tags.is_empty() {
            let _ = writeln!(out, "        {}", tags.join("  ").dim());
        }
    }
    out
}
