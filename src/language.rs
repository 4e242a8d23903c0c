//! Script detection for the backend's local-translation hint

use std::ops::RangeInclusive;

/// The Ethiopic Unicode block (Ge'ez script: Amharic, Tigrinya)
const ETHIOPIC: RangeInclusive<char> = '\u{1200}'..='\u{137F}';

/// Whether the backend should translate this question from a local language.
///
/// True iff at least one character falls in the Ethiopic block. Only the
/// question itself is examined.
pub fn needs_local_translation(text: &str) -> bool {
    text.chars().any(|c| ETHIOPIC.contains(&c))
}
