//! # dictbot Response Formatting
//!
//! File: cli/src/core/formatting.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Turns one `DictionaryEntry` into the chat message sent back to the user.
//! Rendering is pure: no I/O, no failure modes. Absent optional fields are
//! skipped and empty sequences contribute no lines.
//!
//! ## Message Layout
//!
//! ```text
//! 📚 *Computer*
//! 🔊 /kəmˈpjuːtə/
//!
//! *noun*
//! 1. A programmable electronic device...
//!    _Example: She bought a new computer._
//! ```
//!
//! Markup follows Telegram's legacy Markdown: `*bold*` for the title and the
//! part-of-speech labels, `_italic_` for example lines.
//!
//! ## Limits
//!
//! `FormatLimits::max_meaning_groups` caps the number of meaning groups shown
//! and, independently, the number of definitions shown inside each group.
//! `FormatLimits::max_examples` gates example lines by the definition's
//! 1-based position within its group, not by how many examples were already
//! shown.
//!
use crate::core::model::DictionaryEntry;

/// Bounds applied while rendering an entry. Both values are expected to be
/// at least 1; configuration loading enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatLimits {
    pub max_meaning_groups: usize,
    pub max_examples: usize,
}

impl Default for FormatLimits {
    fn default() -> Self {
        Self {
            max_meaning_groups: 3,
            max_examples: 1,
        }
    }
}

/// # Format Entry (`format_entry`)
///
/// Renders `entry` as a line-oriented chat message, joined with `\n` and
/// without a trailing newline.
///
/// ## Arguments
///
/// * `entry`: The dictionary record to render (normally the first entry of a lookup).
/// * `limits`: Caps on meaning groups, definitions per group and example lines.
///
/// ## Returns
///
/// * `String`: The formatted message, ready to hand to the transport.
pub fn format_entry(entry: &DictionaryEntry, limits: FormatLimits) -> String {
    let mut lines = vec![format!("📚 *{}*", capitalize_first(&entry.word))];

    if let Some(phonetic) = entry.phonetic.as_deref().map(str::trim) {
        // Upstream transcriptions usually arrive already wrapped in slashes.
        let bare = phonetic.trim_matches('/');
        if !bare.is_empty() {
            lines.push(format!("🔊 /{}/", bare));
        }
    }

    for group in entry.meanings.iter().take(limits.max_meaning_groups) {
        lines.push(String::new());
        lines.push(format!("*{}*", group.part_of_speech));

        for (position, definition) in group
            .definitions
            .iter()
            .take(limits.max_meaning_groups)
            .enumerate()
            .map(|(i, d)| (i + 1, d))
        {
            lines.push(format!("{}. {}", position, definition.definition));

            match definition.example.as_deref() {
                Some(example) if !example.is_empty() && position <= limits.max_examples => {
                    lines.push(format!("   _Example: {}_", example));
                }
                _ => {}
            }
        }
    }

    lines.join("\n")
}

/// Upper-cases the first character only; the rest of the word is kept as is.
fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
