//! # dictbot Lookup Data Model
//!
//! File: cli/src/core/model.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Plain data types shared by the lookup client and the response formatter.
//! Values are built fresh for every query and never mutated afterwards.
//!
//! - `LookupQuery`: the raw search term as typed by the user.
//! - `LookupResult`: the tri-state outcome of one lookup.
//! - `DictionaryEntry` / `MeaningGroup` / `DefinitionEntry`: one normalized
//!   record from the dictionary service.
//!

/// The raw search term. No normalization is applied here; the lookup client
/// case-folds it when building the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    pub text: String,
}

impl LookupQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Outcome of a single lookup round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    /// The service answered with entries, in upstream order.
    Found(Vec<DictionaryEntry>),
    /// The service answered with a non-success status.
    NotFound,
    /// Timeout, transport failure or a body that did not match the schema.
    TransientError,
}

impl LookupResult {
    /// First entry of a `Found` result. `None` for the other outcomes and for
    /// an empty entry list.
    pub fn first_entry(&self) -> Option<&DictionaryEntry> {
        match self {
            LookupResult::Found(entries) => entries.first(),
            LookupResult::NotFound | LookupResult::TransientError => None,
        }
    }
}

/// One dictionary record for a word. `word` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub word: String,
    pub phonetic: Option<String>,
    pub meanings: Vec<MeaningGroup>,
}

/// Definitions sharing a part of speech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeaningGroup {
    pub part_of_speech: String,
    pub definitions: Vec<DefinitionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionEntry {
    pub definition: String,
    pub example: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str) -> DictionaryEntry {
        DictionaryEntry {
            word: word.to_string(),
            phonetic: None,
            meanings: Vec::new(),
        }
    }

    #[test]
    fn test_first_entry_only_for_found() {
        let found = LookupResult::Found(vec![entry("run"), entry("runs")]);
        assert_eq!(found.first_entry().map(|e| e.word.as_str()), Some("run"));

        assert!(LookupResult::Found(Vec::new()).first_entry().is_none());
        assert!(LookupResult::NotFound.first_entry().is_none());
        assert!(LookupResult::TransientError.first_entry().is_none());
    }
}
