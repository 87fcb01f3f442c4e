// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A unique identifier for a vocabulary word.
pub type WordId = u64;

/// The name of a hint modality, e.g. "text", "image" or "video".
pub type HintType = String;

/// A vocabulary word as stored in the catalog.
/// Hint payloads are plain text or a URI for non-text modalities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    pub hints: BTreeMap<HintType, String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub correct_index: usize,
    /// Fields this engine does not use, kept so rewrites of the words file
    /// do not drop them.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Word {
    /// Returns the recognized hint types this word has no payload for,
    /// in the order they were given.
    pub fn missing_hints(&self, hint_types: &[HintType]) -> Vec<HintType> {
        hint_types
            .iter()
            .filter(|hint| !self.hints.contains_key(hint.as_str()))
            .cloned()
            .collect()
    }

    pub fn correct_choice(&self) -> Option<&str> {
        self.choices.get(self.correct_index).map(String::as_str)
    }
}
