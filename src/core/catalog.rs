// File: src/core/catalog.rs
use crate::core::types::{HintType, Word, WordId};
use crate::error::{StoreError, ValidationError};
use std::collections::BTreeMap;
use std::path::Path;

/// Word content keyed by ID. Read-only at runtime except through `add`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    words: BTreeMap<WordId, Word>,
}

impl Catalog {
    pub fn from_words(words: BTreeMap<WordId, Word>) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &BTreeMap<WordId, Word> {
        &self.words
    }

    pub fn get(&self, word_id: WordId) -> Option<&Word> {
        self.words.get(&word_id)
    }

    pub fn contains(&self, word_id: WordId) -> bool {
        self.words.contains_key(&word_id)
    }

    pub fn ids(&self) -> Vec<WordId> {
        self.words.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Checks that a record is complete for the given hint types.
    pub fn check_word(word_id: WordId, word: &Word, hint_types: &[HintType]) -> Result<(), ValidationError> {
        let missing = word.missing_hints(hint_types);
        if !missing.is_empty() {
            return Err(ValidationError::MissingHints { word_id, missing });
        }
        if word.correct_choice().is_none() {
            return Err(ValidationError::CorrectIndex {
                index: word.correct_index,
                choices: word.choices.len(),
            });
        }
        Ok(())
    }

    /// Validates every record loaded from `path`.
    pub fn validate(&self, hint_types: &[HintType], path: &Path) -> Result<(), StoreError> {
        for (&word_id, word) in &self.words {
            Self::check_word(word_id, word, hint_types).map_err(|e| StoreError::CatalogInvalid {
                path: path.display().to_string(),
                word_id,
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Inserts a new word. Nothing changes on rejection.
    pub fn add(&mut self, word_id: WordId, word: Word, hint_types: &[HintType]) -> Result<(), ValidationError> {
        if self.contains(word_id) {
            return Err(ValidationError::DuplicateWord { word_id });
        }
        Self::check_word(word_id, &word, hint_types)?;
        self.words.insert(word_id, word);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hint_types() -> Vec<HintType> {
        vec!["text".into(), "image".into()]
    }

    fn word(hints: &[&str]) -> Word {
        Word {
            word: "ephemeral".into(),
            hints: hints.iter().map(|h| (h.to_string(), format!("{h} hint"))).collect(),
            summary: "short-lived".into(),
            choices: vec!["brief".into(), "eternal".into()],
            correct_index: 0,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn add_rejects_duplicates() {
        let mut catalog = Catalog::default();
        catalog.add(1, word(&["text", "image"]), &hint_types()).unwrap();
        let err = catalog.add(1, word(&["text", "image"]), &hint_types()).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateWord { word_id: 1 }));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn add_reports_exactly_the_missing_hints() {
        let mut catalog = Catalog::default();
        let err = catalog.add(2, word(&["text"]), &hint_types()).unwrap_err();
        match err {
            ValidationError::MissingHints { word_id, missing } => {
                assert_eq!(word_id, 2);
                assert_eq!(missing, vec!["image".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(catalog.is_empty());
    }

    #[test]
    fn add_rejects_out_of_range_answer() {
        let mut catalog = Catalog::default();
        let mut bad = word(&["text", "image"]);
        bad.correct_index = 2;
        assert!(matches!(
            catalog.add(3, bad, &hint_types()),
            Err(ValidationError::CorrectIndex { index: 2, choices: 2 })
        ));
    }

    #[test]
    fn add_rejects_words_without_choices() {
        let mut catalog = Catalog::default();
        let mut bad = word(&["text", "image"]);
        bad.choices.clear();
        assert!(matches!(
            catalog.add(4, bad, &hint_types()),
            Err(ValidationError::CorrectIndex { index: 0, choices: 0 })
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn validate_names_the_offending_word() {
        let mut words = BTreeMap::new();
        words.insert(1, word(&["text", "image"]));
        words.insert(9, word(&["image"]));
        let catalog = Catalog::from_words(words);
        match catalog.validate(&hint_types(), Path::new("words.json")) {
            Err(StoreError::CatalogInvalid { word_id, .. }) => assert_eq!(word_id, 9),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
