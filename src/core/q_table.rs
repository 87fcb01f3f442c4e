// --- File: src/core/q_table.rs
use crate::core::types::{HintType, WordId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The value estimates of one word, one entry per hint type.
/// Entries keep their insertion order; ties are broken by it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QRow {
    values: Vec<(HintType, f64)>,
}

impl QRow {
    pub fn new(hint_types: &[HintType], initial: f64) -> Self {
        Self { values: hint_types.iter().map(|h| (h.clone(), initial)).collect() }
    }

    pub fn get(&self, hint_type: &str) -> Option<f64> {
        self.values.iter().find(|(h, _)| h == hint_type).map(|&(_, q)| q)
    }

    /// Sets an existing entry or appends a new one.
    pub fn set(&mut self, hint_type: &str, value: f64) {
        match self.values.iter_mut().find(|(h, _)| h == hint_type) {
            Some(entry) => entry.1 = value,
            None => self.values.push((hint_type.to_string(), value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(h, q)| (h.as_str(), *q))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest value in the row, over every entry it holds.
    pub fn max_value(&self) -> Option<f64> {
        self.values.iter().map(|&(_, q)| q).reduce(f64::max)
    }

    /// The entry with the largest value among `hint_types`.
    /// First-encountered wins on ties.
    pub fn arg_max(&self, hint_types: &[HintType]) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;
        for (hint, q) in self.iter().filter(|(h, _)| hint_types.iter().any(|t| t == h)) {
            if best.map_or(true, |(_, best_q)| q > best_q) {
                best = Some((hint, q));
            }
        }
        best.map(|(hint, _)| hint)
    }

    /// Hint types among `hint_types`, highest value first.
    /// The sort is stable, so equal values keep row order.
    pub fn ranked(&self, hint_types: &[HintType]) -> Vec<HintType> {
        let mut entries: Vec<(&str, f64)> =
            self.iter().filter(|(h, _)| hint_types.iter().any(|t| t == h)).collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries.into_iter().map(|(h, _)| h.to_string()).collect()
    }

    /// True when no entry has moved away from `initial`.
    pub fn is_untouched(&self, initial: f64) -> bool {
        self.values.iter().all(|&(_, q)| q == initial)
    }

    /// Appends `initial` entries for hint types this row lacks.
    /// Returns how many were added.
    pub fn backfill(&mut self, hint_types: &[HintType], initial: f64) -> usize {
        let mut added = 0;
        for hint in hint_types {
            if self.get(hint).is_none() {
                self.values.push((hint.clone(), initial));
                added += 1;
            }
        }
        added
    }
}

/// What `QTable::ensure_row` had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowInit {
    Present,
    Created,
    Backfilled(usize),
}

impl RowInit {
    pub fn mutated(self) -> bool {
        self != RowInit::Present
    }
}

/// Mapping from word to its row of value estimates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QTable {
    rows: BTreeMap<WordId, QRow>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh table with an initial row for every given word.
    pub fn seeded<I>(word_ids: I, hint_types: &[HintType], initial: f64) -> Self
    where
        I: IntoIterator<Item = WordId>,
    {
        Self {
            rows: word_ids.into_iter().map(|id| (id, QRow::new(hint_types, initial))).collect(),
        }
    }

    pub fn row(&self, word_id: WordId) -> Option<&QRow> {
        self.rows.get(&word_id)
    }

    pub fn row_mut(&mut self, word_id: WordId) -> Option<&mut QRow> {
        self.rows.get_mut(&word_id)
    }

    /// Creates the row for `word_id` if absent, or backfills hint types the
    /// row is missing. Existing values are never reset.
    pub fn ensure_row(&mut self, word_id: WordId, hint_types: &[HintType], initial: f64) -> RowInit {
        match self.rows.get_mut(&word_id) {
            None => {
                self.rows.insert(word_id, QRow::new(hint_types, initial));
                RowInit::Created
            }
            Some(row) => match row.backfill(hint_types, initial) {
                0 => RowInit::Present,
                n => RowInit::Backfilled(n),
            },
        }
    }

    /// Replaces any existing row with a fresh one.
    pub fn reset_row(&mut self, word_id: WordId, hint_types: &[HintType], initial: f64) {
        self.rows.insert(word_id, QRow::new(hint_types, initial));
    }

    /// Sum of each hint type's value over every row, in `hint_types` order.
    pub fn cumulative(&self, hint_types: &[HintType]) -> Vec<(HintType, f64)> {
        let mut totals: Vec<(HintType, f64)> = hint_types.iter().map(|h| (h.clone(), 0.0)).collect();
        for row in self.rows.values() {
            for (hint, q) in row.iter() {
                if let Some(total) = totals.iter_mut().find(|(h, _)| h == hint) {
                    total.1 += q;
                }
            }
        }
        totals
    }

    pub fn iter(&self) -> impl Iterator<Item = (WordId, &QRow)> {
        self.rows.iter().map(|(&id, row)| (id, row))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
