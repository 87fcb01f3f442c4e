use crate::core::catalog::Catalog;
use crate::core::config::Config;
use crate::core::q_table::{QRow, QTable, RowInit};
use crate::core::types::{HintType, Word, WordId};
use crate::error::{HintResult, ValidationError};
use crate::learning::QLearner;
use crate::persistence::{load_catalog, load_q_table, save_catalog, save_q_table};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

/// Picks hint types per word and learns from answer outcomes.
///
/// Operations that take a word ID use read-or-create semantics on the value
/// table: a word without a row gets one at the initial value, and that row is
/// written to disk before the call returns. Every mutation rewrites the whole
/// table file. Use [`HintEngine::peek_row`] for a read that creates nothing.
///
/// The engine does no locking of its own; wrap it in
/// [`crate::service::HintService`] when more than one caller shares it.
pub struct HintEngine {
    config: Config,
    catalog: Catalog,
    table: QTable,
    learner: QLearner,
    flagged: BTreeSet<WordId>,
    rng: StdRng,
}

impl HintEngine {
    /// Loads the catalog and the value table named by `config`.
    pub fn open(config: Config) -> HintResult<Self> {
        Self::open_with_rng(config, StdRng::from_entropy())
    }

    /// Like [`HintEngine::open`] with a fixed seed for the exploration policy.
    pub fn open_seeded(config: Config, seed: u64) -> HintResult<Self> {
        Self::open_with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn open_with_rng(config: Config, rng: StdRng) -> HintResult<Self> {
        config.validate()?;
        let catalog = load_catalog(&config.words_file)?;
        catalog.validate(&config.hint_types, &config.words_file)?;

        let table = match load_q_table(&config.q_table_file)? {
            Some(table) => table,
            None => {
                let table = QTable::seeded(catalog.ids(), &config.hint_types, config.initial_q_value);
                save_q_table(&table, &config.q_table_file)?;
                tracing::info!(
                    path = %config.q_table_file.display(),
                    rows = table.len(),
                    "created value table"
                );
                table
            }
        };

        tracing::info!(
            words = catalog.len(),
            rows = table.len(),
            hint_types = config.hint_types.len(),
            exploration_rate = config.exploration_rate,
            "hint engine ready"
        );

        Ok(Self {
            learner: QLearner::new(config.alpha, config.gamma),
            config,
            catalog,
            table,
            flagged: BTreeSet::new(),
            rng,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn persist(&self) -> HintResult<()> {
        save_q_table(&self.table, &self.config.q_table_file)?;
        Ok(())
    }

    fn check_hint_type(&self, hint_type: &str) -> Result<(), ValidationError> {
        if self.config.is_hint_type(hint_type) {
            Ok(())
        } else {
            Err(ValidationError::UnknownHintType { hint_type: hint_type.to_string() })
        }
    }

    /// Makes sure `word_id` has a complete row, persisting if anything changed.
    fn ensure_row(&mut self, word_id: WordId) -> HintResult<()> {
        let init = self.table.ensure_row(word_id, &self.config.hint_types, self.config.initial_q_value);
        if init.mutated() {
            match init {
                RowInit::Backfilled(added) => tracing::debug!(word_id, added, "backfilled value row"),
                _ => tracing::debug!(word_id, "created value row"),
            }
            self.persist()?;
        }
        Ok(())
    }

    // Callers run ensure_row first.
    fn row_of(&self, word_id: WordId) -> HintResult<&QRow> {
        Ok(self.table.row(word_id).ok_or(ValidationError::UnknownWord { word_id })?)
    }

    /// The value row of a word, created at the initial value if absent.
    pub fn get_row(&mut self, word_id: WordId) -> HintResult<&QRow> {
        self.ensure_row(word_id)?;
        self.row_of(word_id)
    }

    /// The value row of a word, without creating it.
    pub fn peek_row(&self, word_id: WordId) -> Option<&QRow> {
        self.table.row(word_id)
    }

    /// Overwrites one value estimate and persists the table.
    pub fn set_value(&mut self, word_id: WordId, hint_type: &str, value: f64) -> HintResult<()> {
        self.check_hint_type(hint_type)?;
        self.ensure_row(word_id)?;
        if let Some(row) = self.table.row_mut(word_id) {
            row.set(hint_type, value);
        }
        self.persist()
    }

    /// Applies one Q-learning step for `(word_id, hint_type)` and persists the
    /// table. Returns the new value estimate.
    pub fn update(&mut self, word_id: WordId, hint_type: &str, reward: f64) -> HintResult<f64> {
        self.check_hint_type(hint_type)?;
        self.ensure_row(word_id)?;

        let row = self
            .table
            .row_mut(word_id)
            .ok_or(ValidationError::UnknownWord { word_id })?;
        let previous = row.get(hint_type);
        let updated = self
            .learner
            .learn(row, hint_type, reward)
            .ok_or_else(|| ValidationError::UnknownHintType { hint_type: hint_type.to_string() })?;
        tracing::debug!(word_id, hint_type, reward, ?previous, updated, "updated value");

        self.persist()?;
        Ok(updated)
    }

    /// Turns an answer outcome into a reward and learns from it. Incorrect
    /// answers also flag the word for review.
    pub fn record_answer(&mut self, word_id: WordId, hint_type: &str, correct: bool) -> HintResult<f64> {
        let reward = self.config.reward_for(correct);
        let updated = self.update(word_id, hint_type, reward)?;
        if !correct {
            self.flag(word_id);
        }
        Ok(updated)
    }

    /// Epsilon-greedy choice of a hint type for one word.
    ///
    /// With probability `exploration_rate` a uniformly random hint type is
    /// returned and the table is not touched. Otherwise the row's best hint
    /// type is returned, first-encountered winning ties.
    pub fn best_for_word(&mut self, word_id: WordId) -> HintResult<HintType> {
        if self.rng.gen::<f64>() < self.config.exploration_rate {
            if let Some(hint) = self.config.hint_types.choose(&mut self.rng) {
                return Ok(hint.clone());
            }
        }
        self.ensure_row(word_id)?;
        let best = self.row_of(word_id)?.arg_max(&self.config.hint_types).map(str::to_string);
        Ok(best.unwrap_or_else(|| self.overall_best()))
    }

    /// The hint type with the largest summed value across every row.
    /// Ties go to the hint type listed first in the config.
    pub fn overall_best(&self) -> HintType {
        let mut best: Option<(HintType, f64)> = None;
        for (hint, total) in self.table.cumulative(&self.config.hint_types) {
            if best.as_ref().map_or(true, |(_, best_total)| total > *best_total) {
                best = Some((hint, total));
            }
        }
        best.map(|(hint, _)| hint).unwrap_or_default()
    }

    /// Hint types of a word, highest value first.
    pub fn sorted_hints(&mut self, word_id: WordId) -> HintResult<Vec<HintType>> {
        self.ensure_row(word_id)?;
        Ok(self.row_of(word_id)?.ranked(&self.config.hint_types))
    }

    /// The hint type at `rank` for a word.
    ///
    /// A word whose row never moved from the initial value defers to
    /// [`HintEngine::overall_best`] for every rank. Out-of-range ranks
    /// return the top-ranked hint type.
    pub fn ranked_hint(&mut self, word_id: WordId, rank: usize) -> HintResult<HintType> {
        self.ensure_row(word_id)?;
        let row = self.row_of(word_id)?;
        if row.is_untouched(self.config.initial_q_value) {
            return Ok(self.overall_best());
        }
        let sorted = row.ranked(&self.config.hint_types);
        let hint = sorted.get(rank).or_else(|| sorted.first()).cloned();
        Ok(hint.unwrap_or_else(|| self.overall_best()))
    }

    /// Adds a word to the catalog with a fresh value row and persists both.
    /// The in-memory state only changes once both files are written.
    pub fn add_word(&mut self, word_id: WordId, word: Word) -> HintResult<()> {
        let mut catalog = self.catalog.clone();
        catalog.add(word_id, word, &self.config.hint_types)?;
        let mut table = self.table.clone();
        table.reset_row(word_id, &self.config.hint_types, self.config.initial_q_value);

        save_catalog(&catalog, &self.config.words_file)?;
        save_q_table(&table, &self.config.q_table_file)?;
        self.catalog = catalog;
        self.table = table;
        tracing::info!(word_id, words = self.catalog.len(), "added word");
        Ok(())
    }

    /// Marks a word for review. Not persisted, and unknown IDs are accepted.
    pub fn flag(&mut self, word_id: WordId) {
        if self.flagged.insert(word_id) {
            tracing::info!(word_id, "flagged word for review");
        }
    }

    pub fn flagged(&self) -> Vec<WordId> {
        self.flagged.iter().copied().collect()
    }

    pub fn word(&self, word_id: WordId) -> HintResult<&Word> {
        Ok(self
            .catalog
            .get(word_id)
            .ok_or(ValidationError::UnknownWord { word_id })?)
    }

    /// The hint payload (text or URI) of a word for one hint type.
    pub fn hint_text(&self, word_id: WordId, hint_type: &str) -> HintResult<&str> {
        self.check_hint_type(hint_type)?;
        let word = self.word(word_id)?;
        let text = word.hints.get(hint_type).ok_or_else(|| ValidationError::MissingHints {
            word_id,
            missing: vec![hint_type.to_string()],
        })?;
        Ok(text.as_str())
    }

    pub fn word_ids(&self) -> Vec<WordId> {
        self.catalog.ids()
    }
}
