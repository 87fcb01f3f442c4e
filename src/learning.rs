// File: src/learning.rs
use crate::core::q_table::QRow;

/// One-step tabular Q-learning where the next state is the same word,
/// so the bootstrap term is the row's own maximum.
#[derive(Debug, Clone, Copy)]
pub struct QLearner {
    alpha: f64,
    gamma: f64,
}

impl QLearner {
    pub fn new(alpha: f64, gamma: f64) -> Self {
        Self { alpha, gamma }
    }

    /// Applies `q += alpha * (reward + gamma * max(row) - q)` to one entry.
    /// Returns the new value, or `None` if the row has no such entry.
    /// Values are not clamped.
    pub fn learn(&self, row: &mut QRow, hint_type: &str, reward: f64) -> Option<f64> {
        let current = row.get(hint_type)?;
        let next_best = row.max_value()?;
        let updated = current + self.alpha * (reward + self.gamma * next_best - current);
        row.set(hint_type, updated);
        Some(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> QRow {
        QRow::new(&["A".to_string(), "B".to_string()], 0.1)
    }

    #[test]
    fn single_update_matches_closed_form() {
        let mut row = row();
        let updated = QLearner::new(0.1, 0.9).learn(&mut row, "A", 1.0).unwrap();
        assert!((updated - 0.199).abs() < 1e-9);
        assert_eq!(row.get("A"), Some(updated));
        assert_eq!(row.get("B"), Some(0.1));
    }

    #[test]
    fn bootstrap_uses_row_maximum() {
        let mut row = row();
        row.set("B", 2.0);
        let updated = QLearner::new(0.5, 0.5).learn(&mut row, "A", 0.0).unwrap();
        // 0.1 + 0.5 * (0 + 0.5 * 2.0 - 0.1)
        assert!((updated - 0.55).abs() < 1e-12);
    }

    #[test]
    fn negative_rewards_are_not_clamped() {
        let mut row = row();
        let learner = QLearner::new(1.0, 0.0);
        let first = learner.learn(&mut row, "B", -5.0).unwrap();
        assert!((first + 5.0).abs() < 1e-12);
        let second = learner.learn(&mut row, "B", -5.0).unwrap();
        assert!((second + 5.0).abs() < 1e-12);
        assert!(row.get("A").unwrap() > second);
    }

    #[test]
    fn unknown_entry_is_left_alone() {
        let mut row = row();
        assert_eq!(QLearner::new(0.1, 0.9).learn(&mut row, "video", 1.0), None);
        assert_eq!(row.len(), 2);
    }
}
