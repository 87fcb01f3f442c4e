// File: src/core/config.rs
use crate::core::types::HintType;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Rewards handed to the update rule for a correct or incorrect answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rewards {
    pub correct: f64,
    pub incorrect: f64,
}

impl Default for Rewards {
    fn default() -> Self {
        Self { correct: 1.0, incorrect: -0.5 }
    }
}

/// Static engine parameters, loaded once and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Recognized hint types. The single source of truth for hint validity.
    pub hint_types: Vec<HintType>,
    /// Learning rate, in (0, 1].
    pub alpha: f64,
    /// Discount factor, in [0, 1].
    pub gamma: f64,
    #[serde(default = "default_exploration_rate")]
    pub exploration_rate: f64,
    #[serde(default = "default_initial_q_value")]
    pub initial_q_value: f64,
    pub words_file: PathBuf,
    #[serde(default = "default_q_table_file")]
    pub q_table_file: PathBuf,
    #[serde(default)]
    pub rewards: Rewards,
}

fn default_exploration_rate() -> f64 {
    0.2
}

fn default_initial_q_value() -> f64 {
    0.1
}

fn default_q_table_file() -> PathBuf {
    PathBuf::from("q_table.bin")
}

impl Config {
    /// Reads and validates a JSON config file. Relative file locations in it
    /// are resolved against the directory holding the config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound { path: display.clone() },
            _ => ConfigError::Io { path: display.clone(), source },
        })?;
        let mut config: Config =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path: display, source })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.words_file = base.join(&config.words_file);
        config.q_table_file = base.join(&config.q_table_file);

        config.validate()?;
        Ok(config)
    }

    /// Overrides the exploration rate from the config file.
    pub fn with_exploration_rate(mut self, exploration_rate: f64) -> Result<Self, ConfigError> {
        self.exploration_rate = exploration_rate;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hint_types.is_empty() {
            return Err(invalid("hint_types must not be empty"));
        }
        let mut seen = HashSet::new();
        for hint in &self.hint_types {
            if !seen.insert(hint.as_str()) {
                return Err(invalid(format!("duplicate hint type `{hint}`")));
            }
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(invalid(format!("alpha must be in (0, 1], got {}", self.alpha)));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(invalid(format!("gamma must be in [0, 1], got {}", self.gamma)));
        }
        if !(0.0..=1.0).contains(&self.exploration_rate) {
            return Err(invalid(format!(
                "exploration_rate must be in [0, 1], got {}",
                self.exploration_rate
            )));
        }
        if !self.initial_q_value.is_finite() {
            return Err(invalid("initial_q_value must be finite"));
        }
        Ok(())
    }

    pub fn is_hint_type(&self, hint_type: &str) -> bool {
        self.hint_types.iter().any(|h| h == hint_type)
    }

    /// Maps an answer outcome to its configured reward.
    pub fn reward_for(&self, correct: bool) -> f64 {
        if correct { self.rewards.correct } else { self.rewards.incorrect }
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { message: message.into() }
}
