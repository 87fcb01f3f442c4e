//! Shared fixtures: a config, a words file and a value table in a temp dir.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use hint_core::core::types::Word;
use hint_core::{Config, HintEngine};
use serde_json::json;
use tempfile::TempDir;

pub const HINT_TYPES: [&str; 3] = ["text", "image", "video"];

pub fn word(name: &str, hint_types: &[&str]) -> Word {
    Word {
        word: name.to_string(),
        hints: hint_types
            .iter()
            .map(|h| (h.to_string(), format!("{h} hint for {name}")))
            .collect(),
        summary: format!("summary of {name}"),
        choices: vec!["right".into(), "wrong".into(), "also wrong".into()],
        correct_index: 0,
        extra: Default::default(),
    }
}

/// Writes config.json and words.json with words 1 and 2 into `dir`.
pub fn write_fixture(dir: &Path, hint_types: &[&str]) -> PathBuf {
    let words = json!({
        "1": word("aberration", hint_types),
        "2": word("benevolent", hint_types),
    });
    fs::write(dir.join("words.json"), serde_json::to_string_pretty(&words).unwrap()).unwrap();

    let config = json!({
        "hint_types": hint_types,
        "alpha": 0.1,
        "gamma": 0.9,
        "exploration_rate": 0.2,
        "initial_q_value": 0.1,
        "words_file": "words.json",
        "q_table_file": "q_table.bin",
        "rewards": { "correct": 1.0, "incorrect": -0.5 }
    });
    let path = dir.join("config.json");
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

pub fn config(dir: &Path, exploration_rate: f64) -> Config {
    Config::load(&dir.join("config.json"))
        .unwrap()
        .with_exploration_rate(exploration_rate)
        .unwrap()
}

/// A greedy engine (no exploration) over a fresh fixture.
pub fn greedy_engine() -> (TempDir, HintEngine) {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path(), &HINT_TYPES);
    let engine = HintEngine::open_seeded(config(dir.path(), 0.0), 7).unwrap();
    (dir, engine)
}

pub fn reopen(dir: &Path) -> HintEngine {
    HintEngine::open_seeded(config(dir, 0.0), 7).unwrap()
}
