//! Request boundary over the hint engine.
//!
//! Requests and responses are JSON objects. A request names its operation in
//! `op`; input that cannot be turned into a word ID is rejected as a bad
//! request before it reaches the engine.

use std::sync::{Mutex, MutexGuard};

use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::engine::HintEngine;
use crate::core::types::{Word, WordId};
use crate::error::{HintError, HintResult, RequestError};

/// One operation callable through the boundary.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    GetWord {
        #[serde(default)]
        word_id: Value,
    },
    GetHint {
        #[serde(default)]
        word_id: Value,
        hint_type: String,
    },
    BestHint {
        #[serde(default)]
        word_id: Value,
    },
    OverallBestHint,
    Update {
        #[serde(default)]
        word_id: Value,
        hint_type: String,
        is_correct: bool,
    },
    FlaggedWords,
    AddWord {
        #[serde(default)]
        word_id: Value,
        word_data: Word,
    },
    AllWords,
    RankedHint {
        #[serde(default)]
        word_id: Value,
        #[serde(default)]
        rank: Value,
    },
}

/// Accepts integers and integer strings.
pub fn parse_word_id(value: &Value) -> Result<WordId, RequestError> {
    match value {
        Value::Number(n) => n.as_u64().ok_or(RequestError::WordId),
        Value::String(s) => s.trim().parse().map_err(|_| RequestError::WordId),
        _ => Err(RequestError::WordId),
    }
}

/// Ranks that do not parse default to 0. Negative ranks map past the end,
/// where the engine falls back to the top-ranked hint.
pub fn parse_rank(value: &Value) -> usize {
    let rank = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match rank {
        Some(r) => usize::try_from(r).unwrap_or(usize::MAX),
        None => 0,
    }
}

/// Thread-safe handle to a single engine. Every request holds the lock for
/// its whole duration, so writes are serialized and each file rewrite
/// reflects every update applied before it.
pub struct HintService {
    engine: Mutex<HintEngine>,
}

impl HintService {
    pub fn new(engine: HintEngine) -> Self {
        Self { engine: Mutex::new(engine) }
    }

    pub fn engine(&self) -> MutexGuard<'_, HintEngine> {
        self.engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn into_engine(self) -> HintEngine {
        self.engine.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs a typed request.
    pub fn handle(&self, request: Request) -> HintResult<Value> {
        let mut engine = self.engine();
        let response = match request {
            Request::GetWord { word_id } => {
                let word = engine.word(parse_word_id(&word_id)?)?;
                serde_json::to_value(word).map_err(|e| RequestError::Malformed { message: e.to_string() })?
            }
            Request::GetHint { word_id, hint_type } => {
                let word_id = parse_word_id(&word_id)?;
                let hint = engine.hint_text(word_id, &hint_type)?;
                let word = engine.word(word_id)?;
                json!({ "word": word.word, "hint": hint, "choices": word.choices })
            }
            Request::BestHint { word_id } => {
                let best = engine.best_for_word(parse_word_id(&word_id)?)?;
                json!({ "best_hint_type": best })
            }
            Request::OverallBestHint => json!({ "overall_best_hint_type": engine.overall_best() }),
            Request::Update { word_id, hint_type, is_correct } => {
                let word_id = parse_word_id(&word_id)?;
                let value = engine.record_answer(word_id, &hint_type, is_correct)?;
                json!({ "status": "success", "value": value })
            }
            Request::FlaggedWords => json!({ "flagged_words": engine.flagged() }),
            Request::AddWord { word_id, word_data } => {
                engine.add_word(parse_word_id(&word_id)?, word_data)?;
                json!({ "status": "success", "message": "New word added successfully" })
            }
            Request::AllWords => json!({ "word_ids": engine.word_ids() }),
            Request::RankedHint { word_id, rank } => {
                let hint = engine.ranked_hint(parse_word_id(&word_id)?, parse_rank(&rank))?;
                json!({ "hint_type": hint })
            }
        };
        Ok(response)
    }

    /// Runs one raw JSON request and always produces a JSON response.
    /// Failures carry `error` and an HTTP-like `status`.
    pub fn handle_json(&self, line: &str) -> Value {
        let result = serde_json::from_str::<Request>(line)
            .map_err(|e| HintError::from(RequestError::Malformed { message: e.to_string() }))
            .and_then(|request| self.handle(request));
        match result {
            Ok(response) => response,
            Err(err) => {
                let status = err.status();
                if status >= 500 {
                    tracing::error!(error = %err, "request failed");
                } else {
                    tracing::warn!(error = %err, status, "request rejected");
                }
                json!({ "error": err.to_string(), "status": status })
            }
        }
    }
}
