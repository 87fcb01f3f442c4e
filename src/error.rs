//! Error types for the hint engine.
//!
//! Each subsystem has its own enum with miette diagnostic codes. `HintError`
//! wraps them so callers can propagate any of them with `?`.

use miette::Diagnostic;
use thiserror::Error;

use crate::core::types::{HintType, WordId};

/// Top-level error type for the hint engine.
#[derive(Debug, Error, Diagnostic)]
pub enum HintError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Request(#[from] RequestError),
}

pub type HintResult<T> = Result<T, HintError>;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    #[diagnostic(
        code(hint::config::not_found),
        help("Pass the path of an existing config.json with --config.")
    )]
    NotFound { path: String },

    #[error("failed to read config file {path}: {source}")]
    #[diagnostic(code(hint::config::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    #[diagnostic(
        code(hint::config::parse),
        help("The config must be a JSON object with at least `hint_types`, `alpha`, `gamma` and `words_file`.")
    )]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(hint::config::invalid))]
    Invalid { message: String },
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    #[diagnostic(
        code(hint::store::io),
        help("Check that the data directory exists, is writable, and that the disk is not full.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("words file not found: {path}")]
    #[diagnostic(code(hint::store::catalog_missing))]
    CatalogMissing { path: String },

    #[error("corrupt value table {path}: {source}")]
    #[diagnostic(
        code(hint::store::table_corrupt),
        help("The value table could not be decoded. Restore it from a backup or delete it to start from initial values.")
    )]
    TableCorrupt {
        path: String,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to encode value table: {source}")]
    #[diagnostic(code(hint::store::table_encode))]
    TableEncode {
        #[source]
        source: bincode::Error,
    },

    #[error("malformed words file {path}: {source}")]
    #[diagnostic(code(hint::store::catalog_parse))]
    CatalogParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid word {word_id} in {path}: {reason}")]
    #[diagnostic(code(hint::store::catalog_invalid))]
    CatalogInvalid {
        path: String,
        word_id: WordId,
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Validation errors: the caller's request was rejected, nothing was mutated
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ValidationError {
    #[error("invalid hint type: {hint_type}")]
    #[diagnostic(
        code(hint::validation::hint_type),
        help("Only hint types listed in the configuration's `hint_types` are accepted.")
    )]
    UnknownHintType { hint_type: HintType },

    #[error("word {word_id} not found")]
    #[diagnostic(code(hint::validation::unknown_word))]
    UnknownWord { word_id: WordId },

    #[error("word ID {word_id} already exists")]
    #[diagnostic(code(hint::validation::duplicate_word))]
    DuplicateWord { word_id: WordId },

    #[error("missing hints for types: {}", missing.join(", "))]
    #[diagnostic(
        code(hint::validation::missing_hints),
        help("Every word needs a hint payload for each configured hint type.")
    )]
    MissingHints { word_id: WordId, missing: Vec<HintType> },

    #[error("correct_index {index} is out of range for {choices} choices")]
    #[diagnostic(code(hint::validation::correct_index))]
    CorrectIndex { index: usize, choices: usize },
}

// ---------------------------------------------------------------------------
// Request errors: malformed input at the service boundary
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RequestError {
    #[error("invalid or missing word_id")]
    #[diagnostic(code(hint::request::word_id))]
    WordId,

    #[error("malformed request: {message}")]
    #[diagnostic(code(hint::request::malformed))]
    Malformed { message: String },
}

impl HintError {
    /// HTTP-like status code the service boundary reports for this error.
    pub fn status(&self) -> u16 {
        match self {
            HintError::Request(_) => 400,
            HintError::Validation(ValidationError::UnknownWord { .. }) => 404,
            HintError::Validation(_) => 400,
            HintError::Config(_) | HintError::Store(_) => 500,
        }
    }
}
