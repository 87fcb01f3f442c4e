// src/lib.rs

pub mod core;
pub mod error;
pub mod learning;
pub mod persistence;
pub mod service;

pub use crate::core::config::Config;
pub use crate::core::engine::HintEngine;
pub use crate::error::{HintError, HintResult};
pub use crate::service::HintService;
