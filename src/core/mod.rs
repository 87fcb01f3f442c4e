pub mod catalog;
pub mod config;
pub mod engine;
pub mod q_table;
pub mod types;
