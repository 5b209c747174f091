//! Pre-earnings news collection and batched LLM sentiment scoring.
//!
//! News articles published in the days before each earnings report are
//! collected into a relational store. They are then scored in bulk through
//! the provider's asynchronous batch API: one JSONL request file per
//! calendar date, submitted together, polled until terminal, and reconciled
//! back into the store line by line.

pub mod common;
pub mod config;
pub mod db;
pub mod domains;
pub mod error;
pub mod kernel;

pub use config::Config;
pub use error::{PipelineError, Result};
