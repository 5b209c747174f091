//! Typed errors for the pipeline.
//!
//! Library code returns `PipelineError`; the binary wraps it with `anyhow`
//! context at the edges.

use chrono::NaiveDate;
use openai_client::OpenAIError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while collecting news or scoring sentiment.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid or missing configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Inference provider call failed
    #[error("provider error: {0}")]
    Provider(#[from] OpenAIError),

    /// Database operation failed
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Staging file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Upload or batch creation failed for a day's batch
    #[error("batch submission failed for {date}: {source}")]
    Submission {
        date: NaiveDate,
        #[source]
        source: Box<PipelineError>,
    },

    /// Provider response envelope did not have the expected shape
    #[error("malformed provider response: {0}")]
    MalformedProviderResponse(String),

    /// `custom_id` is not of the form `article-{id}`
    #[error("invalid custom_id: {0}")]
    InvalidCustomId(String),

    /// Model answer did not match the sentiment schema
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Embedded per-request status was not 200
    #[error("request {custom_id} returned status {status_code}")]
    NonSuccessStatus { custom_id: String, status_code: u16 },

    /// News source or article fetch failed
    #[error("news fetch error: {0}")]
    News(String),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

impl From<reqwest::Error> for PipelineError {
    fn from(e: reqwest::Error) -> Self {
        PipelineError::News(e.to_string())
    }
}
