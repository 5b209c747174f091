//! Batched LLM sentiment scoring.

pub mod batch_input;
pub mod cleanup;
pub mod decode;
pub mod models;
pub mod pipeline;
pub mod poller;
pub mod prompt;
pub mod reconciler;
pub mod staging;
pub mod submitter;

pub use batch_input::{BatchInputBuilder, BatchInputFile, CustomId};
pub use cleanup::{CleanupReport, ProviderCleanup};
pub use decode::decode_output_text;
pub use models::BatchJob;
pub use pipeline::{ProcessSummary, SentimentProcessor};
pub use poller::{BatchPoller, PollResults};
pub use prompt::{build_prompt, SentimentAssessment};
pub use reconciler::{ReconcileReport, ResultReconciler};
pub use staging::StagingArea;
pub use submitter::BatchSubmitter;
