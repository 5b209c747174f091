use std::path::PathBuf;

use chrono::NaiveDate;
use openai_client::BatchStatus;

/// One day's batch as tracked by the pipeline. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchJob {
    pub id: String,
    pub date: NaiveDate,
    pub input_file_id: String,
    /// Present once the provider reports completion
    pub output_file_id: Option<String>,
    pub status: BatchStatus,
    /// Where the result file is downloaded to
    pub output_path: PathBuf,
}
