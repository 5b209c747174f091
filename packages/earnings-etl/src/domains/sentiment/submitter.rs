use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use super::models::BatchJob;
use crate::error::{PipelineError, Result};
use crate::kernel::{BaseBatchProvider, RESPONSES_ENDPOINT};

/// Uploads a request file and opens a batch over it. No retries.
pub struct BatchSubmitter {
    provider: Arc<dyn BaseBatchProvider>,
}

impl BatchSubmitter {
    pub fn new(provider: Arc<dyn BaseBatchProvider>) -> Self {
        Self { provider }
    }

    pub async fn submit(
        &self,
        date: NaiveDate,
        input_path: &Path,
        output_path: PathBuf,
        description: &str,
    ) -> Result<BatchJob> {
        let submission_failed = |source: PipelineError| PipelineError::Submission {
            date,
            source: Box::new(source),
        };

        let input_file_id = self
            .provider
            .upload_batch_file(input_path)
            .await
            .map_err(submission_failed)?;
        let batch = self
            .provider
            .create_batch(&input_file_id, RESPONSES_ENDPOINT, description)
            .await
            .map_err(submission_failed)?;

        info!(date = %date, job_id = %batch.id, status = %batch.status, "Submitted batch");

        Ok(BatchJob {
            id: batch.id,
            date,
            input_file_id,
            output_file_id: batch.output_file_id,
            status: batch.status,
            output_path,
        })
    }
}
