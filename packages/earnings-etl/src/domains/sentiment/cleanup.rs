//! Provider-side housekeeping: cancel running batches and delete stored files.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::kernel::BaseBatchProvider;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub batches_cancelled: usize,
    pub files_deleted: usize,
    pub failures: usize,
}

pub struct ProviderCleanup {
    provider: Arc<dyn BaseBatchProvider>,
}

impl ProviderCleanup {
    pub fn new(provider: Arc<dyn BaseBatchProvider>) -> Self {
        Self { provider }
    }

    /// Cancel every running batch, then delete every file. One failing item
    /// does not stop the others.
    pub async fn run(&self) -> CleanupReport {
        let mut report = CleanupReport::default();
        self.cancel_running_batches(&mut report).await;
        self.delete_all_files(&mut report).await;

        info!(
            cancelled = report.batches_cancelled,
            deleted = report.files_deleted,
            failures = report.failures,
            "Provider cleanup finished"
        );
        report
    }

    async fn cancel_running_batches(&self, report: &mut CleanupReport) {
        info!("Fetching all batches...");
        let batches = match self.provider.list_batches().await {
            Ok(batches) => batches,
            Err(e) => {
                error!(error = %e, "Error fetching batches");
                report.failures += 1;
                return;
            }
        };

        for batch in batches {
            if !batch.status.is_running() {
                debug!(job_id = %batch.id, status = %batch.status, "Skipping batch");
                continue;
            }

            debug!(job_id = %batch.id, status = %batch.status, "Cancelling batch");
            match self.provider.cancel_batch(&batch.id).await {
                Ok(_) => report.batches_cancelled += 1,
                Err(e) => {
                    error!(job_id = %batch.id, error = %e, "Failed to cancel batch");
                    report.failures += 1;
                }
            }
        }
    }

    async fn delete_all_files(&self, report: &mut CleanupReport) {
        info!("Fetching all files...");
        let files = match self.provider.list_files().await {
            Ok(files) => files,
            Err(e) => {
                error!(error = %e, "Error fetching files");
                report.failures += 1;
                return;
            }
        };

        for file in files {
            debug!(file_id = %file.id, filename = %file.filename, "Deleting file");
            match self.provider.delete_file(&file.id).await {
                Ok(()) => report.files_deleted += 1,
                Err(e) => {
                    error!(file_id = %file.id, error = %e, "Failed to delete file");
                    report.failures += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MockBatchProvider;
    use openai_client::BatchStatus;

    #[tokio::test]
    async fn test_cancels_only_running_batches() {
        let provider = Arc::new(
            MockBatchProvider::new()
                .with_existing_batch("batch_a", BatchStatus::InProgress)
                .with_existing_batch("batch_b", BatchStatus::Completed)
                .with_existing_batch("batch_c", BatchStatus::Validating)
                .with_existing_batch("batch_d", BatchStatus::Finalizing)
                .with_existing_batch("batch_e", BatchStatus::Cancelling)
                .with_existing_batch("batch_f", BatchStatus::Failed),
        );

        let report = ProviderCleanup::new(provider.clone()).run().await;

        assert_eq!(report.batches_cancelled, 3);
        assert_eq!(provider.cancelled(), vec!["batch_a", "batch_c", "batch_d"]);
    }

    #[tokio::test]
    async fn test_deletes_all_files_despite_failures() {
        let provider = Arc::new(
            MockBatchProvider::new()
                .with_existing_file("file-1")
                .with_existing_file("file-2")
                .with_existing_file("file-3")
                .fail_delete("file-2"),
        );

        let report = ProviderCleanup::new(provider.clone()).run().await;

        assert_eq!(report.files_deleted, 2);
        assert_eq!(report.failures, 1);
        assert_eq!(provider.deleted(), vec!["file-1", "file-3"]);
        assert_eq!(provider.file_ids(), vec!["file-2"]);
    }
}
