//! Applies batch results back to the article store.
//!
//! The result file is saved verbatim before it is processed, so a run can be
//! resumed by re-applying the saved file. Every line is handled on its own:
//! a bad line is logged and counted, and never stops the rest of the file.

use std::path::Path;
use std::sync::Arc;

use openai_client::BatchOutputLine;
use tracing::{debug, error, info, warn};

use super::batch_input::CustomId;
use super::decode::{decode_output_text, parse_assessment};
use crate::error::{PipelineError, Result};
use crate::kernel::{BaseArticleStore, BaseBatchProvider};

/// Per-line outcome counts for one result file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl std::ops::AddAssign for ReconcileReport {
    fn add_assign(&mut self, other: Self) {
        self.applied += other.applied;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

enum LineOutcome {
    Applied,
    Skipped,
}

pub struct ResultReconciler {
    provider: Arc<dyn BaseBatchProvider>,
    articles: Arc<dyn BaseArticleStore>,
}

impl ResultReconciler {
    pub fn new(provider: Arc<dyn BaseBatchProvider>, articles: Arc<dyn BaseArticleStore>) -> Self {
        Self { provider, articles }
    }

    /// Save the provider file at `destination` exactly as served.
    pub async fn download(&self, output_file_id: &str, destination: &Path) -> Result<()> {
        let bytes = self.provider.file_content(output_file_id).await?;
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(destination, &bytes).await?;
        debug!(
            file_id = %output_file_id,
            path = %destination.display(),
            bytes = bytes.len(),
            "Downloaded batch output"
        );
        Ok(())
    }

    /// Apply every line of a saved result file.
    pub async fn apply(&self, path: &Path) -> Result<ReconcileReport> {
        let contents = tokio::fs::read(path).await?;
        let mut report = ReconcileReport::default();

        for (index, raw) in contents.split(|b| *b == b'\n').enumerate() {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let line = match std::str::from_utf8(raw) {
                Ok(line) => line,
                Err(e) => {
                    error!(path = %path.display(), line = index + 1, error = %e, "Result line is not valid UTF-8");
                    report.failed += 1;
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            let parsed: BatchOutputLine = match serde_json::from_str(line) {
                Ok(parsed) => parsed,
                Err(e) => {
                    error!(path = %path.display(), line = index + 1, error = %e, "Unparseable result line");
                    report.failed += 1;
                    continue;
                }
            };

            match self.apply_line(&parsed).await {
                Ok(LineOutcome::Applied) => report.applied += 1,
                Ok(LineOutcome::Skipped) => report.skipped += 1,
                Err(e) => {
                    error!(custom_id = %parsed.custom_id, error = %e, "Error applying result");
                    report.failed += 1;
                }
            }
        }

        info!(
            path = %path.display(),
            applied = report.applied,
            skipped = report.skipped,
            failed = report.failed,
            "Reconciled batch output"
        );
        Ok(report)
    }

    async fn apply_line(&self, line: &BatchOutputLine) -> Result<LineOutcome> {
        let response = match (&line.response, &line.error) {
            (Some(response), _) => response,
            (None, Some(err)) => {
                warn!(
                    custom_id = %line.custom_id,
                    code = err.code.as_deref().unwrap_or("unknown"),
                    message = err.message.as_deref().unwrap_or(""),
                    "Request failed at provider"
                );
                return Ok(LineOutcome::Skipped);
            }
            (None, None) => {
                return Err(PipelineError::MalformedProviderResponse(
                    "line has neither response nor error".to_string(),
                ));
            }
        };

        if response.status_code != 200 {
            let err = PipelineError::NonSuccessStatus {
                custom_id: line.custom_id.clone(),
                status_code: response.status_code,
            };
            warn!(custom_id = %line.custom_id, error = %err, "Skipping result");
            return Ok(LineOutcome::Skipped);
        }

        let CustomId(article_id) = line.custom_id.parse::<CustomId>()?;
        let text = decode_output_text(&response.body)?;
        let assessment = parse_assessment(&text)?;

        let updated = self
            .articles
            .update_sentiment(
                article_id,
                assessment.sentiment_score,
                &assessment.reasoning_process,
            )
            .await?;
        if !updated {
            return Err(PipelineError::Store(sqlx::Error::RowNotFound));
        }

        debug!(
            custom_id = %line.custom_id,
            score = assessment.sentiment_score,
            "Applied sentiment"
        );
        Ok(LineOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::{
        error_line, response_line, success_line, MemoryArticleStore, MockBatchProvider,
    };
    use chrono::NaiveDate;

    fn setup() -> (Arc<MemoryArticleStore>, ResultReconciler) {
        let store = Arc::new(MemoryArticleStore::new());
        let date = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        store.add("AAPL", date, "one");
        store.add("AAPL", date, "two");
        store.add("AAPL", date, "three");
        let reconciler = ResultReconciler::new(Arc::new(MockBatchProvider::new()), store.clone());
        (store, reconciler)
    }

    #[tokio::test]
    async fn test_malformed_line_does_not_block_others() {
        let (store, reconciler) = setup();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let contents = [
            success_line("article-1", 0.4, "Good"),
            "{ not json".to_string(),
            response_line("article-2", 200, "I think it's positive"),
            String::new(),
            success_line("article-3", -0.2, "Weak"),
        ]
        .join("\n");
        std::fs::write(&path, contents).unwrap();

        let report = reconciler.apply(&path).await.unwrap();

        assert_eq!(report, ReconcileReport { applied: 2, skipped: 0, failed: 2 });
        assert_eq!(store.get(1).unwrap().sentiment_score, Some(0.4));
        assert_eq!(store.get(2).unwrap().sentiment_score, None);
        assert_eq!(store.get(3).unwrap().sentiment_reasoning.as_deref(), Some("Weak"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_block_others() {
        let (store, reconciler) = setup();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let mut contents = success_line("article-1", 0.4, "Good").into_bytes();
        contents.extend_from_slice(b"\n{\"custom_id\": \"article-3\xff\"}\r\n");
        contents.extend_from_slice(success_line("article-2", -0.1, "Soft").as_bytes());
        std::fs::write(&path, contents).unwrap();

        let report = reconciler.apply(&path).await.unwrap();

        assert_eq!(report, ReconcileReport { applied: 2, skipped: 0, failed: 1 });
        assert_eq!(store.get(1).unwrap().sentiment_score, Some(0.4));
        assert_eq!(store.get(2).unwrap().sentiment_score, Some(-0.1));
        assert_eq!(store.get(3).unwrap().sentiment_score, None);
    }

    #[tokio::test]
    async fn test_non_200_and_error_lines_are_skipped() {
        let (store, reconciler) = setup();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let contents = [
            response_line("article-1", 500, "{}"),
            error_line("article-2", "rate_limit_exceeded"),
        ]
        .join("\n");
        std::fs::write(&path, contents).unwrap();

        let report = reconciler.apply(&path).await.unwrap();

        assert_eq!(report, ReconcileReport { applied: 0, skipped: 2, failed: 0 });
        assert!(store.all().iter().all(|a| a.sentiment_score.is_none()));
    }

    #[tokio::test]
    async fn test_unknown_article_and_bad_custom_id_fail() {
        let (_store, reconciler) = setup();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let contents = [
            success_line("article-99", 0.1, "Missing"),
            success_line("post-1", 0.1, "Wrong prefix"),
            success_line("article-1", 3.0, "Out of range"),
        ]
        .join("\n");
        std::fs::write(&path, contents).unwrap();

        let report = reconciler.apply(&path).await.unwrap();
        assert_eq!(report, ReconcileReport { applied: 0, skipped: 0, failed: 3 });
    }

    #[tokio::test]
    async fn test_store_error_is_isolated() {
        let (store, reconciler) = setup();
        store.fail_updates_for(2);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let contents = [
            success_line("article-1", 0.1, "a"),
            success_line("article-2", 0.2, "b"),
            success_line("article-3", 0.3, "c"),
        ]
        .join("\n");
        std::fs::write(&path, contents).unwrap();

        let report = reconciler.apply(&path).await.unwrap();
        assert_eq!(report, ReconcileReport { applied: 2, skipped: 0, failed: 1 });
    }

    #[tokio::test]
    async fn test_download_writes_verbatim_and_creates_dirs() {
        let provider = Arc::new(MockBatchProvider::new().with_output(0, "line one\nline two\n"));
        let batch = provider
            .create_batch("file-input-0", "/v1/responses", "d")
            .await
            .unwrap();
        let output_file_id = provider
            .batch_status(&batch.id)
            .await
            .unwrap()
            .output_file_id
            .unwrap();

        let reconciler = ResultReconciler::new(provider, Arc::new(MemoryArticleStore::new()));
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("output/nested/batchoutput.jsonl");

        reconciler.download(&output_file_id, &dest).await.unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "line one\nline two\n");
    }
}
