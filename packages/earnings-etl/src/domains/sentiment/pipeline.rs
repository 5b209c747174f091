//! Batch sentiment scoring over a date range.
//!
//! 1. One request file and one batch per date that has articles.
//! 2. Every batch is submitted before any polling starts.
//! 3. All batches are polled together until terminal.
//! 4. Completed batches are downloaded and reconciled in submission order.

use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::batch_input::BatchInputBuilder;
use super::models::BatchJob;
use super::poller::BatchPoller;
use super::reconciler::{ReconcileReport, ResultReconciler};
use super::staging::StagingArea;
use super::submitter::BatchSubmitter;
use crate::common::DateRange;
use crate::error::Result;
use crate::kernel::SentimentDeps;

/// Outcome of one scoring run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub dates_submitted: usize,
    pub jobs_completed: usize,
    pub jobs_without_output: usize,
    pub reconcile: ReconcileReport,
}

pub struct SentimentProcessor {
    deps: SentimentDeps,
    builder: BatchInputBuilder,
    staging: StagingArea,
    poll_interval: Duration,
}

impl SentimentProcessor {
    pub fn new(
        deps: SentimentDeps,
        model: impl Into<String>,
        staging: StagingArea,
        poll_interval: Duration,
    ) -> Self {
        let builder = BatchInputBuilder::new(deps.companies.clone(), model);
        Self {
            deps,
            builder,
            staging,
            poll_interval,
        }
    }

    /// Score every article dated within `range`, oldest date first.
    pub async fn process(&self, range: DateRange) -> Result<ProcessSummary> {
        info!(range = %range, "Starting news batch sentiment processing");

        let jobs = self.submit_all(range).await?;
        let mut summary = ProcessSummary {
            dates_submitted: jobs.len(),
            ..Default::default()
        };

        let job_ids: Vec<String> = jobs.iter().map(|job| job.id.clone()).collect();
        let results = BatchPoller::new(self.deps.provider.clone())
            .await_all(&job_ids, self.poll_interval)
            .await;

        let reconciler =
            ResultReconciler::new(self.deps.provider.clone(), self.deps.articles.clone());
        for job in &jobs {
            let Some(output_file_id) = results.get(&job.id).cloned().flatten() else {
                summary.jobs_without_output += 1;
                continue;
            };
            summary.jobs_completed += 1;

            if let Err(e) = reconciler.download(&output_file_id, &job.output_path).await {
                error!(
                    job_id = %job.id,
                    date = %job.date,
                    file_id = %output_file_id,
                    error = %e,
                    "Failed to download batch output, skipping date"
                );
                continue;
            }

            match reconciler.apply(&job.output_path).await {
                Ok(report) => summary.reconcile += report,
                Err(e) => error!(
                    job_id = %job.id,
                    date = %job.date,
                    path = %job.output_path.display(),
                    error = %e,
                    "Failed to read batch output"
                ),
            }
        }

        info!(
            dates = summary.dates_submitted,
            completed = summary.jobs_completed,
            without_output = summary.jobs_without_output,
            applied = summary.reconcile.applied,
            skipped = summary.reconcile.skipped,
            failed = summary.reconcile.failed,
            "News batches successfully processed"
        );
        Ok(summary)
    }

    /// Build and submit one batch per date. Stops at the first read or
    /// submission failure after logging the jobs already at the provider.
    async fn submit_all(&self, range: DateRange) -> Result<Vec<BatchJob>> {
        let submitter = BatchSubmitter::new(self.deps.provider.clone());
        let mut jobs = Vec::new();

        for date in range.days() {
            let submitted = async {
                let articles = self.deps.articles.articles_for_date(date).await?;
                if articles.is_empty() {
                    debug!(date = %date, "No articles found, skipping");
                    return Ok(None);
                }

                let input = self
                    .builder
                    .build(&articles, &self.staging.input_path(date))
                    .await?;
                submitter
                    .submit(
                        date,
                        &input.path,
                        self.staging.output_path(date),
                        &format!("Sentiment analysis for {}", date),
                    )
                    .await
                    .map(Some)
            }
            .await;

            match submitted {
                Ok(Some(job)) => jobs.push(job),
                Ok(None) => {}
                Err(e) => {
                    for job in &jobs {
                        warn!(
                            job_id = %job.id,
                            date = %job.date,
                            output_path = %job.output_path.display(),
                            "Batch left at provider after aborted run"
                        );
                    }
                    error!(date = %date, error = %e, "Batch preparation failed, aborting run");
                    return Err(e);
                }
            }
        }

        Ok(jobs)
    }
}
