//! Multiplexed polling of submitted batches.
//!
//! All jobs are watched from one task with full sweeps. A sweep queries every
//! job that is still open; the poller sleeps between sweeps only while at
//! least one job remains open. There is no per-job timeout.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use openai_client::BatchStatus;
use tracing::{error, info, warn};

use crate::kernel::BaseBatchProvider;

/// Terminal outcome per job id: the output file id of a completed job, or
/// `None` for a job that ended without output. Keys keep submission order.
pub type PollResults = IndexMap<String, Option<String>>;

pub struct BatchPoller {
    provider: Arc<dyn BaseBatchProvider>,
}

impl BatchPoller {
    pub fn new(provider: Arc<dyn BaseBatchProvider>) -> Self {
        Self { provider }
    }

    /// Poll until every job in `job_ids` is terminal.
    pub async fn await_all(&self, job_ids: &[String], poll_interval: Duration) -> PollResults {
        let pending: Vec<&String> = {
            let mut unique = HashSet::new();
            job_ids.iter().filter(|id| unique.insert(*id)).collect()
        };
        let total = pending.len();
        let mut finished: HashSet<&String> = HashSet::new();
        let mut outcomes: IndexMap<&String, Option<String>> = IndexMap::new();

        while finished.len() < total {
            info!(open = total - finished.len(), total, "Fetching batch states...");

            for (idx, job_id) in pending.iter().enumerate() {
                if finished.contains(*job_id) {
                    continue;
                }

                let batch = match self.provider.batch_status(job_id).await {
                    Ok(batch) => batch,
                    Err(e) => {
                        warn!(job_id = %job_id, error = %e, "Batch status query failed, will retry next sweep");
                        continue;
                    }
                };

                info!(
                    job_id = %job_id,
                    position = idx + 1,
                    total,
                    status = %batch.status,
                    "Batch status"
                );

                match batch.status {
                    BatchStatus::Completed => {
                        if batch.output_file_id.is_none() {
                            error!(job_id = %job_id, "Batch completed without an output file");
                        }
                        outcomes.insert(*job_id, batch.output_file_id);
                        finished.insert(*job_id);
                    }
                    BatchStatus::Failed | BatchStatus::Expired | BatchStatus::Cancelled => {
                        error!(job_id = %job_id, status = %batch.status, "Batch ended without output");
                        outcomes.insert(*job_id, None);
                        finished.insert(*job_id);
                    }
                    _ => {}
                }
            }

            if finished.len() < total {
                tokio::time::sleep(poll_interval).await;
            }
        }

        pending
            .into_iter()
            .map(|id| (id.clone(), outcomes.swap_remove(id).flatten()))
            .collect()
    }
}
