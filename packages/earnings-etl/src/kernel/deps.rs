//! Pipeline dependencies (using traits for testability)
//!
//! This module provides the dependency bundles handed to the news collector
//! and the sentiment processor. All external services sit behind trait
//! objects so tests can swap in the fakes from `test_dependencies`.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use openai_client::{Batch, CreateBatchRequest, FilePurpose, OpenAIClient};

use crate::error::Result;
use crate::kernel::{
    BaseArticleStore, BaseBatchProvider, BaseBodyFetcher, BaseCompanyDirectory,
    BaseEarningsCalendar, BaseNewsSource, ProviderBatch, ProviderFile,
};

/// Page size used when listing batches for cleanup.
const LIST_BATCHES_LIMIT: u32 = 100;

// =============================================================================
// OpenAIClient Adapter (implements BaseBatchProvider trait)
// =============================================================================

/// Wrapper around OpenAIClient that implements BaseBatchProvider trait
pub struct OpenAIBatchProvider(pub Arc<OpenAIClient>);

impl OpenAIBatchProvider {
    pub fn new(client: Arc<OpenAIClient>) -> Self {
        Self(client)
    }
}

impl From<Batch> for ProviderBatch {
    fn from(batch: Batch) -> Self {
        Self {
            id: batch.id,
            status: batch.status,
            input_file_id: batch.input_file_id,
            output_file_id: batch.output_file_id,
        }
    }
}

#[async_trait]
impl BaseBatchProvider for OpenAIBatchProvider {
    async fn upload_batch_file(&self, path: &Path) -> Result<String> {
        let file = self.0.upload_file(path, FilePurpose::Batch).await?;
        Ok(file.id)
    }

    async fn create_batch(
        &self,
        input_file_id: &str,
        endpoint: &str,
        description: &str,
    ) -> Result<ProviderBatch> {
        let request = CreateBatchRequest::new(input_file_id, endpoint).description(description);
        Ok(self.0.create_batch(request).await?.into())
    }

    async fn batch_status(&self, batch_id: &str) -> Result<ProviderBatch> {
        Ok(self.0.retrieve_batch(batch_id).await?.into())
    }

    async fn file_content(&self, file_id: &str) -> Result<Vec<u8>> {
        Ok(self.0.file_content(file_id).await?)
    }

    async fn list_batches(&self) -> Result<Vec<ProviderBatch>> {
        let batches = self.0.list_batches(LIST_BATCHES_LIMIT).await?;
        Ok(batches.into_iter().map(Into::into).collect())
    }

    async fn cancel_batch(&self, batch_id: &str) -> Result<ProviderBatch> {
        Ok(self.0.cancel_batch(batch_id).await?.into())
    }

    async fn list_files(&self) -> Result<Vec<ProviderFile>> {
        let files = self.0.list_files().await?;
        Ok(files
            .into_iter()
            .map(|f| ProviderFile {
                id: f.id,
                filename: f.filename,
            })
            .collect())
    }

    async fn delete_file(&self, file_id: &str) -> Result<()> {
        self.0.delete_file(file_id).await?;
        Ok(())
    }
}

// =============================================================================
// SentimentDeps
// =============================================================================

/// Dependencies for batch sentiment scoring
#[derive(Clone)]
pub struct SentimentDeps {
    pub articles: Arc<dyn BaseArticleStore>,
    pub companies: Arc<dyn BaseCompanyDirectory>,
    pub provider: Arc<dyn BaseBatchProvider>,
}

impl SentimentDeps {
    pub fn new(
        articles: Arc<dyn BaseArticleStore>,
        companies: Arc<dyn BaseCompanyDirectory>,
        provider: Arc<dyn BaseBatchProvider>,
    ) -> Self {
        Self {
            articles,
            companies,
            provider,
        }
    }
}

// =============================================================================
// NewsDeps
// =============================================================================

/// Dependencies for pre-earnings news collection
#[derive(Clone)]
pub struct NewsDeps {
    pub calendar: Arc<dyn BaseEarningsCalendar>,
    pub articles: Arc<dyn BaseArticleStore>,
    pub news: Arc<dyn BaseNewsSource>,
    pub bodies: Arc<dyn BaseBodyFetcher>,
}

impl NewsDeps {
    pub fn new(
        calendar: Arc<dyn BaseEarningsCalendar>,
        articles: Arc<dyn BaseArticleStore>,
        news: Arc<dyn BaseNewsSource>,
        bodies: Arc<dyn BaseBodyFetcher>,
    ) -> Self {
        Self {
            calendar,
            articles,
            news,
            bodies,
        }
    }
}
