// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Batch building, polling and reconciliation are domain code that uses these traits.
//
// Naming convention: Base* for trait names (e.g., BaseArticleStore, BaseBatchProvider)

use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use openai_client::BatchStatus;

use crate::domains::companies::Company;
use crate::domains::earnings::EarningsEvent;
use crate::domains::news::models::{Article, ArticleId, NewArticle};
use crate::error::Result;

// =============================================================================
// Article Store Trait (Infrastructure - relational store)
// =============================================================================

#[async_trait]
pub trait BaseArticleStore: Send + Sync {
    /// All articles published on `date`
    async fn articles_for_date(&self, date: NaiveDate) -> Result<Vec<Article>>;

    /// Write score and reasoning together. `false` means no article has this id.
    async fn update_sentiment(&self, id: ArticleId, score: f64, reasoning: &str) -> Result<bool>;

    /// Whether an article with this URL is already stored
    async fn url_exists(&self, url: &str) -> Result<bool>;

    /// Store new articles, ignoring ones whose URL exists. Returns rows written.
    async fn insert_articles(&self, articles: &[NewArticle]) -> Result<u64>;
}

// =============================================================================
// Company Directory Trait
// =============================================================================

#[async_trait]
pub trait BaseCompanyDirectory: Send + Sync {
    async fn company(&self, symbol: &str) -> Result<Option<Company>>;
}

// =============================================================================
// Earnings Calendar Trait
// =============================================================================

#[async_trait]
pub trait BaseEarningsCalendar: Send + Sync {
    async fn events_for_date(&self, date: NaiveDate) -> Result<Vec<EarningsEvent>>;
}

// =============================================================================
// Batch Provider Trait (Infrastructure - asynchronous bulk inference)
// =============================================================================

/// Provider-side view of a batch job
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderBatch {
    pub id: String,
    pub status: BatchStatus,
    pub input_file_id: String,
    pub output_file_id: Option<String>,
}

/// A file stored at the provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderFile {
    pub id: String,
    pub filename: String,
}

#[async_trait]
pub trait BaseBatchProvider: Send + Sync {
    /// Upload a JSONL request file with purpose `batch`, returning its file id
    async fn upload_batch_file(&self, path: &Path) -> Result<String>;

    /// Create a batch over an uploaded file with a 24h completion window
    async fn create_batch(
        &self,
        input_file_id: &str,
        endpoint: &str,
        description: &str,
    ) -> Result<ProviderBatch>;

    async fn batch_status(&self, batch_id: &str) -> Result<ProviderBatch>;

    /// Full content of a provider file
    async fn file_content(&self, file_id: &str) -> Result<Vec<u8>>;

    async fn list_batches(&self) -> Result<Vec<ProviderBatch>>;

    async fn cancel_batch(&self, batch_id: &str) -> Result<ProviderBatch>;

    async fn list_files(&self) -> Result<Vec<ProviderFile>>;

    async fn delete_file(&self, file_id: &str) -> Result<()>;
}

// =============================================================================
// News Source Trait (Infrastructure - company news feed)
// =============================================================================

/// A candidate article as listed by the news feed
#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub date: NaiveDate,
    pub headline: String,
    pub summary: String,
    pub source: String,
    pub url: String,
}

#[async_trait]
pub trait BaseNewsSource: Send + Sync {
    /// Articles about `symbol` published between `from` and `to`, inclusive
    async fn company_news(&self, symbol: &str, from: NaiveDate, to: NaiveDate)
        -> Result<Vec<NewsItem>>;
}

// =============================================================================
// Article Body Fetcher Trait (Infrastructure - page download + text extraction)
// =============================================================================

#[async_trait]
pub trait BaseBodyFetcher: Send + Sync {
    /// Follow one redirect hop to the publisher's URL
    async fn resolve_url(&self, url: &str) -> Result<String>;

    /// Download a page and return its readable text
    async fn fetch_body(&self, url: &str) -> Result<String>;
}
