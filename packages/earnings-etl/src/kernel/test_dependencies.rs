// TestDependencies - in-memory implementations for testing
//
// Provides fake stores and a scripted batch provider that can be injected into
// the collector and the sentiment processor for tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use openai_client::{BatchStatus, OpenAIError};
use serde_json::json;

use super::{
    BaseArticleStore, BaseBatchProvider, BaseBodyFetcher, BaseCompanyDirectory,
    BaseEarningsCalendar, BaseNewsSource, NewsDeps, NewsItem, ProviderBatch, ProviderFile,
    SentimentDeps,
};
use crate::domains::companies::Company;
use crate::domains::earnings::EarningsEvent;
use crate::domains::news::models::{Article, ArticleId, NewArticle};
use crate::error::{PipelineError, Result};

fn network_error(message: impl Into<String>) -> PipelineError {
    PipelineError::Provider(OpenAIError::Network(message.into()))
}

fn not_found(what: &str, id: &str) -> PipelineError {
    PipelineError::Provider(OpenAIError::Api {
        status: 404,
        message: format!("No such {}: {}", what, id),
    })
}

// =============================================================================
// Batch output line helpers
// =============================================================================

/// A well-formed 200 output line carrying the given assessment.
pub fn success_line(custom_id: &str, score: f64, reasoning: &str) -> String {
    let text = json!({ "reasoning_process": reasoning, "sentiment_score": score }).to_string();
    response_line(custom_id, 200, &text)
}

/// An output line whose model text is `text`, verbatim.
pub fn response_line(custom_id: &str, status_code: u16, text: &str) -> String {
    json!({
        "id": format!("batch_req_{}", custom_id),
        "custom_id": custom_id,
        "response": {
            "status_code": status_code,
            "request_id": format!("req_{}", custom_id),
            "body": {
                "output": [
                    { "type": "reasoning", "content": [] },
                    {
                        "type": "message",
                        "content": [{ "type": "output_text", "text": text }]
                    }
                ]
            }
        },
        "error": null
    })
    .to_string()
}

/// A line for a request the provider rejected without a response.
pub fn error_line(custom_id: &str, code: &str) -> String {
    json!({
        "id": format!("batch_req_{}", custom_id),
        "custom_id": custom_id,
        "response": null,
        "error": { "code": code, "message": "request failed" }
    })
    .to_string()
}

// =============================================================================
// Mock Batch Provider
// =============================================================================

#[derive(Debug, Clone)]
struct MockBatch {
    id: String,
    input_file_id: String,
    description: String,
    status: BatchStatus,
    output_file_id: Option<String>,
}

impl MockBatch {
    fn snapshot(&self) -> ProviderBatch {
        ProviderBatch {
            id: self.id.clone(),
            status: self.status,
            input_file_id: self.input_file_id.clone(),
            output_file_id: self.output_file_id.clone(),
        }
    }
}

#[derive(Default)]
struct ProviderState {
    files: Vec<(ProviderFile, Vec<u8>)>,
    batches: Vec<MockBatch>,
    /// Status sequences keyed by batch creation order
    scripts: HashMap<usize, VecDeque<BatchStatus>>,
    /// Raw output content keyed by batch creation order
    outputs: HashMap<usize, String>,
    /// Batches that complete without an output file
    no_output: HashSet<usize>,
    /// Batches whose output file id points at nothing
    unavailable_output: HashSet<usize>,
    fail_uploads_from: Option<usize>,
    fail_status_queries: usize,
    fail_deletes: HashSet<String>,
    score: f64,
    uploads: usize,
    status_queries: Vec<String>,
    cancelled: Vec<String>,
    deleted: Vec<String>,
}

/// Scripted stand-in for the provider's Files and Batches APIs.
///
/// Completed batches get an output file generated from their input: one
/// well-formed 200 line per request, scored with `with_score`.
pub struct MockBatchProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl MockBatchProvider {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ProviderState {
                score: 0.5,
                ..Default::default()
            })),
        }
    }

    /// Score written into generated output lines
    pub fn with_score(self, score: f64) -> Self {
        self.state.lock().unwrap().score = score;
        self
    }

    /// Statuses returned by successive polls of the `index`-th created batch.
    /// Once exhausted, a non-terminal batch completes.
    pub fn with_statuses(self, index: usize, statuses: Vec<BatchStatus>) -> Self {
        self.state
            .lock()
            .unwrap()
            .scripts
            .insert(index, statuses.into());
        self
    }

    /// Raw output content for the `index`-th created batch
    pub fn with_output(self, index: usize, content: impl Into<String>) -> Self {
        self.state
            .lock()
            .unwrap()
            .outputs
            .insert(index, content.into());
        self
    }

    /// The `index`-th batch completes without an output file id
    pub fn without_output(self, index: usize) -> Self {
        self.state.lock().unwrap().no_output.insert(index);
        self
    }

    /// The `index`-th batch completes with an output file that cannot be downloaded
    pub fn with_unavailable_output(self, index: usize) -> Self {
        self.state.lock().unwrap().unavailable_output.insert(index);
        self
    }

    /// Uploads fail from the `index`-th call onwards (0-based)
    pub fn fail_uploads_from(self, index: usize) -> Self {
        self.state.lock().unwrap().fail_uploads_from = Some(index);
        self
    }

    /// The next `count` status queries fail with a network error
    pub fn fail_status_queries(self, count: usize) -> Self {
        self.state.lock().unwrap().fail_status_queries = count;
        self
    }

    /// Seed a batch that already exists at the provider
    pub fn with_existing_batch(self, id: &str, status: BatchStatus) -> Self {
        self.state.lock().unwrap().batches.push(MockBatch {
            id: id.to_string(),
            input_file_id: String::new(),
            description: String::new(),
            status,
            output_file_id: None,
        });
        self
    }

    /// Seed a file that already exists at the provider
    pub fn with_existing_file(self, id: &str) -> Self {
        self.state.lock().unwrap().files.push((
            ProviderFile {
                id: id.to_string(),
                filename: format!("{}.jsonl", id),
            },
            Vec::new(),
        ));
        self
    }

    pub fn fail_delete(self, file_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .fail_deletes
            .insert(file_id.to_string());
        self
    }

    /// Descriptions of created batches, in creation order
    pub fn batch_descriptions(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .batches
            .iter()
            .filter(|b| !b.input_file_id.is_empty())
            .map(|b| b.description.clone())
            .collect()
    }

    /// Parsed request lines of every uploaded input file
    pub fn uploaded_requests(&self) -> Vec<serde_json::Value> {
        self.state
            .lock()
            .unwrap()
            .files
            .iter()
            .filter(|(file, _)| file.filename.starts_with("batchinput"))
            .flat_map(|(_, bytes)| {
                String::from_utf8_lossy(bytes)
                    .lines()
                    .filter_map(|line| serde_json::from_str(line).ok())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn status_queries(&self) -> Vec<String> {
        self.state.lock().unwrap().status_queries.clone()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.state.lock().unwrap().cancelled.clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn file_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .files
            .iter()
            .map(|(f, _)| f.id.clone())
            .collect()
    }
}

impl Default for MockBatchProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderState {
    fn generated_output(&self, input_file_id: &str) -> String {
        let input = self
            .files
            .iter()
            .find(|(f, _)| f.id == input_file_id)
            .map(|(_, bytes)| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default();

        input
            .lines()
            .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
            .filter_map(|request| request["custom_id"].as_str().map(str::to_string))
            .map(|custom_id| {
                success_line(
                    &custom_id,
                    self.score,
                    &format!("Mock reasoning for {}", custom_id),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn complete(&mut self, index: usize) {
        let batch_id = self.batches[index].id.clone();
        let input_file_id = self.batches[index].input_file_id.clone();
        let output_file_id = format!("file-output-{}", batch_id);

        if self.no_output.contains(&index) {
            return;
        }
        if !self.unavailable_output.contains(&index) {
            let content = self
                .outputs
                .get(&index)
                .cloned()
                .unwrap_or_else(|| self.generated_output(&input_file_id));
            self.files.push((
                ProviderFile {
                    id: output_file_id.clone(),
                    filename: format!("batch_{}_output.jsonl", batch_id),
                },
                content.into_bytes(),
            ));
        }
        self.batches[index].output_file_id = Some(output_file_id);
    }
}

#[async_trait]
impl BaseBatchProvider for MockBatchProvider {
    async fn upload_batch_file(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let mut state = self.state.lock().unwrap();

        let call = state.uploads;
        state.uploads += 1;
        if state.fail_uploads_from.is_some_and(|from| call >= from) {
            return Err(network_error("upload connection reset"));
        }

        let id = format!("file-input-{}", call);
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.jsonl")
            .to_string();
        state.files.push((
            ProviderFile {
                id: id.clone(),
                filename,
            },
            bytes,
        ));
        Ok(id)
    }

    async fn create_batch(
        &self,
        input_file_id: &str,
        endpoint: &str,
        description: &str,
    ) -> Result<ProviderBatch> {
        let mut state = self.state.lock().unwrap();
        if endpoint != "/v1/responses" {
            return Err(PipelineError::Provider(OpenAIError::Api {
                status: 400,
                message: format!("unsupported endpoint {}", endpoint),
            }));
        }

        let batch = MockBatch {
            id: format!("batch-{}", state.batches.len()),
            input_file_id: input_file_id.to_string(),
            description: description.to_string(),
            status: BatchStatus::Validating,
            output_file_id: None,
        };
        let snapshot = batch.snapshot();
        state.batches.push(batch);
        Ok(snapshot)
    }

    async fn batch_status(&self, batch_id: &str) -> Result<ProviderBatch> {
        let mut state = self.state.lock().unwrap();
        state.status_queries.push(batch_id.to_string());

        if state.fail_status_queries > 0 {
            state.fail_status_queries -= 1;
            return Err(network_error("status query timed out"));
        }

        let index = state
            .batches
            .iter()
            .position(|b| b.id == batch_id)
            .ok_or_else(|| not_found("batch", batch_id))?;

        let next = match state.scripts.get_mut(&index).and_then(VecDeque::pop_front) {
            Some(status) => status,
            None if state.batches[index].status.is_terminal() => state.batches[index].status,
            None => BatchStatus::Completed,
        };
        let was_completed = state.batches[index].status == BatchStatus::Completed;
        state.batches[index].status = next;
        if next == BatchStatus::Completed && !was_completed {
            state.complete(index);
        }

        Ok(state.batches[index].snapshot())
    }

    async fn file_content(&self, file_id: &str) -> Result<Vec<u8>> {
        let state = self.state.lock().unwrap();
        state
            .files
            .iter()
            .find(|(f, _)| f.id == file_id)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| not_found("file", file_id))
    }

    async fn list_batches(&self) -> Result<Vec<ProviderBatch>> {
        let state = self.state.lock().unwrap();
        Ok(state.batches.iter().map(MockBatch::snapshot).collect())
    }

    async fn cancel_batch(&self, batch_id: &str) -> Result<ProviderBatch> {
        let mut state = self.state.lock().unwrap();
        state.cancelled.push(batch_id.to_string());
        let batch = state
            .batches
            .iter_mut()
            .find(|b| b.id == batch_id)
            .ok_or_else(|| not_found("batch", batch_id))?;
        batch.status = BatchStatus::Cancelling;
        Ok(batch.snapshot())
    }

    async fn list_files(&self) -> Result<Vec<ProviderFile>> {
        let state = self.state.lock().unwrap();
        Ok(state.files.iter().map(|(f, _)| f.clone()).collect())
    }

    async fn delete_file(&self, file_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_deletes.contains(file_id) {
            return Err(network_error("delete failed"));
        }
        let before = state.files.len();
        state.files.retain(|(f, _)| f.id != file_id);
        if state.files.len() == before {
            return Err(not_found("file", file_id));
        }
        state.deleted.push(file_id.to_string());
        Ok(())
    }
}

// =============================================================================
// Memory Article Store
// =============================================================================

/// Article store backed by a vector, with ids assigned from 1.
pub struct MemoryArticleStore {
    articles: Arc<Mutex<Vec<Article>>>,
    failing_updates: Arc<Mutex<HashSet<ArticleId>>>,
    failing_reads: Arc<Mutex<HashSet<NaiveDate>>>,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self {
            articles: Arc::new(Mutex::new(Vec::new())),
            failing_updates: Arc::new(Mutex::new(HashSet::new())),
            failing_reads: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Add an unscored article and return its id
    pub fn add(&self, symbol: &str, date: NaiveDate, content: &str) -> ArticleId {
        let mut articles = self.articles.lock().unwrap();
        let id = articles.len() as ArticleId + 1;
        articles.push(Article {
            id,
            symbol: symbol.to_string(),
            date,
            headline: format!("{} headline {}", symbol, id),
            summary: format!("{} summary {}", symbol, id),
            content: Some(content.to_string()),
            source: Some("Yahoo".to_string()),
            url: Some(format!("https://news.test/{}/{}", symbol, id)),
            sentiment_score: None,
            sentiment_reasoning: None,
        });
        id
    }

    /// Updates for this id fail with a store error
    pub fn fail_updates_for(&self, id: ArticleId) {
        self.failing_updates.lock().unwrap().insert(id);
    }

    /// Reads for this date fail with a store error
    pub fn fail_reads_for(&self, date: NaiveDate) {
        self.failing_reads.lock().unwrap().insert(date);
    }

    pub fn get(&self, id: ArticleId) -> Option<Article> {
        self.articles
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    pub fn all(&self) -> Vec<Article> {
        self.articles.lock().unwrap().clone()
    }
}

impl Default for MemoryArticleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseArticleStore for MemoryArticleStore {
    async fn articles_for_date(&self, date: NaiveDate) -> Result<Vec<Article>> {
        if self.failing_reads.lock().unwrap().contains(&date) {
            return Err(PipelineError::Store(sqlx::Error::PoolTimedOut));
        }
        Ok(self
            .articles
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.date == date)
            .cloned()
            .collect())
    }

    async fn update_sentiment(&self, id: ArticleId, score: f64, reasoning: &str) -> Result<bool> {
        if self.failing_updates.lock().unwrap().contains(&id) {
            return Err(PipelineError::Store(sqlx::Error::PoolTimedOut));
        }
        let mut articles = self.articles.lock().unwrap();
        match articles.iter_mut().find(|a| a.id == id) {
            Some(article) => {
                article.sentiment_score = Some(score);
                article.sentiment_reasoning = Some(reasoning.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn url_exists(&self, url: &str) -> Result<bool> {
        Ok(self
            .articles
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.url.as_deref() == Some(url)))
    }

    async fn insert_articles(&self, new_articles: &[NewArticle]) -> Result<u64> {
        let mut articles = self.articles.lock().unwrap();
        let mut inserted = 0;
        for new in new_articles {
            let duplicate = new.url.is_some()
                && articles.iter().any(|a| a.url.is_some() && a.url == new.url);
            if duplicate {
                continue;
            }
            let id = articles.len() as ArticleId + 1;
            articles.push(Article {
                id,
                symbol: new.symbol.clone(),
                date: new.date,
                headline: new.headline.clone(),
                summary: new.summary.clone(),
                content: new.content.clone(),
                source: new.source.clone(),
                url: new.url.clone(),
                sentiment_score: None,
                sentiment_reasoning: None,
            });
            inserted += 1;
        }
        Ok(inserted)
    }
}

// =============================================================================
// Memory Company Directory
// =============================================================================

pub struct MemoryCompanyDirectory {
    companies: HashMap<String, Company>,
    failing: HashSet<String>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl MemoryCompanyDirectory {
    pub fn new() -> Self {
        Self {
            companies: HashMap::new(),
            failing: HashSet::new(),
            lookups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_company(mut self, symbol: &str, name: &str) -> Self {
        self.companies
            .insert(symbol.to_string(), Company::new(symbol, name));
        self
    }

    /// Lookups for `symbol` return a store error
    pub fn fail_lookup(mut self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_string());
        self
    }

    /// Symbols looked up so far
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl Default for MemoryCompanyDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseCompanyDirectory for MemoryCompanyDirectory {
    async fn company(&self, symbol: &str) -> Result<Option<Company>> {
        self.lookups.lock().unwrap().push(symbol.to_string());
        if self.failing.contains(symbol) {
            return Err(PipelineError::Store(sqlx::Error::PoolTimedOut));
        }
        Ok(self.companies.get(symbol).cloned())
    }
}

// =============================================================================
// Memory Earnings Calendar
// =============================================================================

pub struct MemoryEarningsCalendar {
    events: Vec<EarningsEvent>,
}

impl MemoryEarningsCalendar {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_event(mut self, symbol: &str, date: NaiveDate) -> Self {
        self.events.push(EarningsEvent {
            id: self.events.len() as i64 + 1,
            symbol: symbol.to_string(),
            date,
            eps_estimate: None,
            eps_actual: None,
            surprise: None,
        });
        self
    }
}

impl Default for MemoryEarningsCalendar {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseEarningsCalendar for MemoryEarningsCalendar {
    async fn events_for_date(&self, date: NaiveDate) -> Result<Vec<EarningsEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.date == date)
            .cloned()
            .collect())
    }
}

// =============================================================================
// Mock News Source
// =============================================================================

/// Arguments captured from a company news call
#[derive(Debug, Clone, PartialEq)]
pub struct NewsCall {
    pub symbol: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

pub struct MockNewsSource {
    items: HashMap<String, Vec<NewsItem>>,
    failing: HashSet<(String, NaiveDate)>,
    calls: Arc<Mutex<Vec<NewsCall>>>,
}

impl MockNewsSource {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            failing: HashSet::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_item(mut self, symbol: &str, date: NaiveDate, source: &str, url: &str) -> Self {
        let item = NewsItem {
            date,
            headline: format!("{} news at {}", symbol, url),
            summary: format!("Summary of {}", url),
            source: source.to_string(),
            url: url.to_string(),
        };
        self.items.entry(symbol.to_string()).or_default().push(item);
        self
    }

    /// Calls for `symbol` whose range starts at `from` fail
    pub fn fail_window(mut self, symbol: &str, from: NaiveDate) -> Self {
        self.failing.insert((symbol.to_string(), from));
        self
    }

    pub fn calls(&self) -> Vec<NewsCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockNewsSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseNewsSource for MockNewsSource {
    async fn company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NewsItem>> {
        self.calls.lock().unwrap().push(NewsCall {
            symbol: symbol.to_string(),
            from,
            to,
        });

        if self.failing.contains(&(symbol.to_string(), from)) {
            return Err(PipelineError::News(format!("news feed unavailable for {}", symbol)));
        }

        Ok(self
            .items
            .get(symbol)
            .map(|items| {
                items
                    .iter()
                    .filter(|i| from <= i.date && i.date <= to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

// =============================================================================
// Mock Body Fetcher
// =============================================================================

pub struct MockBodyFetcher {
    redirects: HashMap<String, String>,
    bodies: HashMap<String, String>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl MockBodyFetcher {
    pub fn new() -> Self {
        Self {
            redirects: HashMap::new(),
            bodies: HashMap::new(),
            fetched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    /// URLs whose body was requested
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl Default for MockBodyFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseBodyFetcher for MockBodyFetcher {
    async fn resolve_url(&self, url: &str) -> Result<String> {
        Ok(self
            .redirects
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_string()))
    }

    async fn fetch_body(&self, url: &str) -> Result<String> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| PipelineError::News(format!("404 fetching {}", url)))
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundle of fakes that builds the pipeline's dependency sets.
pub struct TestDependencies {
    pub articles: Arc<MemoryArticleStore>,
    pub companies: Arc<MemoryCompanyDirectory>,
    pub provider: Arc<MockBatchProvider>,
    pub calendar: Arc<MemoryEarningsCalendar>,
    pub news: Arc<MockNewsSource>,
    pub bodies: Arc<MockBodyFetcher>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            articles: Arc::new(MemoryArticleStore::new()),
            companies: Arc::new(MemoryCompanyDirectory::new()),
            provider: Arc::new(MockBatchProvider::new()),
            calendar: Arc::new(MemoryEarningsCalendar::new()),
            news: Arc::new(MockNewsSource::new()),
            bodies: Arc::new(MockBodyFetcher::new()),
        }
    }

    pub fn mock_companies(mut self, companies: MemoryCompanyDirectory) -> Self {
        self.companies = Arc::new(companies);
        self
    }

    pub fn mock_provider(mut self, provider: MockBatchProvider) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    pub fn mock_calendar(mut self, calendar: MemoryEarningsCalendar) -> Self {
        self.calendar = Arc::new(calendar);
        self
    }

    pub fn mock_news(mut self, news: MockNewsSource) -> Self {
        self.news = Arc::new(news);
        self
    }

    pub fn mock_bodies(mut self, bodies: MockBodyFetcher) -> Self {
        self.bodies = Arc::new(bodies);
        self
    }

    pub fn sentiment_deps(&self) -> SentimentDeps {
        SentimentDeps::new(
            self.articles.clone(),
            self.companies.clone(),
            self.provider.clone(),
        )
    }

    pub fn news_deps(&self) -> NewsDeps {
        NewsDeps::new(
            self.calendar.clone(),
            self.articles.clone(),
            self.news.clone(),
            self.bodies.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
