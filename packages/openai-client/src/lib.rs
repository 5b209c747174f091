//! Pure OpenAI REST API client
//!
//! A clean, minimal client for the parts of the OpenAI API used for
//! asynchronous bulk inference: the Files API and the Batches API, plus the
//! request/response shapes of the `/v1/responses` endpoint that batch lines
//! target.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{CreateBatchRequest, FilePurpose, OpenAIClient};
//!
//! let client = OpenAIClient::from_env()?;
//!
//! let file = client.upload_file("batchinput.jsonl", FilePurpose::Batch).await?;
//! let batch = client
//!     .create_batch(CreateBatchRequest::new(&file.id, "/v1/responses").description("nightly"))
//!     .await?;
//!
//! let batch = client.retrieve_batch(&batch.id).await?;
//! if let Some(output) = batch.output_file_id {
//!     let bytes = client.file_content(&output).await?;
//! }
//! ```

pub mod error;
pub mod schema;
pub mod types;

pub use error::{OpenAIError, Result};
pub use schema::StructuredOutput;
pub use types::*;

use std::path::Path;

use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Pure OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAIError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Files
    // =========================================================================

    /// Upload a local file.
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        purpose: FilePurpose,
    ) -> Result<FileObject> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.jsonl")
            .to_string();

        self.upload_bytes(bytes, filename, purpose).await
    }

    /// Upload in-memory content as a file.
    pub async fn upload_bytes(
        &self,
        bytes: Vec<u8>,
        filename: impl Into<String>,
        purpose: FilePurpose,
    ) -> Result<FileObject> {
        let size = bytes.len();
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.into())
            .mime_str("application/jsonl")
            .map_err(|e| OpenAIError::Config(format!("Invalid upload MIME type: {}", e)))?;
        let form = multipart::Form::new()
            .text("purpose", purpose.as_str())
            .part("file", part);

        let response = self
            .http_client
            .post(format!("{}/files", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI file upload failed");
                OpenAIError::Network(e.to_string())
            })?;

        let file: FileObject = Self::parse_json(response, "file upload").await?;
        debug!(file_id = %file.id, bytes = size, "Uploaded file");
        Ok(file)
    }

    /// Download the raw content of a file.
    pub async fn file_content(&self, file_id: &str) -> Result<Vec<u8>> {
        let response = self
            .http_client
            .get(format!("{}/files/{}/content", self.base_url, file_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| OpenAIError::Network(e.to_string()))?;

        let response = Self::check_status(response, "file content").await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| OpenAIError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    /// List files stored at the provider.
    pub async fn list_files(&self) -> Result<Vec<FileObject>> {
        let response = self
            .http_client
            .get(format!("{}/files", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| OpenAIError::Network(e.to_string()))?;

        let list: ListResponse<FileObject> = Self::parse_json(response, "list files").await?;
        Ok(list.data)
    }

    /// Delete a file.
    pub async fn delete_file(&self, file_id: &str) -> Result<DeletedFile> {
        let response = self
            .http_client
            .delete(format!("{}/files/{}", self.base_url, file_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| OpenAIError::Network(e.to_string()))?;

        Self::parse_json(response, "delete file").await
    }

    // =========================================================================
    // Batches
    // =========================================================================

    /// Open a batch job over an uploaded input file.
    pub async fn create_batch(&self, request: CreateBatchRequest) -> Result<Batch> {
        let response = self
            .http_client
            .post(format!("{}/batches", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI batch create failed");
                OpenAIError::Network(e.to_string())
            })?;

        let batch: Batch = Self::parse_json(response, "create batch").await?;
        debug!(batch_id = %batch.id, status = %batch.status, "Created batch");
        Ok(batch)
    }

    /// Fetch the current state of a batch.
    pub async fn retrieve_batch(&self, batch_id: &str) -> Result<Batch> {
        let response = self
            .http_client
            .get(format!("{}/batches/{}", self.base_url, batch_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| OpenAIError::Network(e.to_string()))?;

        Self::parse_json(response, "retrieve batch").await
    }

    /// List the most recent batches.
    pub async fn list_batches(&self, limit: u32) -> Result<Vec<Batch>> {
        let response = self
            .http_client
            .get(format!("{}/batches", self.base_url))
            .bearer_auth(&self.api_key)
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|e| OpenAIError::Network(e.to_string()))?;

        let list: ListResponse<Batch> = Self::parse_json(response, "list batches").await?;
        Ok(list.data)
    }

    /// Cancel a running batch.
    pub async fn cancel_batch(&self, batch_id: &str) -> Result<Batch> {
        let response = self
            .http_client
            .post(format!("{}/batches/{}/cancel", self.base_url, batch_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| OpenAIError::Network(e.to_string()))?;

        Self::parse_json(response, "cancel batch").await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn check_status(response: Response, operation: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        warn!(status = %status, error = %error_text, operation, "OpenAI API error");
        Err(OpenAIError::Api {
            status: status.as_u16(),
            message: format!("{} failed: {}", operation, error_text),
        })
    }

    async fn parse_json<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T> {
        let response = Self::check_status(response, operation).await?;
        response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(format!("{} response: {}", operation, e)))
    }
}
