//! OpenAI API request and response types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Files
// =============================================================================

/// Purpose tag attached to an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilePurpose {
    Batch,
    BatchOutput,
    Assistants,
    FineTune,
    #[serde(other)]
    Other,
}

impl FilePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilePurpose::Batch => "batch",
            FilePurpose::BatchOutput => "batch_output",
            FilePurpose::Assistants => "assistants",
            FilePurpose::FineTune => "fine-tune",
            FilePurpose::Other => "other",
        }
    }
}

/// A file stored at the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct FileObject {
    pub id: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub filename: String,
    pub purpose: FilePurpose,
}

/// Response to a file deletion.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletedFile {
    pub id: String,
    pub deleted: bool,
}

// =============================================================================
// Batches
// =============================================================================

/// Provider-side lifecycle of a batch.
///
/// Terminal states are `completed`, `failed`, `expired` and `cancelled`.
/// Statuses this client does not know about deserialize to `Unknown` and are
/// treated as still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Validating,
    InProgress,
    Finalizing,
    Cancelling,
    Completed,
    Failed,
    Expired,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl BatchStatus {
    /// No further transition can happen from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BatchStatus::Completed
                | BatchStatus::Failed
                | BatchStatus::Expired
                | BatchStatus::Cancelled
        )
    }

    /// The batch is actively being worked on and can still be cancelled.
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            BatchStatus::Validating | BatchStatus::InProgress | BatchStatus::Finalizing
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Validating => "validating",
            BatchStatus::InProgress => "in_progress",
            BatchStatus::Finalizing => "finalizing",
            BatchStatus::Cancelling => "cancelling",
            BatchStatus::Completed => "completed",
            BatchStatus::Failed => "failed",
            BatchStatus::Expired => "expired",
            BatchStatus::Cancelled => "cancelled",
            BatchStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request counters reported on a batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchRequestCounts {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub failed: u64,
}

/// A batch job as reported by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Batch {
    pub id: String,
    pub status: BatchStatus,
    pub input_file_id: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub completion_window: String,
    #[serde(default)]
    pub output_file_id: Option<String>,
    #[serde(default)]
    pub error_file_id: Option<String>,
    #[serde(default)]
    pub request_counts: Option<BatchRequestCounts>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

/// Batch creation request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateBatchRequest {
    /// Id of an uploaded file with purpose `batch`
    pub input_file_id: String,

    /// Target endpoint every request line is sent to (e.g., "/v1/responses")
    pub endpoint: String,

    /// Service-level completion target; the API only accepts "24h"
    pub completion_window: String,

    /// Free-text metadata
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl CreateBatchRequest {
    pub const COMPLETION_WINDOW_24H: &'static str = "24h";

    /// Create a request with the 24h completion window.
    pub fn new(input_file_id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            input_file_id: input_file_id.into(),
            endpoint: endpoint.into(),
            completion_window: Self::COMPLETION_WINDOW_24H.to_string(),
            metadata: HashMap::new(),
        }
    }

    /// Attach a `description` metadata entry.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.metadata
            .insert("description".to_string(), description.into());
        self
    }
}

/// Paginated list envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub last_id: Option<String>,
}

// =============================================================================
// Batch input / output lines
// =============================================================================

/// One line of a batch input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequestLine<B> {
    pub custom_id: String,
    pub method: String,
    pub url: String,
    pub body: B,
}

impl<B> BatchRequestLine<B> {
    /// A POST request line against `url`.
    pub fn post(custom_id: impl Into<String>, url: impl Into<String>, body: B) -> Self {
        Self {
            custom_id: custom_id.into(),
            method: "POST".to_string(),
            url: url.into(),
            body,
        }
    }
}

/// One line of a batch output file.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchOutputLine {
    #[serde(default)]
    pub id: Option<String>,
    pub custom_id: String,
    #[serde(default)]
    pub response: Option<BatchLineResponse>,
    #[serde(default)]
    pub error: Option<BatchLineError>,
}

/// Embedded HTTP response of a single batch request.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchLineResponse {
    pub status_code: u16,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub body: serde_json::Value,
}

/// Provider error for a request that produced no response.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchLineError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Responses API
// =============================================================================

/// Request body for `/v1/responses`.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    /// Model to use (e.g., "gpt-5-mini")
    pub model: String,

    /// Prompt text
    pub input: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningConfig>,
}

impl ResponsesRequest {
    pub fn new(model: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            temperature: None,
            text: None,
            reasoning: None,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Request strict JSON-schema output.
    pub fn json_schema(mut self, name: impl Into<String>, schema: serde_json::Value) -> Self {
        self.text = Some(TextConfig {
            format: TextFormat::JsonSchema {
                name: name.into(),
                schema,
                strict: true,
            },
        });
        self
    }

    pub fn reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning = Some(ReasoningConfig { effort });
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TextConfig {
    pub format: TextFormat,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextFormat {
    Text,
    JsonSchema {
        name: String,
        schema: serde_json::Value,
        strict: bool,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ReasoningConfig {
    pub effort: ReasoningEffort,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    High,
}

/// Body of a `/v1/responses` result.
///
/// Only the fields needed to reach the model's text are modelled; reasoning
/// items and other output kinds are kept but ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseBody {
    #[serde(default)]
    pub output: Vec<ResponseOutputItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseOutputItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Vec<ResponseContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseContent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl ResponseBody {
    /// Text of the first `output_text` part of the first `message` item.
    pub fn output_text(&self) -> Option<&str> {
        self.output
            .iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content.iter())
            .find(|part| part.kind == "output_text")
            .and_then(|part| part.text.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_batch_status_terminal_states() {
        assert!(BatchStatus::Completed.is_terminal());
        assert!(BatchStatus::Failed.is_terminal());
        assert!(BatchStatus::Expired.is_terminal());
        assert!(BatchStatus::Cancelled.is_terminal());
        assert!(!BatchStatus::Validating.is_terminal());
        assert!(!BatchStatus::Cancelling.is_terminal());
        assert!(!BatchStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_unknown_status_deserializes() {
        let status: BatchStatus = serde_json::from_value(json!("paused")).unwrap();
        assert_eq!(status, BatchStatus::Unknown);

        let status: BatchStatus = serde_json::from_value(json!("in_progress")).unwrap();
        assert_eq!(status, BatchStatus::InProgress);
    }

    #[test]
    fn test_create_batch_request_serialization() {
        let req = CreateBatchRequest::new("file-abc", "/v1/responses")
            .description("Sentiment analysis for 2024-02-28");
        let value = serde_json::to_value(&req).unwrap();

        assert_eq!(value["input_file_id"], "file-abc");
        assert_eq!(value["endpoint"], "/v1/responses");
        assert_eq!(value["completion_window"], "24h");
        assert_eq!(
            value["metadata"]["description"],
            "Sentiment analysis for 2024-02-28"
        );
    }

    #[test]
    fn test_responses_request_json_schema_format() {
        let req = ResponsesRequest::new("gpt-5-mini", "prompt")
            .temperature(1.0)
            .json_schema("sentiment_analysis", json!({"type": "object"}))
            .reasoning_effort(ReasoningEffort::Low);
        let value = serde_json::to_value(&req).unwrap();

        assert_eq!(value["text"]["format"]["type"], "json_schema");
        assert_eq!(value["text"]["format"]["name"], "sentiment_analysis");
        assert_eq!(value["text"]["format"]["strict"], true);
        assert_eq!(value["reasoning"]["effort"], "low");
    }

    #[test]
    fn test_output_text_skips_reasoning_items() {
        let body: ResponseBody = serde_json::from_value(json!({
            "output": [
                {"type": "reasoning", "summary": []},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "{\"a\":1}"}
                ]}
            ]
        }))
        .unwrap();

        assert_eq!(body.output_text(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_output_text_missing() {
        let body: ResponseBody =
            serde_json::from_value(json!({"output": [{"type": "reasoning"}]})).unwrap();
        assert_eq!(body.output_text(), None);
    }
}
