//! Batch request files.
//!
//! One JSONL file per calendar date, one `/v1/responses` request per article.
//! Each request is tagged `article-{id}` so its result can be routed back.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use openai_client::{BatchRequestLine, ReasoningEffort, ResponsesRequest, StructuredOutput};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::prompt::{build_prompt, SentimentAssessment, SCHEMA_NAME};
use crate::domains::news::models::{Article, ArticleId};
use crate::error::{PipelineError, Result};
use crate::kernel::{BaseCompanyDirectory, RESPONSES_ENDPOINT};

const CUSTOM_ID_PREFIX: &str = "article-";

/// Correlation tag carried by a batch request and its result line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomId(pub ArticleId);

impl fmt::Display for CustomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CUSTOM_ID_PREFIX, self.0)
    }
}

impl FromStr for CustomId {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        s.strip_prefix(CUSTOM_ID_PREFIX)
            .and_then(|id| id.parse().ok())
            .map(CustomId)
            .ok_or_else(|| PipelineError::InvalidCustomId(s.to_string()))
    }
}

/// A request file written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchInputFile {
    pub path: PathBuf,
    pub request_count: usize,
    pub custom_ids: Vec<CustomId>,
}

/// Writes batch request files for a set of articles.
pub struct BatchInputBuilder {
    companies: Arc<dyn BaseCompanyDirectory>,
    model: String,
}

impl BatchInputBuilder {
    pub fn new(companies: Arc<dyn BaseCompanyDirectory>, model: impl Into<String>) -> Self {
        Self {
            companies,
            model: model.into(),
        }
    }

    /// Write one request line per distinct article to `path`.
    pub async fn build(&self, articles: &[Article], path: &Path) -> Result<BatchInputFile> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let schema = SentimentAssessment::openai_schema();
        let mut names: HashMap<String, String> = HashMap::new();
        let mut seen: HashSet<ArticleId> = HashSet::new();
        let mut custom_ids = Vec::with_capacity(articles.len());
        let mut contents = String::new();

        for article in articles {
            if !seen.insert(article.id) {
                warn!(article_id = article.id, "Duplicate article in batch input, skipping");
                continue;
            }

            let company = match names.get(&article.symbol) {
                Some(name) => name.clone(),
                None => {
                    let company = match self.companies.company(&article.symbol).await {
                        Ok(company) => company,
                        Err(e) => {
                            warn!(symbol = %article.symbol, error = %e, "Company lookup failed, using symbol");
                            None
                        }
                    };
                    let name = company
                        .map(|c| c.display_name().to_string())
                        .unwrap_or_else(|| article.symbol.clone());
                    names.insert(article.symbol.clone(), name.clone());
                    name
                }
            };

            let custom_id = CustomId(article.id);
            let body = ResponsesRequest::new(
                &self.model,
                build_prompt(article.prompt_text(), &article.symbol, &company),
            )
            .temperature(1.0)
            .json_schema(SCHEMA_NAME, schema.clone())
            .reasoning_effort(ReasoningEffort::Low);
            let line = BatchRequestLine::post(custom_id.to_string(), RESPONSES_ENDPOINT, body);

            contents.push_str(&serde_json::to_string(&line)?);
            contents.push('\n');
            custom_ids.push(custom_id);
        }

        let mut file = tokio::fs::File::create(path).await?;
        file.write_all(contents.as_bytes()).await?;
        file.flush().await?;

        debug!(path = %path.display(), requests = custom_ids.len(), "Wrote batch input file");

        Ok(BatchInputFile {
            path: path.to_path_buf(),
            request_count: custom_ids.len(),
            custom_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MemoryCompanyDirectory;
    use chrono::NaiveDate;
    use serde_json::Value;

    fn article(id: ArticleId, symbol: &str, content: &str) -> Article {
        Article {
            id,
            symbol: symbol.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
            headline: format!("Headline {}", id),
            summary: format!("Summary {}", id),
            content: Some(content.to_string()),
            source: Some("Yahoo".to_string()),
            url: None,
            sentiment_score: None,
            sentiment_reasoning: None,
        }
    }

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_custom_id_format_and_parse() {
        assert_eq!(CustomId(42).to_string(), "article-42");
        assert_eq!("article-42".parse::<CustomId>().unwrap(), CustomId(42));
        assert!("article-".parse::<CustomId>().is_err());
        assert!("post-42".parse::<CustomId>().is_err());
        assert!("article-4x".parse::<CustomId>().is_err());
    }

    #[tokio::test]
    async fn test_request_lines_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input/batchinput_2024-02-28.jsonl");
        let companies = Arc::new(MemoryCompanyDirectory::new().with_company("AAPL", "Apple Inc."));
        let builder = BatchInputBuilder::new(companies, "gpt-5-mini");

        let file = builder
            .build(&[article(7, "AAPL", "Services revenue hit a record.")], &path)
            .await
            .unwrap();

        assert_eq!(file.request_count, 1);
        let lines = read_lines(&path);
        let line = &lines[0];
        assert_eq!(line["custom_id"], "article-7");
        assert_eq!(line["method"], "POST");
        assert_eq!(line["url"], "/v1/responses");
        assert_eq!(line["body"]["model"], "gpt-5-mini");
        assert_eq!(line["body"]["temperature"].as_f64(), Some(1.0));
        assert_eq!(line["body"]["reasoning"]["effort"], "low");
        assert_eq!(line["body"]["text"]["format"]["type"], "json_schema");
        assert_eq!(line["body"]["text"]["format"]["name"], "sentiment_analysis");
        assert_eq!(line["body"]["text"]["format"]["strict"], true);

        let input = line["body"]["input"].as_str().unwrap();
        assert!(input.contains("company Apple Inc."));
        assert!(input.contains("Services revenue hit a record."));
    }

    #[tokio::test]
    async fn test_duplicates_skipped_and_missing_company_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batchinput.jsonl");
        let companies = Arc::new(MemoryCompanyDirectory::new());
        let builder = BatchInputBuilder::new(companies.clone(), "gpt-5-mini");

        let articles = [
            article(1, "ZZZZ", "a"),
            article(2, "ZZZZ", "b"),
            article(1, "ZZZZ", "a again"),
        ];
        let file = builder.build(&articles, &path).await.unwrap();

        assert_eq!(file.request_count, 2);
        assert_eq!(file.custom_ids, vec![CustomId(1), CustomId(2)]);
        assert_eq!(read_lines(&path).len(), 2);

        let input = read_lines(&path)[0]["body"]["input"].as_str().unwrap().to_string();
        assert!(input.contains("company ZZZZ"));

        // One directory lookup per symbol
        assert_eq!(companies.lookups(), vec!["ZZZZ".to_string()]);
    }

    #[tokio::test]
    async fn test_company_lookup_error_falls_back_to_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batchinput.jsonl");
        let companies = Arc::new(
            MemoryCompanyDirectory::new()
                .with_company("MSFT", "Microsoft")
                .fail_lookup("MSFT"),
        );
        let builder = BatchInputBuilder::new(companies, "gpt-5-mini");

        let file = builder
            .build(&[article(7, "MSFT", "Azure grew")], &path)
            .await
            .unwrap();

        assert_eq!(file.request_count, 1);
        let input = read_lines(&path)[0]["body"]["input"].as_str().unwrap().to_string();
        assert!(input.contains("of the company MSFT"));
    }
}
