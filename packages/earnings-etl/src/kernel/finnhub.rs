//! Finnhub company news feed.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{BaseNewsSource, NewsItem};
use crate::error::{PipelineError, Result};

const FINNHUB_API_URL: &str = "https://finnhub.io/api/v1";

/// One item of `GET /company-news`
#[derive(Debug, Deserialize)]
struct CompanyNewsItem {
    #[serde(default)]
    datetime: i64,
    #[serde(default)]
    headline: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    url: String,
}

pub struct FinnhubNewsSource {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl FinnhubNewsSource {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: FINNHUB_API_URL.to_string(),
        }
    }
}

fn into_news_item(item: CompanyNewsItem) -> Option<NewsItem> {
    let date = DateTime::from_timestamp(item.datetime, 0)?.date_naive();
    if item.url.is_empty() {
        return None;
    }
    Some(NewsItem {
        date,
        headline: item.headline,
        summary: item.summary,
        source: item.source,
        url: item.url,
    })
}

#[async_trait]
impl BaseNewsSource for FinnhubNewsSource {
    async fn company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NewsItem>> {
        let from = from.to_string();
        let to = to.to_string();
        let response = self
            .http_client
            .get(format!("{}/company-news", self.base_url))
            .query(&[
                ("symbol", symbol),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::News(format!(
                "company-news for {} returned {}: {}",
                symbol, status, body
            )));
        }

        let items: Vec<CompanyNewsItem> = response.json().await?;
        let total = items.len();
        let news: Vec<NewsItem> = items.into_iter().filter_map(into_news_item).collect();
        if news.len() < total {
            warn!(symbol = %symbol, dropped = total - news.len(), "Dropped news items without url or timestamp");
        }
        debug!(symbol = %symbol, count = news.len(), "Fetched company news");

        Ok(news)
    }
}
