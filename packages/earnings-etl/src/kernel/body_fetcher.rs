//! Article body fetcher - reqwest for HTTP, htmd for HTML to text
//!
//! Feed URLs point at an aggregator redirect. The redirect is resolved with a
//! single non-following request, then the publisher page is downloaded and
//! converted to plain text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use tracing::debug;

use super::BaseBodyFetcher;
use crate::error::{PipelineError, Result};

/// Elements that never carry article text
const SKIPPED_TAGS: [&str; 8] = [
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form",
];

pub struct HttpBodyFetcher {
    client: reqwest::Client,
}

impl HttpBodyFetcher {
    pub fn new() -> Result<Self> {
        // Use a browser-like User-Agent to avoid bot detection
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { client })
    }

    /// Convert HTML to whitespace-collapsed text
    fn html_to_text(html: &str) -> Result<String> {
        let converter = htmd::HtmlToMarkdown::builder()
            .skip_tags(SKIPPED_TAGS.to_vec())
            .build();
        let markdown = converter
            .convert(html)
            .map_err(|e| PipelineError::News(format!("HTML conversion failed: {}", e)))?;
        Ok(collapse_whitespace(&markdown))
    }
}

/// Join all whitespace-separated words with single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl BaseBodyFetcher for HttpBodyFetcher {
    async fn resolve_url(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_redirection() {
            debug!(url = %url, status = %response.status(), "No redirect, using feed URL");
            return Ok(url.to_string());
        }

        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| PipelineError::News(format!("redirect without Location from {}", url)))
    }

    async fn fetch_body(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::News(format!("HTTP {} for {}", status, url)));
        }

        let html = response.text().await?;
        Self::html_to_text(&html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("  Shares rose\n\n 4%\tafter   guidance "),
            "Shares rose 4% after guidance"
        );
        assert_eq!(collapse_whitespace(" \n\t "), "");
    }

    #[test]
    fn test_html_to_text_drops_scripts_and_navigation() {
        let html = r#"
            <html><head><style>p { color: red }</style></head>
            <body>
              <nav><a href="/">Home</a></nav>
              <article><p>Revenue beat
                 estimates.</p><script>track()</script></article>
            </body></html>
        "#;

        let text = HttpBodyFetcher::html_to_text(html).unwrap();
        assert!(text.contains("Revenue beat estimates."));
        assert!(!text.contains("track()"));
        assert!(!text.contains("Home"));
    }
}
