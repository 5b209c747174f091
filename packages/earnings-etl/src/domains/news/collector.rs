//! Pre-earnings news collection.
//!
//! For every earnings event in the range, the three lookback windows are
//! fetched from the news feed, filtered to one source, deduplicated by URL,
//! capped, and stored with their extracted body text. Failures are contained
//! to the article or window they happen in.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::models::NewArticle;
use super::windows::{NewsWindow, WindowPlanner};
use crate::common::DateRange;
use crate::error::Result;
use crate::kernel::{NewsDeps, NewsItem};

/// Counts reported at the end of a collection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectSummary {
    pub events: usize,
    pub windows: usize,
    pub windows_failed: usize,
    pub articles_stored: u64,
    pub articles_skipped: usize,
}

pub struct NewsCollector {
    deps: NewsDeps,
    planner: WindowPlanner,
    source_filter: String,
}

impl NewsCollector {
    pub fn new(deps: NewsDeps, planner: WindowPlanner, source_filter: impl Into<String>) -> Self {
        Self {
            deps,
            planner,
            source_filter: source_filter.into(),
        }
    }

    /// Collect news for every earnings event dated within `range`.
    pub async fn collect(&self, range: DateRange) -> Result<CollectSummary> {
        info!(range = %range, source = %self.source_filter, "Starting news collection");

        let mut summary = CollectSummary::default();
        let mut seen_urls = HashSet::new();

        for date in range.days() {
            let events = self.deps.calendar.events_for_date(date).await?;
            for event in events {
                summary.events += 1;
                debug!(date = %date, symbol = %event.symbol, "Collecting news for earnings event");

                for window in self.planner.plan(&event.symbol, event.date) {
                    summary.windows += 1;
                    match self.collect_window(&window, &mut seen_urls, &mut summary).await {
                        Ok(stored) => debug!(
                            symbol = %window.symbol,
                            period = %window.period,
                            stored,
                            "Window collected"
                        ),
                        Err(e) => {
                            summary.windows_failed += 1;
                            warn!(
                                symbol = %window.symbol,
                                period = %window.period,
                                start = %window.start,
                                end = %window.end,
                                error = %e,
                                "Error collecting news window"
                            );
                        }
                    }
                }
            }
        }

        info!(
            events = summary.events,
            windows = summary.windows,
            windows_failed = summary.windows_failed,
            stored = summary.articles_stored,
            skipped = summary.articles_skipped,
            "News successfully collected"
        );
        Ok(summary)
    }

    async fn collect_window(
        &self,
        window: &NewsWindow,
        seen_urls: &mut HashSet<String>,
        summary: &mut CollectSummary,
    ) -> Result<u64> {
        let candidates = self
            .deps
            .news
            .company_news(&window.symbol, window.start, window.end)
            .await?;

        let mut selected: Vec<NewsItem> = Vec::new();
        for item in candidates {
            if selected.len() == window.max_articles {
                break;
            }
            if item.source != self.source_filter || !window.contains(item.date) {
                continue;
            }
            if seen_urls.contains(&item.url) || self.deps.articles.url_exists(&item.url).await? {
                debug!(url = %item.url, "Skipping already collected article");
                continue;
            }
            seen_urls.insert(item.url.clone());
            selected.push(item);
        }

        let mut articles = Vec::with_capacity(selected.len());
        for item in selected {
            match self.fetch_article(window, &item, seen_urls).await {
                Ok(Some(article)) => articles.push(article),
                Ok(None) => summary.articles_skipped += 1,
                Err(e) => {
                    summary.articles_skipped += 1;
                    warn!(url = %item.url, symbol = %window.symbol, error = %e, "Error extracting article");
                }
            }
        }

        if articles.is_empty() {
            debug!(symbol = %window.symbol, period = %window.period, "No articles to save");
            return Ok(0);
        }

        let stored = self.deps.articles.insert_articles(&articles).await?;
        summary.articles_stored += stored;
        Ok(stored)
    }

    /// Resolve, download and extract one article. `None` means it was skipped.
    async fn fetch_article(
        &self,
        window: &NewsWindow,
        item: &NewsItem,
        seen_urls: &mut HashSet<String>,
    ) -> Result<Option<NewArticle>> {
        let url = self.deps.bodies.resolve_url(&item.url).await?;
        if url != item.url
            && (!seen_urls.insert(url.clone()) || self.deps.articles.url_exists(&url).await?)
        {
            debug!(url = %url, "Skipping already collected article");
            return Ok(None);
        }

        let content = self.deps.bodies.fetch_body(&url).await?;
        if content.trim().is_empty() {
            warn!(url = %url, "Could not extract content");
            return Ok(None);
        }

        Ok(Some(NewArticle {
            symbol: window.symbol.clone(),
            date: item.date,
            headline: item.headline.clone(),
            summary: item.summary.clone(),
            content: Some(content),
            source: Some(item.source.clone()),
            url: Some(url),
        }))
    }
}
