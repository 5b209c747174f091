//! Rate-limited wrappers for outbound news requests.
//!
//! Wraps a news source and a body fetcher with one shared governor limiter so
//! every outbound request waits for the same permit stream.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use governor::{Quota, RateLimiter};

use crate::config::ConfigError;
use crate::error::Result;
use crate::kernel::{BaseBodyFetcher, BaseNewsSource, NewsItem};

type DefaultRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// One permit per `period`, without bursts.
#[derive(Clone)]
pub struct Throttle {
    limiter: Arc<DefaultRateLimiter>,
}

impl Throttle {
    pub fn new(period: Duration) -> std::result::Result<Self, ConfigError> {
        let quota = Quota::with_period(period).ok_or(ConfigError::Invalid {
            var: "SCRAPING_DELAY",
            reason: "must be greater than zero".to_string(),
        })?;
        Ok(Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

/// A news source that waits for the throttle before each listing.
pub struct RateLimitedNewsSource<S> {
    inner: S,
    throttle: Throttle,
}

impl<S: BaseNewsSource> RateLimitedNewsSource<S> {
    pub fn new(inner: S, throttle: Throttle) -> Self {
        Self { inner, throttle }
    }
}

#[async_trait]
impl<S: BaseNewsSource> BaseNewsSource for RateLimitedNewsSource<S> {
    async fn company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NewsItem>> {
        self.throttle.wait().await;
        self.inner.company_news(symbol, from, to).await
    }
}

/// A body fetcher that waits for the throttle before every request.
pub struct RateLimitedBodyFetcher<F> {
    inner: F,
    throttle: Throttle,
}

impl<F: BaseBodyFetcher> RateLimitedBodyFetcher<F> {
    pub fn new(inner: F, throttle: Throttle) -> Self {
        Self { inner, throttle }
    }
}

#[async_trait]
impl<F: BaseBodyFetcher> BaseBodyFetcher for RateLimitedBodyFetcher<F> {
    async fn resolve_url(&self, url: &str) -> Result<String> {
        self.throttle.wait().await;
        self.inner.resolve_url(url).await
    }

    async fn fetch_body(&self, url: &str) -> Result<String> {
        self.throttle.wait().await;
        self.inner.fetch_body(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MockBodyFetcher;
    use std::time::Instant;

    #[test]
    fn test_zero_period_rejected() {
        assert!(Throttle::new(Duration::ZERO).is_err());
    }

    #[tokio::test]
    async fn test_requests_are_spaced_by_period() {
        let throttle = Throttle::new(Duration::from_millis(50)).unwrap();
        let fetcher = RateLimitedBodyFetcher::new(
            MockBodyFetcher::new().with_body("https://a.test", "text"),
            throttle,
        );

        let started = Instant::now();
        fetcher.fetch_body("https://a.test").await.unwrap();
        fetcher.fetch_body("https://a.test").await.unwrap();
        fetcher.fetch_body("https://a.test").await.unwrap();

        // First permit is immediate, the next two wait a period each.
        assert!(started.elapsed() >= Duration::from_millis(90));
    }
}
