//! Kernel module - infrastructure traits, adapters and dependencies.

pub mod body_fetcher;
pub mod deps;
pub mod finnhub;
pub mod sql_store;
pub mod test_dependencies;
pub mod throttle;
pub mod traits;

/// Endpoint every batch request line targets.
pub const RESPONSES_ENDPOINT: &str = "/v1/responses";

pub use body_fetcher::HttpBodyFetcher;
pub use deps::{NewsDeps, OpenAIBatchProvider, SentimentDeps};
pub use finnhub::FinnhubNewsSource;
pub use sql_store::SqlStore;
pub use test_dependencies::TestDependencies;
pub use throttle::{RateLimitedBodyFetcher, RateLimitedNewsSource, Throttle};
pub use traits::*;
