//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use chrono::NaiveDate;
use earnings_etl::domains::companies::Company;
use earnings_etl::domains::earnings::EarningsEvent;
use earnings_etl::domains::news::models::{Article, ArticleId, NewArticle};
use sqlx::SqlitePool;

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("fixture dates are YYYY-MM-DD")
}

/// Create a company row
pub async fn create_company(pool: &SqlitePool, symbol: &str, name: &str) -> Result<()> {
    Company::new(symbol, name).upsert(pool).await?;
    Ok(())
}

/// Create an earnings event
pub async fn create_earnings(pool: &SqlitePool, symbol: &str, on: NaiveDate) -> Result<()> {
    EarningsEvent::insert(symbol, on, Some(1.25), pool).await?;
    Ok(())
}

/// Create `count` unscored articles for `symbol` on `on`, returning their ids
pub async fn create_articles(
    pool: &SqlitePool,
    symbol: &str,
    on: NaiveDate,
    count: usize,
) -> Result<Vec<ArticleId>> {
    let articles: Vec<NewArticle> = (0..count)
        .map(|i| NewArticle {
            symbol: symbol.to_string(),
            date: on,
            headline: format!("{} headline {} on {}", symbol, i, on),
            summary: format!("Summary {}", i),
            content: Some(format!("{} body text {} published {}", symbol, i, on)),
            source: Some("Yahoo".to_string()),
            url: Some(format!("https://publisher.test/{}/{}/{}", symbol, on, i)),
        })
        .collect();
    Article::insert_many(&articles, pool).await?;

    let ids = Article::find_for_date(on, pool)
        .await?
        .into_iter()
        .filter(|a| a.symbol == symbol)
        .map(|a| a.id)
        .collect();
    Ok(ids)
}
