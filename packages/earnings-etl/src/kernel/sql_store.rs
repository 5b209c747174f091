//! SQLite-backed implementations of the store traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::domains::companies::Company;
use crate::domains::earnings::EarningsEvent;
use crate::domains::news::models::{Article, ArticleId, NewArticle};
use crate::error::Result;
use crate::kernel::{BaseArticleStore, BaseCompanyDirectory, BaseEarningsCalendar};

/// Article store, company directory and earnings calendar over one pool.
#[derive(Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseArticleStore for SqlStore {
    async fn articles_for_date(&self, date: NaiveDate) -> Result<Vec<Article>> {
        Article::find_for_date(date, &self.pool).await
    }

    async fn update_sentiment(&self, id: ArticleId, score: f64, reasoning: &str) -> Result<bool> {
        Article::update_sentiment(id, score, reasoning, &self.pool).await
    }

    async fn url_exists(&self, url: &str) -> Result<bool> {
        Article::exists_with_url(url, &self.pool).await
    }

    async fn insert_articles(&self, articles: &[NewArticle]) -> Result<u64> {
        Article::insert_many(articles, &self.pool).await
    }
}

#[async_trait]
impl BaseCompanyDirectory for SqlStore {
    async fn company(&self, symbol: &str) -> Result<Option<Company>> {
        Company::find_by_symbol(symbol, &self.pool).await
    }
}

#[async_trait]
impl BaseEarningsCalendar for SqlStore {
    async fn events_for_date(&self, date: NaiveDate) -> Result<Vec<EarningsEvent>> {
        EarningsEvent::find_for_date(date, &self.pool).await
    }
}
