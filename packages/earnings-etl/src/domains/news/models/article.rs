use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::Result;

pub type ArticleId = i64;

/// A news article collected ahead of an earnings event.
///
/// `sentiment_score` and `sentiment_reasoning` are null until reconciliation
/// and are always written together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: ArticleId,
    pub symbol: String,
    pub date: NaiveDate,
    pub headline: String,
    pub summary: String,
    pub content: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub sentiment_score: Option<f64>,
    pub sentiment_reasoning: Option<String>,
}

/// An article that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
    pub symbol: String,
    pub date: NaiveDate,
    pub headline: String,
    pub summary: String,
    pub content: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
}

impl Article {
    /// Text handed to the model: body content, else summary, else headline.
    pub fn prompt_text(&self) -> &str {
        [self.content.as_deref(), Some(self.summary.as_str())]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
            .unwrap_or(self.headline.as_str())
    }

    pub async fn find_by_id(id: ArticleId, pool: &SqlitePool) -> Result<Option<Self>> {
        let article = sqlx::query_as::<_, Article>("SELECT * FROM news_articles WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(article)
    }

    /// All articles published on `date`, in id order.
    pub async fn find_for_date(date: NaiveDate, pool: &SqlitePool) -> Result<Vec<Self>> {
        let articles = sqlx::query_as::<_, Article>(
            "SELECT * FROM news_articles WHERE date = ? ORDER BY id",
        )
        .bind(date)
        .fetch_all(pool)
        .await?;
        Ok(articles)
    }

    pub async fn find_for_symbol_in_range(
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        pool: &SqlitePool,
    ) -> Result<Vec<Self>> {
        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT * FROM news_articles
            WHERE symbol = ? AND date >= ? AND date <= ?
            ORDER BY date DESC, id
            "#,
        )
        .bind(symbol)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
        Ok(articles)
    }

    pub async fn exists_with_url(url: &str, pool: &SqlitePool) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM news_articles WHERE url = ?")
            .bind(url)
            .fetch_optional(pool)
            .await?;
        Ok(found.is_some())
    }

    /// Insert in one transaction; articles whose URL is already stored are
    /// ignored. Returns how many rows were written.
    pub async fn insert_many(articles: &[NewArticle], pool: &SqlitePool) -> Result<u64> {
        let mut tx = pool.begin().await?;
        let mut inserted = 0;

        for article in articles {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO news_articles
                    (symbol, date, headline, summary, content, source, url)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&article.symbol)
            .bind(article.date)
            .bind(&article.headline)
            .bind(&article.summary)
            .bind(&article.content)
            .bind(&article.source)
            .bind(&article.url)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Set score and reasoning in one statement. Returns `false` when no
    /// article has this id.
    pub async fn update_sentiment(
        id: ArticleId,
        score: f64,
        reasoning: &str,
        pool: &SqlitePool,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE news_articles SET sentiment_score = ?, sentiment_reasoning = ? WHERE id = ?",
        )
        .bind(score)
        .bind(reasoning)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(content: Option<&str>, summary: &str) -> Article {
        Article {
            id: 1,
            symbol: "AAPL".into(),
            date: "2024-02-28".parse().unwrap(),
            headline: "Apple headline".into(),
            summary: summary.into(),
            content: content.map(Into::into),
            source: Some("Yahoo".into()),
            url: None,
            sentiment_score: None,
            sentiment_reasoning: None,
        }
    }

    #[test]
    fn test_prompt_text_prefers_content() {
        assert_eq!(article(Some("Body"), "Summary").prompt_text(), "Body");
    }

    #[test]
    fn test_prompt_text_falls_back() {
        assert_eq!(article(Some("   "), "Summary").prompt_text(), "Summary");
        assert_eq!(article(None, "").prompt_text(), "Apple headline");
    }
}
