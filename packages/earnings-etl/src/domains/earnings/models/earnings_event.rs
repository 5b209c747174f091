use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::Result;

/// A scheduled earnings report. Read-only to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EarningsEvent {
    pub id: i64,
    pub symbol: String,
    pub date: NaiveDate,
    pub eps_estimate: Option<f64>,
    pub eps_actual: Option<f64>,
    pub surprise: Option<f64>,
}

impl EarningsEvent {
    pub async fn find_for_date(date: NaiveDate, pool: &SqlitePool) -> Result<Vec<Self>> {
        let events = sqlx::query_as::<_, EarningsEvent>(
            "SELECT * FROM earnings_dates WHERE date = ? ORDER BY symbol",
        )
        .bind(date)
        .fetch_all(pool)
        .await?;
        Ok(events)
    }

    /// Events with `start <= date <= end`, oldest first.
    pub async fn find_in_range(
        start: NaiveDate,
        end: NaiveDate,
        pool: &SqlitePool,
    ) -> Result<Vec<Self>> {
        let events = sqlx::query_as::<_, EarningsEvent>(
            "SELECT * FROM earnings_dates WHERE date >= ? AND date <= ? ORDER BY date, symbol",
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
        Ok(events)
    }

    /// Record an event. A second insert for the same symbol and date is ignored.
    pub async fn insert(
        symbol: &str,
        date: NaiveDate,
        eps_estimate: Option<f64>,
        pool: &SqlitePool,
    ) -> Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO earnings_dates (symbol, date, eps_estimate) VALUES (?, ?, ?)",
        )
        .bind(symbol)
        .bind(date)
        .bind(eps_estimate)
        .execute(pool)
        .await?;
        Ok(())
    }
}
