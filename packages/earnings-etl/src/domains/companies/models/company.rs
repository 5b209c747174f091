use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::Result;

/// Company metadata keyed by ticker symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub symbol: String,
    pub name: Option<String>,
    pub market_cap: Option<i64>,
    pub sector: Option<String>,
}

impl Company {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: Some(name.into()),
            market_cap: None,
            sector: None,
        }
    }

    /// Name to show in prompts; the bare symbol when no name is known.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.symbol)
    }

    pub async fn find_by_symbol(symbol: &str, pool: &SqlitePool) -> Result<Option<Self>> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE symbol = ?")
            .bind(symbol)
            .fetch_optional(pool)
            .await?;
        Ok(company)
    }

    /// Insert or replace the row for this symbol.
    pub async fn upsert(&self, pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO companies (symbol, name, market_cap, sector)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(symbol) DO UPDATE SET
                name = excluded.name,
                market_cap = excluded.market_cap,
                sector = excluded.sector
            "#,
        )
        .bind(&self.symbol)
        .bind(&self.name)
        .bind(self.market_cap)
        .bind(&self.sector)
        .execute(pool)
        .await?;
        Ok(())
    }
}
