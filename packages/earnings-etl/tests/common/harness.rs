//! Test harness backed by an in-memory SQLite database.
//!
//! Every harness owns its own database: the pool holds a single connection
//! that is never recycled, so the in-memory schema lives as long as the pool.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use earnings_etl::kernel::SqlStore;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tempfile::TempDir;

pub struct TestHarness {
    /// Database pool - use this for test fixtures.
    pub db_pool: SqlitePool,
    /// Store implementation under test
    pub store: Arc<SqlStore>,
    /// Staging root for batch files, removed on drop
    pub staging_dir: TempDir,
}

impl TestHarness {
    /// Creates a fresh database with migrations applied.
    pub async fn new() -> Result<Self> {
        // Initialize tracing subscriber to respect RUST_LOG environment variable.
        // Uses try_init() to avoid panicking if already initialized.
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let db_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        earnings_etl::db::migrate(&db_pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            store: Arc::new(SqlStore::new(db_pool.clone())),
            db_pool,
            staging_dir: tempfile::tempdir().context("Failed to create staging dir")?,
        })
    }
}
