// Entry point for the earnings news ETL

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use earnings_etl::config::{default_log_filter, Config};
use earnings_etl::domains::news::{NewsCollector, WindowPlanner};
use earnings_etl::domains::sentiment::{
    ProviderCleanup, ResultReconciler, SentimentProcessor, StagingArea,
};
use earnings_etl::kernel::{
    FinnhubNewsSource, HttpBodyFetcher, NewsDeps, OpenAIBatchProvider, RateLimitedBodyFetcher,
    RateLimitedNewsSource, SentimentDeps, SqlStore, Throttle,
};
use openai_client::OpenAIClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "earnings-etl")]
#[command(about = "Pre-earnings news collection and batch sentiment scoring")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect news for earnings events between START_DATE and END_DATE
    CollectNews,

    /// Score stored articles through the batch API
    ScoreSentiment,

    /// Collect news, then score sentiment
    Run,

    /// Re-apply an already downloaded batch output file
    ApplyOutput { path: PathBuf },

    /// Cancel running batches and delete all files at the provider
    Cleanup,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    match config.date_range {
        Some(range) => tracing::info!(range = %range, "Configuration loaded"),
        None => tracing::info!("Configuration loaded without a date range"),
    }

    // Connect to database
    let pool = earnings_etl::db::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    earnings_etl::db::migrate(&pool)
        .await
        .context("Failed to run migrations")?;
    let store = Arc::new(SqlStore::new(pool));

    match cli.command {
        Commands::CollectNews => collect_news(&config, store).await,
        Commands::ScoreSentiment => score_sentiment(&config, store).await,
        Commands::Run => {
            collect_news(&config, store.clone()).await?;
            score_sentiment(&config, store).await
        }
        Commands::ApplyOutput { path } => apply_output(&config, store, &path).await,
        Commands::Cleanup => cleanup(&config).await,
    }
}

fn batch_provider(config: &Config) -> Result<Arc<OpenAIBatchProvider>> {
    let api_key = config.require_openai_key()?;
    let client = Arc::new(OpenAIClient::new(api_key));
    Ok(Arc::new(OpenAIBatchProvider::new(client)))
}

async fn collect_news(config: &Config, store: Arc<SqlStore>) -> Result<()> {
    let range = config.require_date_range()?;
    let api_key = config.require_finnhub_key()?;
    let throttle = Throttle::new(config.scraping_delay)?;
    let bodies = HttpBodyFetcher::new().context("Failed to create HTTP client")?;

    let deps = NewsDeps::new(
        store.clone(),
        store,
        Arc::new(RateLimitedNewsSource::new(
            FinnhubNewsSource::new(api_key),
            throttle.clone(),
        )),
        Arc::new(RateLimitedBodyFetcher::new(bodies, throttle)),
    );
    let collector = NewsCollector::new(
        deps,
        WindowPlanner::new(config.window_tiers.clone()),
        config.news_source_filter.clone(),
    );

    collector
        .collect(range)
        .await
        .context("News collection failed")?;
    Ok(())
}

async fn score_sentiment(config: &Config, store: Arc<SqlStore>) -> Result<()> {
    let range = config.scoring_range()?;
    let deps = SentimentDeps::new(store.clone(), store, batch_provider(config)?);
    let processor = SentimentProcessor::new(
        deps,
        config.openai_model.clone(),
        StagingArea::new(config.staging_dir.clone()),
        config.poll_interval,
    );

    processor
        .process(range)
        .await
        .context("Sentiment processing failed")?;
    Ok(())
}

async fn apply_output(config: &Config, store: Arc<SqlStore>, path: &std::path::Path) -> Result<()> {
    // Applying a saved file never calls the provider, so no key is required.
    let client = OpenAIClient::new(config.openai_api_key.clone().unwrap_or_default());
    let provider = Arc::new(OpenAIBatchProvider::new(Arc::new(client)));
    let reconciler = ResultReconciler::new(provider, store);
    let report = reconciler
        .apply(path)
        .await
        .with_context(|| format!("Failed to apply {}", path.display()))?;

    tracing::info!(
        applied = report.applied,
        skipped = report.skipped,
        failed = report.failed,
        "Output file applied"
    );
    Ok(())
}

async fn cleanup(config: &Config) -> Result<()> {
    ProviderCleanup::new(batch_provider(config)?).run().await;
    Ok(())
}
