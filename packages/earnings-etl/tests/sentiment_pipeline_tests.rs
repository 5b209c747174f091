//! End-to-end scoring against a real store and a scripted provider.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use earnings_etl::common::DateRange;
use earnings_etl::domains::news::models::Article;
use earnings_etl::domains::sentiment::{SentimentProcessor, StagingArea};
use earnings_etl::kernel::test_dependencies::MockBatchProvider;
use earnings_etl::kernel::SentimentDeps;
use openai_client::BatchStatus;

fn processor(harness: &TestHarness, provider: Arc<MockBatchProvider>) -> SentimentProcessor {
    SentimentProcessor::new(
        SentimentDeps::new(harness.store.clone(), harness.store.clone(), provider),
        "gpt-5-mini",
        StagingArea::new(harness.staging_dir.path()),
        Duration::from_millis(1),
    )
}

#[tokio::test]
async fn five_articles_before_earnings_are_all_scored() {
    let harness = TestHarness::new().await.unwrap();
    let pool = &harness.db_pool;
    create_company(pool, "AAPL", "Apple Inc.").await.unwrap();
    create_earnings(pool, "AAPL", date("2024-03-01")).await.unwrap();
    let ids = create_articles(pool, "AAPL", date("2024-02-28"), 5).await.unwrap();
    assert_eq!(ids.len(), 5);

    let provider = Arc::new(
        MockBatchProvider::new()
            .with_score(0.35)
            .with_statuses(0, vec![BatchStatus::InProgress, BatchStatus::Finalizing]),
    );

    let summary = processor(&harness, provider.clone())
        .process(DateRange::new(date("2024-02-26"), date("2024-03-01")).unwrap())
        .await
        .unwrap();

    // Only 2024-02-28 has articles: exactly one job
    assert_eq!(summary.dates_submitted, 1);
    assert_eq!(summary.jobs_completed, 1);
    assert_eq!(summary.reconcile.applied, 5);
    assert_eq!(summary.reconcile.failed, 0);
    assert_eq!(
        provider.batch_descriptions(),
        vec!["Sentiment analysis for 2024-02-28".to_string()]
    );

    for id in ids {
        let article = Article::find_by_id(id, pool).await.unwrap().unwrap();
        let score = article.sentiment_score.unwrap();
        assert!((-1.0..=1.0).contains(&score));
        assert_eq!(score, 0.35);
        assert!(article.sentiment_reasoning.unwrap().contains(&format!("article-{}", id)));
    }

    let requests = provider.uploaded_requests();
    assert_eq!(requests.len(), 5);
    assert!(requests
        .iter()
        .all(|r| r["body"]["input"].as_str().unwrap().contains("company Apple Inc.")));

    let saved = harness
        .staging_dir
        .path()
        .join("output/batchoutput_2024-02-28.jsonl");
    assert_eq!(std::fs::read_to_string(saved).unwrap().lines().count(), 5);
}

#[tokio::test]
async fn dates_without_articles_get_no_job() {
    let harness = TestHarness::new().await.unwrap();
    let pool = &harness.db_pool;
    create_company(pool, "MSFT", "Microsoft").await.unwrap();
    create_articles(pool, "MSFT", date("2024-01-10"), 2).await.unwrap();
    create_articles(pool, "MSFT", date("2024-01-12"), 1).await.unwrap();

    let provider = Arc::new(MockBatchProvider::new());
    let summary = processor(&harness, provider.clone())
        .process(DateRange::new(date("2024-01-09"), date("2024-01-13")).unwrap())
        .await
        .unwrap();

    assert_eq!(summary.dates_submitted, 2);
    assert_eq!(
        provider.batch_descriptions(),
        vec![
            "Sentiment analysis for 2024-01-10".to_string(),
            "Sentiment analysis for 2024-01-12".to_string(),
        ]
    );
    let inputs = harness.staging_dir.path().join("input");
    assert!(!inputs.join("batchinput_2024-01-09.jsonl").exists());
    assert!(!inputs.join("batchinput_2024-01-11.jsonl").exists());
    assert!(!inputs.join("batchinput_2024-01-13.jsonl").exists());
}

#[tokio::test]
async fn padded_range_scores_articles_outside_collection_dates() {
    let harness = TestHarness::new().await.unwrap();
    let pool = &harness.db_pool;
    create_company(pool, "NVDA", "NVIDIA").await.unwrap();
    let before = create_articles(pool, "NVDA", date("2024-05-19"), 1).await.unwrap();
    let after = create_articles(pool, "NVDA", date("2024-05-24"), 1).await.unwrap();

    let provider = Arc::new(MockBatchProvider::new());
    let range = DateRange::new(date("2024-05-21"), date("2024-05-22"))
        .unwrap()
        .padded(2);
    processor(&harness, provider).process(range).await.unwrap();

    for id in before.into_iter().chain(after) {
        let article = Article::find_by_id(id, pool).await.unwrap().unwrap();
        assert!(article.sentiment_score.is_some());
    }
}

#[tokio::test]
async fn failed_batch_leaves_articles_unscored() {
    let harness = TestHarness::new().await.unwrap();
    let pool = &harness.db_pool;
    create_company(pool, "AMD", "Advanced Micro Devices").await.unwrap();
    let ids = create_articles(pool, "AMD", date("2024-02-28"), 3).await.unwrap();

    let provider = Arc::new(MockBatchProvider::new().with_statuses(0, vec![BatchStatus::Expired]));
    let summary = processor(&harness, provider)
        .process(DateRange::single(date("2024-02-28")))
        .await
        .unwrap();

    assert_eq!(summary.jobs_without_output, 1);
    assert_eq!(summary.reconcile.applied, 0);
    for id in ids {
        let article = Article::find_by_id(id, pool).await.unwrap().unwrap();
        assert!(article.sentiment_score.is_none());
        assert!(article.sentiment_reasoning.is_none());
    }
}
