//! Reconciling saved output files into the SQLite store.

mod common;

use std::sync::Arc;

use common::*;
use earnings_etl::domains::news::models::Article;
use earnings_etl::domains::sentiment::{ReconcileReport, ResultReconciler};
use earnings_etl::kernel::test_dependencies::{
    error_line, response_line, success_line, MockBatchProvider,
};

fn reconciler(harness: &TestHarness) -> ResultReconciler {
    ResultReconciler::new(Arc::new(MockBatchProvider::new()), harness.store.clone())
}

#[tokio::test]
async fn reapplying_the_same_file_is_idempotent() {
    let harness = TestHarness::new().await.unwrap();
    let pool = &harness.db_pool;
    create_company(pool, "AAPL", "Apple Inc.").await.unwrap();
    let ids = create_articles(pool, "AAPL", date("2024-02-28"), 3).await.unwrap();

    let path = harness.staging_dir.path().join("batchoutput_2024-02-28.jsonl");
    let contents = [
        success_line(&format!("article-{}", ids[0]), 0.8, "Raised guidance"),
        success_line(&format!("article-{}", ids[1]), -0.6, "Supply issues"),
        success_line(&format!("article-{}", ids[2]), 0.0, "Neutral"),
    ]
    .join("\n");
    std::fs::write(&path, contents).unwrap();

    let first = reconciler(&harness).apply(&path).await.unwrap();
    let after_first = Article::find_for_date(date("2024-02-28"), pool).await.unwrap();

    let second = reconciler(&harness).apply(&path).await.unwrap();
    let after_second = Article::find_for_date(date("2024-02-28"), pool).await.unwrap();

    assert_eq!(first, ReconcileReport { applied: 3, skipped: 0, failed: 0 });
    assert_eq!(first, second);
    assert_eq!(after_first, after_second);
    assert_eq!(after_second[1].sentiment_score, Some(-0.6));
    assert_eq!(after_second[1].sentiment_reasoning.as_deref(), Some("Supply issues"));
}

#[tokio::test]
async fn one_bad_line_does_not_block_its_neighbours() {
    let harness = TestHarness::new().await.unwrap();
    let pool = &harness.db_pool;
    create_company(pool, "TSLA", "Tesla").await.unwrap();
    let ids = create_articles(pool, "TSLA", date("2024-04-22"), 4).await.unwrap();

    let path = harness.staging_dir.path().join("batchoutput_2024-04-22.jsonl");
    let contents = [
        success_line(&format!("article-{}", ids[0]), 0.2, "Deliveries steady"),
        response_line(&format!("article-{}", ids[1]), 200, "{\"sentiment_score\": 2}"),
        error_line(&format!("article-{}", ids[2]), "server_error"),
        success_line(&format!("article-{}", ids[3]), -0.3, "Margins squeezed"),
    ]
    .join("\n");
    std::fs::write(&path, contents).unwrap();

    let report = reconciler(&harness).apply(&path).await.unwrap();

    assert_eq!(report, ReconcileReport { applied: 2, skipped: 1, failed: 1 });
    let scored: Vec<Option<f64>> = Article::find_for_date(date("2024-04-22"), pool)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.sentiment_score)
        .collect();
    assert_eq!(scored, vec![Some(0.2), None, None, Some(-0.3)]);
}

#[tokio::test]
async fn unknown_article_id_counts_as_failed() {
    let harness = TestHarness::new().await.unwrap();
    let path = harness.staging_dir.path().join("batchoutput.jsonl");
    std::fs::write(&path, success_line("article-12345", 0.5, "Ghost")).unwrap();

    let report = reconciler(&harness).apply(&path).await.unwrap();
    assert_eq!(report, ReconcileReport { applied: 0, skipped: 0, failed: 1 });
}
