//! Model queries against SQLite.

mod common;

use common::*;
use earnings_etl::domains::companies::Company;
use earnings_etl::domains::earnings::EarningsEvent;

#[tokio::test]
async fn earnings_range_is_inclusive_and_ordered() {
    let harness = TestHarness::new().await.unwrap();
    let pool = &harness.db_pool;
    create_earnings(pool, "MSFT", date("2024-04-25")).await.unwrap();
    create_earnings(pool, "AAPL", date("2024-05-02")).await.unwrap();
    create_earnings(pool, "AMZN", date("2024-04-30")).await.unwrap();
    create_earnings(pool, "GOOG", date("2024-04-25")).await.unwrap();
    create_earnings(pool, "NVDA", date("2024-05-22")).await.unwrap();

    let events = EarningsEvent::find_in_range(date("2024-04-25"), date("2024-05-02"), pool)
        .await
        .unwrap();

    let found: Vec<(&str, String)> = events
        .iter()
        .map(|e| (e.symbol.as_str(), e.date.to_string()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("GOOG", "2024-04-25".to_string()),
            ("MSFT", "2024-04-25".to_string()),
            ("AMZN", "2024-04-30".to_string()),
            ("AAPL", "2024-05-02".to_string()),
        ]
    );
}

#[tokio::test]
async fn earnings_range_without_events_is_empty() {
    let harness = TestHarness::new().await.unwrap();
    let pool = &harness.db_pool;
    create_earnings(pool, "MSFT", date("2024-04-25")).await.unwrap();

    let events = EarningsEvent::find_in_range(date("2024-01-01"), date("2024-03-31"), pool)
        .await
        .unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn company_upsert_replaces_name() {
    let harness = TestHarness::new().await.unwrap();
    let pool = &harness.db_pool;
    create_company(pool, "META", "Facebook").await.unwrap();
    create_company(pool, "META", "Meta Platforms").await.unwrap();

    let company = Company::find_by_symbol("META", pool).await.unwrap().unwrap();
    assert_eq!(company.display_name(), "Meta Platforms");
}
