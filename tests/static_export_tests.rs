mod common;

use std::time::Duration;

use serde_json::json;
use tokio::sync::watch;

use common::{read_csv, temp_csv_path, tickers, ScriptedProvider};
use mock_market_data::batch::Cancellation;
use mock_market_data::model::reference::{NOT_AVAILABLE, STATIC_REFERENCE_HEADER};
use mock_market_data::provider::ProviderInfo;
use mock_market_data::static_export::StaticReferenceExporter;

fn apple_info() -> ProviderInfo {
    let mut info = ProviderInfo::default();
    info.insert("longName", json!("Apple Inc."));
    info.insert("sharesOutstanding", json!(15_204_100_096u64));
    info.insert("exchange", json!("NMS"));
    info.insert("sector", json!("Technology"));
    info.insert("industry", json!("Consumer Electronics"));
    info.insert("country", json!("United States"));
    info
}

#[tokio::test]
/// Verifies one row per resolvable ticker with N/A for missing fields,
/// and that unresolvable tickers are skipped without aborting the export.
async fn export_writes_rows_and_skips_failures() {
    let mut nestle = ProviderInfo::default();
    nestle.insert("longName", json!("Nestlé S.A."));
    let provider = ScriptedProvider::default()
        .with_info("AAPL", apple_info())
        .with_info("NESN.SW", nestle);
    let path = temp_csv_path("static-export");

    let report = StaticReferenceExporter::new(&provider, Duration::from_millis(200))
        .run_to_path(&tickers(&["AAPL", "GONE", "NESN.SW"]), &path)
        .await
        .expect("export should complete");

    assert_eq!(report.rows_written, 2);
    assert_eq!(report.skipped_tickers(), vec!["GONE"]);

    let (header, rows) = read_csv(&path);
    assert_eq!(header, STATIC_REFERENCE_HEADER);
    assert_eq!(
        rows[0],
        vec![
            "AAPL",
            "Apple Inc.",
            "15204100096",
            "NMS",
            NOT_AVAILABLE,
            "Technology",
            "Consumer Electronics",
            "United States",
            NOT_AVAILABLE,
        ]
    );
    assert_eq!(rows[1][0], "NESN.SW");
    assert_eq!(rows[1][1], "Nestlé S.A.");
    assert!(rows[1][2..].iter().all(|v| v == NOT_AVAILABLE));
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
/// Verifies the header is present even when no ticker resolves.
async fn export_header_only_when_nothing_resolves() {
    let provider = ScriptedProvider::default();
    let path = temp_csv_path("static-export-empty");

    let report = StaticReferenceExporter::new(&provider, Duration::from_millis(200))
        .run_to_path(&tickers(&["A", "B"]), &path)
        .await
        .unwrap();

    assert_eq!(report.rows_written, 0);
    let (header, rows) = read_csv(&path);
    assert_eq!(header, STATIC_REFERENCE_HEADER);
    assert!(rows.is_empty());
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
/// Verifies a stalled info lookup is cut off by the per-call timeout and
/// skipped, and the export still writes the next ticker.
async fn slow_info_lookup_times_out_and_is_skipped() {
    let provider = ScriptedProvider::default()
        .with_info("SLOW", apple_info())
        .with_info("AAPL", apple_info())
        .with_slow("SLOW");
    let path = temp_csv_path("static-export-slow");

    let report = StaticReferenceExporter::new(&provider, Duration::from_millis(200))
        .run_to_path(&tickers(&["SLOW", "AAPL"]), &path)
        .await
        .unwrap();

    assert_eq!(report.skipped_tickers(), vec!["SLOW"]);
    assert!(report.skipped[0].reason.contains("timed out"));
    assert_eq!(report.tickers_written, vec!["AAPL".to_string()]);
    assert_eq!(report.rows_written, 1);

    let (_, rows) = read_csv(&path);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "AAPL");
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
/// Verifies a raised cancellation flag stops the export before the first
/// ticker: header only, no provider calls, and the report marks it cancelled.
async fn cancelled_export_makes_no_calls() {
    let provider = ScriptedProvider::default()
        .with_info("AAPL", apple_info())
        .with_info("MSFT", apple_info());
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();
    let path = temp_csv_path("static-export-cancel");

    let report = StaticReferenceExporter::new(&provider, Duration::from_millis(200))
        .with_cancellation(Cancellation::from_watch(rx))
        .run_to_path(&tickers(&["AAPL", "MSFT"]), &path)
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.rows_written, 0);
    assert!(provider.calls().is_empty());

    let (header, rows) = read_csv(&path);
    assert_eq!(header, STATIC_REFERENCE_HEADER);
    assert!(rows.is_empty());
    let _ = std::fs::remove_file(&path);
}
