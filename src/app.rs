//! Entry-point plumbing shared by the binaries.

use anyhow::{Context, Result};
use std::time::Duration;
use tokio::sync::watch;

use crate::batch::{BatchReport, Cancellation, OrderFlowBatch};
use crate::config::Config;
use crate::logging::init_tracing;
use crate::price_source::ReferencePriceSource;
use crate::provider::yahoo::YahooRestClient;
use crate::static_export::StaticReferenceExporter;
use crate::synth::{OrderFlowSynthesizer, SynthParams};

/// Load config and install logging. Config errors are printed before tracing
/// exists, so the caller gets them on stderr either way.
pub fn bootstrap() -> Result<Config> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            return Err(e);
        }
    };
    init_tracing(&config.logging)?;
    tracing::info!(
        tickers = config.universe.tickers().len(),
        records_per_ticker = config.order_flow.records_per_ticker,
        order_flow_path = %config.order_flow.output_path.display(),
        static_path = %config.static_data.output_path.display(),
        "Starting mock-market-data"
    );
    Ok(config)
}

/// Flip the returned cancellation flag on Ctrl+C. The current ticker finishes first.
pub fn cancel_on_ctrl_c() -> Cancellation {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl+C received, stopping after the current ticker");
            let _ = tx.send(true);
        }
    });
    Cancellation::from_watch(rx)
}

pub async fn run_order_flow(
    config: &Config,
    client: &YahooRestClient,
    cancel: Cancellation,
) -> Result<BatchReport> {
    let of = &config.order_flow;
    let source = ReferencePriceSource::new(
        client,
        Duration::from_millis(config.provider.request_timeout_ms),
    );
    let synth = OrderFlowSynthesizer::with_seed(SynthParams::from(of), of.seed);
    let mut batch =
        OrderFlowBatch::new(source, synth, of.records_per_ticker).with_cancellation(cancel);

    let report = batch
        .run_to_path(&config.universe.tickers(), &of.output_path)
        .await?;
    print_completion(&of.output_path, &report);
    Ok(report)
}

pub async fn run_static_data(
    config: &Config,
    client: &YahooRestClient,
    cancel: Cancellation,
) -> Result<BatchReport> {
    let exporter = StaticReferenceExporter::new(
        client,
        Duration::from_millis(config.provider.request_timeout_ms),
    )
    .with_cancellation(cancel);

    let path = &config.static_data.output_path;
    let report = exporter
        .run_to_path(&config.universe.tickers(), path)
        .await?;
    print_completion(path, &report);
    Ok(report)
}

pub fn build_client(config: &Config) -> Result<YahooRestClient> {
    YahooRestClient::new(&config.provider).context("failed to build provider HTTP client")
}

fn print_completion(path: &std::path::Path, report: &BatchReport) {
    if report.cancelled {
        println!(
            "{} partially written ({} rows) before cancellation",
            path.display(),
            report.rows_written
        );
    } else {
        println!("{} created successfully!", path.display());
    }
    if !report.skipped.is_empty() {
        println!(
            "skipped {} ticker(s): {}",
            report.skipped.len(),
            report.skipped_tickers().join(", ")
        );
    }
}
