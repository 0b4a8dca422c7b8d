use anyhow::{Context, Result};
use rand::Rng;
use std::io::Write;
use std::path::Path;
use tokio::sync::watch;
use uuid::Uuid;

use crate::model::order_flow::OrderFlowEvent;
use crate::price_source::{PriceResolution, ReferencePriceSource};
use crate::provider::MarketDataProvider;
use crate::sink::TabularSink;
use crate::synth::OrderFlowSynthesizer;

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: String,
}

/// Outcome of one pass over the ticker universe.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub rows_written: u64,
    pub tickers_written: Vec<String>,
    pub skipped: Vec<SkippedTicker>,
    pub cancelled: bool,
}

impl BatchReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            rows_written: 0,
            tickers_written: Vec::new(),
            skipped: Vec::new(),
            cancelled: false,
        }
    }

    pub fn skipped_tickers(&self) -> Vec<&str> {
        self.skipped.iter().map(|s| s.ticker.as_str()).collect()
    }

    pub(crate) fn skip(&mut self, ticker: &str, reason: String) {
        self.skipped.push(SkippedTicker {
            ticker: ticker.to_string(),
            reason,
        });
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of the shutdown flag; checked between tickers only.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    rx: Option<watch::Receiver<bool>>,
}

impl Cancellation {
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn from_watch(rx: watch::Receiver<bool>) -> Self {
        Self { rx: Some(rx) }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }
}

/// Drives price resolution and synthesis across the universe, strictly in
/// universe order, streaming each ticker's events into the sink.
pub struct OrderFlowBatch<P: MarketDataProvider, R: Rng> {
    source: ReferencePriceSource<P>,
    synth: OrderFlowSynthesizer<R>,
    records_per_ticker: usize,
    cancel: Cancellation,
}

impl<P: MarketDataProvider, R: Rng> OrderFlowBatch<P, R> {
    pub fn new(
        source: ReferencePriceSource<P>,
        synth: OrderFlowSynthesizer<R>,
        records_per_ticker: usize,
    ) -> Self {
        Self {
            source,
            synth,
            records_per_ticker,
            cancel: Cancellation::never(),
        }
    }

    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    /// Per-ticker price failures are recorded and skipped; only sink errors abort.
    pub async fn run<W: Write>(
        &mut self,
        tickers: &[String],
        sink: &mut TabularSink<W>,
    ) -> Result<BatchReport> {
        let mut report = BatchReport::new();
        tracing::info!(
            run_id = %report.run_id,
            tickers = tickers.len(),
            records_per_ticker = self.records_per_ticker,
            "Starting order-flow batch"
        );

        if self.records_per_ticker == 0 || tickers.is_empty() {
            tracing::info!(run_id = %report.run_id, "Nothing to generate, writing header only");
            sink.flush().context("failed to flush order-flow output")?;
            return Ok(report);
        }

        for ticker in tickers {
            if self.cancel.is_cancelled() {
                tracing::warn!(run_id = %report.run_id, ticker = %ticker, "Batch cancelled");
                report.cancelled = true;
                break;
            }

            let anchor = match self.source.resolve(ticker).await {
                PriceResolution::Price(p) => p,
                PriceResolution::Unavailable(reason) => {
                    report.skip(ticker, reason);
                    continue;
                }
            };

            let events = self
                .synth
                .synthesize(ticker, anchor, self.records_per_ticker);
            let written = sink
                .write_rows::<OrderFlowEvent, _>(events)
                .with_context(|| format!("failed to write order-flow rows for {}", ticker))?;

            tracing::info!(ticker = %ticker, anchor, rows = written, "Wrote order-flow rows");
            report.rows_written += written;
            report.tickers_written.push(ticker.clone());
        }

        sink.flush().context("failed to flush order-flow output")?;
        tracing::info!(
            run_id = %report.run_id,
            rows = report.rows_written,
            written = report.tickers_written.len(),
            skipped = report.skipped.len(),
            cancelled = report.cancelled,
            "Order-flow batch finished"
        );
        Ok(report)
    }

    /// Open `path`, run the batch into it and close it.
    pub async fn run_to_path(&mut self, tickers: &[String], path: &Path) -> Result<BatchReport> {
        let mut sink = TabularSink::create_for::<OrderFlowEvent>(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let report = self.run(tickers, &mut sink).await?;
        sink.finish()
            .with_context(|| format!("failed to close {}", path.display()))?;
        Ok(report)
    }
}
