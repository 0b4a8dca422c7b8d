use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::batch::{BatchReport, Cancellation};
use crate::model::reference::StaticReferenceRecord;
use crate::provider::{with_timeout, MarketDataProvider};
use crate::sink::TabularSink;

/// One reference-data row per resolvable ticker, in universe order.
pub struct StaticReferenceExporter<P: MarketDataProvider> {
    provider: P,
    timeout: Duration,
    cancel: Cancellation,
}

impl<P: MarketDataProvider> StaticReferenceExporter<P> {
    pub fn new(provider: P, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            cancel: Cancellation::never(),
        }
    }

    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    pub async fn run<W: Write>(
        &self,
        tickers: &[String],
        sink: &mut TabularSink<W>,
    ) -> Result<BatchReport> {
        let mut report = BatchReport::new();
        tracing::info!(
            run_id = %report.run_id,
            tickers = tickers.len(),
            "Starting static reference export"
        );

        for ticker in tickers {
            if self.cancel.is_cancelled() {
                tracing::warn!(run_id = %report.run_id, ticker = %ticker, "Export cancelled");
                report.cancelled = true;
                break;
            }

            let info = match with_timeout(ticker, self.timeout, self.provider.info(ticker)).await {
                Ok(info) => info,
                Err(e) => {
                    tracing::warn!(ticker = %ticker, error = %e, "Could not retrieve reference data");
                    report.skip(ticker, e.to_string());
                    continue;
                }
            };

            let record = StaticReferenceRecord::from_info(ticker, &info);
            sink.write_row(&record)
                .with_context(|| format!("failed to write reference row for {}", ticker))?;
            tracing::debug!(ticker = %ticker, fields = info.len(), "Wrote reference row");
            report.rows_written += 1;
            report.tickers_written.push(ticker.clone());
        }

        sink.flush().context("failed to flush reference output")?;
        tracing::info!(
            run_id = %report.run_id,
            rows = report.rows_written,
            skipped = report.skipped.len(),
            cancelled = report.cancelled,
            "Static reference export finished"
        );
        Ok(report)
    }

    pub async fn run_to_path(&self, tickers: &[String], path: &Path) -> Result<BatchReport> {
        let mut sink = TabularSink::create_for::<StaticReferenceRecord>(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let report = self.run(tickers, &mut sink).await?;
        sink.finish()
            .with_context(|| format!("failed to close {}", path.display()))?;
        Ok(report)
    }
}
