use anyhow::Result;

use mock_market_data::app;

/// Generate both datasets in one pass: order flow first, then static reference data.
#[tokio::main]
async fn main() -> Result<()> {
    let config = app::bootstrap()?;
    let client = app::build_client(&config)?;
    let cancel = app::cancel_on_ctrl_c();

    let order_flow = app::run_order_flow(&config, &client, cancel.clone()).await?;
    if order_flow.cancelled {
        tracing::info!("Skipping static reference export after cancellation");
        return Ok(());
    }
    app::run_static_data(&config, &client, cancel).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
