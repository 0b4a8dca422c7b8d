use anyhow::Result;

use mock_market_data::app;

#[tokio::main]
async fn main() -> Result<()> {
    let config = app::bootstrap()?;
    let client = app::build_client(&config)?;
    app::run_static_data(&config, &client, app::cancel_on_ctrl_c()).await?;
    Ok(())
}
