use anyhow::{Context, Result};
use tracing::info;

use tripscout::{TripScoutConfig, VERSION, telemetry, web};

fn main() -> Result<()> {
    let config = TripScoutConfig::load()?;
    // Exporters start their own threads; set them up before the runtime
    let _telemetry = telemetry::init(&config.logging)?;
    info!(version = VERSION, "starting tripscout");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(web::run(config))
}
