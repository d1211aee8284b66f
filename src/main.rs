//! sensordash daemon entry point.

use anyhow::Result;
use clap::Parser;
use sensordash::config::Config;
use sensordash::server::{self, AppState};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("sensordash v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::parse();

    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    if config.bind_host.is_none() {
        warn!("BIND_HOST is not set. Using default: '0.0.0.0'");
    }
    if config.bind_port.is_none() {
        warn!("BIND_PORT is not set. Using default: 5000");
    }

    if config.use_dummy_data {
        info!("Dummy mode enabled; upstream will not be contacted");
    }
    info!("Serving {} configured entities", config.entities().len());

    let addr = config.bind_addr();
    let state = AppState::from_config(&config);
    server::run(state, &addr).await
}
