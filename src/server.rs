//! HTTP server for sensordash.

use crate::config::Config;
use crate::fetch::{Fetcher, LiveFetcher};
use crate::history::HistoryStore;
use crate::routes;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers.
pub struct AppState {
    pub fetcher: Fetcher,
    pub history: HistoryStore,
    pub entities: Vec<String>,
    pub refresh_seconds: u64,
}

impl AppState {
    /// Build the state from validated configuration. The fetcher variant
    /// is selected here, once; the read path never checks the dummy flag.
    pub fn from_config(config: &Config) -> Self {
        let fetcher = if config.use_dummy_data {
            Fetcher::Dummy
        } else {
            // validate() has already guaranteed these are present.
            Fetcher::Live(LiveFetcher::new(
                config.home_assistant_url.as_deref().unwrap_or(""),
                config.api_token.as_deref().unwrap_or(""),
            ))
        };

        Self {
            fetcher,
            history: HistoryStore::new(config.history_capacity),
            entities: config.entities(),
            refresh_seconds: config.refresh_seconds,
        }
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes())
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until the process is stopped.
pub async fn run(state: AppState, addr: &str) -> Result<()> {
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
