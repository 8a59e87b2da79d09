//! A web server exposing mock room image analysis endpoints. It validates uploaded images and
//! answers with placeholder analysis results until a real model backs it.

mod analysis;
mod api;
mod config;
mod decode;
mod id;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::{
    analysis::{PlaceholderAnalyzer, RoomAnalyzer},
    config::Config,
};

/// State shared by all request handlers. It's immutable, so it's cloned into each request.
#[derive(Clone)]
pub(crate) struct AppState {
    /// The analyzer producing the room analysis for each uploaded image.
    pub(crate) analyzer: Arc<dyn RoomAnalyzer>,

    /// The maximum size of a request body in bytes.
    pub(crate) max_upload_size: usize,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("analyzer", &self.analyzer.name())
            .field("max_upload_size", &self.max_upload_size)
            .finish()
    }
}

impl AppState {
    /// Creates the state for a server using the placeholder analyzer.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            analyzer: Arc::new(PlaceholderAnalyzer),
            max_upload_size: config.max_upload_size,
        }
    }
}

/// # Errors
///
/// See implementation.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let state = AppState::new(&config);

    tracing::info!(analyzer = state.analyzer.name(), "Starting server...");

    let listener = TcpListener::bind(&config.address).await?;

    tracing::info!(
        address = %config.address,
        max_upload_size = config.max_upload_size,
        "Ready!"
    );

    axum::serve(listener, api::router(state)).await?;

    Ok(())
}
