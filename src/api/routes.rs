//! All routes for the HTTP API.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{api, AppState};

pub(crate) mod analyze;
pub(crate) mod health;
pub(crate) mod root;
pub(crate) mod test_connection;

/// Builds the API router without middleware.
pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root::get))
        .route("/health", get(health::get))
        .route("/analyze", post(analyze::post))
        .route("/test-connection", post(test_connection::post))
        .fallback(|| async { api::Error::RouteNotFound })
}
