//! A route for clients to test their connection to the server.

use axum::{http::StatusCode, Json};
use axum_macros::debug_handler;
use serde::Serialize;

use crate::api::Response;

/// The timestamp sent in every response. It's fixed rather than the current time.
const TIMESTAMP: &str = "2024-01-01T00:00:00Z";

/// Confirms the connection works.
///
/// # Errors
///
/// Never fails.
#[expect(clippy::unused_async, reason = "Axum route handlers must be async")]
#[debug_handler]
pub(crate) async fn post() -> Response<PostResponse> {
    Ok((
        StatusCode::OK,
        Json(PostResponse {
            status: "success",
            message: "The connection to the analysis server is working!",
            timestamp: TIMESTAMP,
        }),
    ))
}

/// A `POST` response body for this API route.
#[derive(Serialize, Debug)]
pub(crate) struct PostResponse {
    /// Always `success`.
    pub(crate) status: &'static str,

    /// A human-readable confirmation.
    pub(crate) message: &'static str,

    /// See [`TIMESTAMP`].
    pub(crate) timestamp: &'static str,
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use super::*;
    use crate::api::routes::tests::{app, send};

    #[tokio::test]
    async fn connection_test_succeeds() -> anyhow::Result<()> {
        let request = Request::post("/test-connection").body(Body::empty())?;
        let (status, body) = send(app(), request).await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["timestamp"], TIMESTAMP);

        Ok(())
    }

    #[tokio::test]
    async fn connection_test_requires_post() -> anyhow::Result<()> {
        let request = Request::get("/test-connection").body(Body::empty())?;
        let response = app().oneshot(request).await?;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        Ok(())
    }
}
