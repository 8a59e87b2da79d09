//! The health check route.

use axum::{http::StatusCode, Json};
use axum_macros::debug_handler;
use serde::Serialize;

use crate::api::Response;

/// The service name reported by health checks.
const SERVICE_NAME: &str = "Room Image Analysis";

/// Reports that the service is healthy. There's nothing to check beyond the server answering.
///
/// # Errors
///
/// Never fails.
#[expect(clippy::unused_async, reason = "Axum route handlers must be async")]
#[debug_handler]
pub(crate) async fn get() -> Response<GetResponse> {
    Ok((
        StatusCode::OK,
        Json(GetResponse {
            status: "healthy",
            service: SERVICE_NAME,
        }),
    ))
}

/// A `GET` response body for this API route.
#[derive(Serialize, Debug)]
pub(crate) struct GetResponse {
    /// Always `healthy`.
    pub(crate) status: &'static str,

    /// The name of this service.
    pub(crate) service: &'static str,
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};

    use super::*;
    use crate::api::routes::tests::{app, send};

    #[tokio::test]
    async fn health_is_healthy() -> anyhow::Result<()> {
        for _ in 0..3 {
            let (status, body) = send(app(), Request::get("/health").body(Body::empty())?).await?;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "healthy");
            assert_eq!(body["service"], SERVICE_NAME);
        }

        Ok(())
    }
}
