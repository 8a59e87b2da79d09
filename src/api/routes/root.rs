//! The root route, used to check the server is up.

use axum::{http::StatusCode, Json};
use axum_macros::debug_handler;
use serde::Serialize;

use crate::api::Response;

/// Returns a static message saying the server is running.
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
            message: "Room analysis server is running!",
        }),
    ))
}

/// A `GET` response body for this API route.
#[derive(Serialize, Debug)]
pub(crate) struct GetResponse {
    /// A human-readable liveness message.
    pub(crate) message: &'static str,
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};

    use super::*;
    use crate::api::routes::tests::{app, send};

    #[tokio::test]
    async fn root_is_alive() -> anyhow::Result<()> {
        let (status, body) = send(app(), Request::get("/").body(Body::empty())?).await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Room analysis server is running!");

        Ok(())
    }
}
