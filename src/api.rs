//! The HTTP API for room image analysis.

mod routes;

use axum::{
    async_trait,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, FromRequest, Request,
    },
    http::StatusCode,
    response::IntoResponse,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

/// Builds the API router with its middleware.
///
/// All origins, methods and headers are allowed by CORS. That's only acceptable while the service
/// returns placeholder data and has nothing to protect.
pub(crate) fn router(state: AppState) -> Router {
    routes::router()
        .layer(DefaultBodyLimit::max(state.max_upload_size))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// An API error.
#[derive(Error, Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub(crate) enum Error {
    /// The requested API route doesn't exist.
    #[error("Not found.")]
    RouteNotFound,

    /// The request body isn't valid `multipart/form-data`.
    #[error("Invalid multipart form data: {0}")]
    InvalidMultipart(String),

    /// The request body exceeds the upload size limit.
    #[error("The upload is too large. At most {0} bytes are allowed.")]
    PayloadTooLarge(usize),

    /// The form has no `image` field.
    #[error("No image file was provided in the `image` field.")]
    MissingImageField,

    /// The upload's declared content type isn't an image type.
    #[error("Only image files can be uploaded.")]
    InvalidContentType,

    /// The upload doesn't decode as a supported image.
    #[error("Invalid image file.")]
    InvalidImageData,

    /// An unexpected failure occurred while processing the request.
    #[error("An error occurred during analysis: {0}")]
    Internal(String),
}

impl Error {
    /// Gets the HTTP response status code corresponding to the API error.
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::InvalidMultipart(_) | Self::InvalidContentType | Self::InvalidImageData => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MissingImageField => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts an error reading a multipart field, given the upload size limit in bytes.
    pub(crate) fn from_multipart(error: &MultipartError, max_upload_size: usize) -> Self {
        match error.status() {
            StatusCode::PAYLOAD_TOO_LARGE => Self::PayloadTooLarge(max_upload_size),
            StatusCode::BAD_REQUEST => Self::InvalidMultipart(error.body_text()),
            _ => Self::Internal(error.body_text()),
        }
    }
}

impl From<MultipartRejection> for Error {
    fn from(rejection: MultipartRejection) -> Self {
        Self::InvalidMultipart(rejection.body_text())
    }
}

/// An API error response body.
#[derive(Serialize, Debug)]
struct ErrorBody {
    /// A human-readable description of the error.
    detail: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (
            status,
            Json(ErrorBody {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// A `multipart/form-data` request body extractor which rejects with an API error.
pub(crate) struct Multipart(pub(crate) axum::extract::Multipart);

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for Multipart {
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            axum::extract::Multipart::from_request(request, state).await?,
        ))
    }
}

/// A response from an API route handler.
pub(crate) type Response<T> = Result<(StatusCode, Json<T>), Error>;
