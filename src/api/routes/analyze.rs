//! The route analyzing uploaded room images.

use axum::{
    body::Bytes,
    extract::{Multipart as RawMultipart, State},
    http::StatusCode,
    Json,
};
use axum_macros::debug_handler;

use crate::{
    analysis::{AnalysisResponse, ImageInfo},
    api::{self, Multipart, Response},
    decode::{self, is_image_content_type, DecodeError, DecodedImage},
    id::AnalysisId,
    AppState,
};

/// The name of the form field holding the image.
const IMAGE_FIELD: &str = "image";

/// A file uploaded in a form, read fully into memory.
#[derive(Debug)]
struct Upload {
    /// The file name the client sent, if any.
    filename: Option<String>,

    /// The file's content.
    bytes: Bytes,
}

/// Validates an uploaded room image and returns its analysis.
///
/// The image metadata is real, but the room analysis comes from the state's
/// [`RoomAnalyzer`](crate::analysis::RoomAnalyzer), which is currently a placeholder.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler]
pub(crate) async fn post(
    State(state): State<AppState>,
    Multipart(mut multipart): Multipart,
) -> Response<AnalysisResponse> {
    let upload = read_image_field(&mut multipart, state.max_upload_size).await?;

    let decoding = {
        let bytes = upload.bytes.clone();
        tokio::task::spawn_blocking(move || decode::decode(&bytes))
    };

    let decoded = match decoding.await {
        Ok(Ok(decoded)) => decoded,
        Ok(Err(error)) => {
            if matches!(error, DecodeError::TooLarge(_)) {
                tracing::warn!(
                    filename = ?upload.filename,
                    size = upload.bytes.len(),
                    %error,
                    "rejected image exceeding decoding limits"
                );
            } else {
                tracing::warn!(
                    filename = ?upload.filename,
                    size = upload.bytes.len(),
                    %error,
                    "rejected undecodable image"
                );
            }

            return Err(api::Error::InvalidImageData);
        }
        Err(error) => {
            tracing::error!(
                filename = ?upload.filename,
                size = upload.bytes.len(),
                %error,
                "image decoding task failed"
            );
            return Err(api::Error::Internal(error.to_string()));
        }
    };

    tracing::info!(
        filename = ?upload.filename,
        dimensions = %decoded.metadata.dimensions(),
        format = decoded.metadata.format_name(),
        "decoded image"
    );

    let response = analyze(&state, upload, &decoded);

    tracing::info!(analysis_id = %response.analysis_id, "analysis complete");

    Ok((StatusCode::OK, Json(response)))
}

/// Finds the image field in a form and reads it, checking its declared content type first.
///
/// # Errors
///
/// Fails if the form is malformed or too large, the field is missing, or its declared content type
/// isn't an image type.
async fn read_image_field(
    multipart: &mut RawMultipart,
    max_upload_size: usize,
) -> Result<Upload, api::Error> {
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(IMAGE_FIELD) => break field,
            Ok(Some(_)) => {}
            Ok(None) => return Err(api::Error::MissingImageField),
            Err(error) => {
                tracing::warn!(%error, "failed to read form before the image field");
                return Err(api::Error::from_multipart(&error, max_upload_size));
            }
        }
    };

    let filename = field.file_name().map(str::to_owned);
    let content_type = field.content_type().map(str::to_owned);

    tracing::info!(?filename, ?content_type, "received image analysis request");

    if !is_image_content_type(content_type.as_deref()) {
        tracing::warn!(?filename, ?content_type, "rejected non-image upload");
        return Err(api::Error::InvalidContentType);
    }

    let bytes = field.bytes().await.map_err(|error| {
        tracing::warn!(?filename, %error, "failed to read upload");
        api::Error::from_multipart(&error, max_upload_size)
    })?;

    tracing::info!(?filename, size = bytes.len(), "read upload");

    Ok(Upload { filename, bytes })
}

/// Assembles the analysis of a decoded upload.
fn analyze(state: &AppState, upload: Upload, decoded: &DecodedImage) -> AnalysisResponse {
    let room_analysis = state.analyzer.analyze(&decoded.image);
    let recommendations = state.analyzer.recommend(&room_analysis);

    AnalysisResponse {
        analysis_id: AnalysisId::from_content(&upload.bytes),
        image_info: ImageInfo::new(upload.filename, upload.bytes.len(), &decoded.metadata),
        room_analysis,
        recommendations,
        processing_time: state.analyzer.processing_time(),
    }
}
