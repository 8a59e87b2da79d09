//! Decoding and validation of uploaded images.

use std::io::Cursor;

use image::{error::ImageError, DynamicImage, ImageFormat, ImageReader, Limits};
use thiserror::Error;

/// The metadata of an upload that decoded successfully.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct ImageMetadata {
    /// The width in pixels.
    pub(crate) width: u32,

    /// The height in pixels.
    pub(crate) height: u32,

    /// The format detected from the image's content.
    pub(crate) format: ImageFormat,
}

impl ImageMetadata {
    /// The dimensions formatted as `WIDTHxHEIGHT`.
    pub(crate) fn dimensions(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// The format's conventional upper-case name, e.g. `PNG` or `JPEG`.
    pub(crate) fn format_name(&self) -> &'static str {
        format_name(self.format)
    }
}

/// An uploaded image decoded into memory.
#[derive(Debug)]
pub(crate) struct DecodedImage {
    /// The decoded pixels.
    pub(crate) image: DynamicImage,

    /// The image's metadata.
    pub(crate) metadata: ImageMetadata,
}

/// An error decoding an uploaded image.
#[derive(Error, Debug)]
#[non_exhaustive]
pub(crate) enum DecodeError {
    /// The upload couldn't be read while detecting its format.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The bytes don't start with the signature of any supported image format.
    #[error("unrecognized image format")]
    UnknownFormat,

    /// The image is valid, but decoding it would exceed the decoder's dimension or memory limits.
    #[error("image exceeds decoding limits: {0}")]
    TooLarge(ImageError),

    /// The format was recognized, but the image couldn't be decoded.
    #[error(transparent)]
    Image(ImageError),
}

impl From<ImageError> for DecodeError {
    fn from(error: ImageError) -> Self {
        match error {
            ImageError::Limits(_) => Self::TooLarge(error),
            error => Self::Image(error),
        }
    }
}

/// Returns whether a declared content type is an image type.
pub(crate) fn is_image_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|content_type| content_type.starts_with("image/"))
}

/// Fully decodes an image from its raw bytes, detecting its format from the content rather than any
/// declared type.
///
/// The `image` crate's default [`Limits`] apply, so images needing more than 512 MiB to decode are
/// rejected with [`DecodeError::TooLarge`] even if they're valid. Callers report this like any other
/// decode failure.
///
/// # Errors
///
/// Returns an error if the format isn't recognized, the image data is invalid, or the image is too
/// large to decode.
pub(crate) fn decode(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    decode_with_limits(bytes, Limits::default())
}

/// Like [`decode`], but with custom decoding limits.
///
/// # Errors
///
/// See [`decode`].
fn decode_with_limits(bytes: &[u8], limits: Limits) -> Result<DecodedImage, DecodeError> {
    let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    reader.limits(limits);

    let format = reader.format().ok_or(DecodeError::UnknownFormat)?;
    let image = reader.decode()?;

    Ok(DecodedImage {
        metadata: ImageMetadata {
            width: image.width(),
            height: image.height(),
            format,
        },
        image,
    })
}

/// Returns the conventional upper-case name of an image format.
fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "PNG",
        ImageFormat::Jpeg => "JPEG",
        ImageFormat::Gif => "GIF",
        ImageFormat::WebP => "WEBP",
        ImageFormat::Pnm => "PPM",
        ImageFormat::Tiff => "TIFF",
        ImageFormat::Tga => "TGA",
        ImageFormat::Dds => "DDS",
        ImageFormat::Bmp => "BMP",
        ImageFormat::Ico => "ICO",
        ImageFormat::Hdr => "HDR",
        ImageFormat::OpenExr => "EXR",
        ImageFormat::Farbfeld => "FARBFELD",
        ImageFormat::Avif => "AVIF",
        ImageFormat::Qoi => "QOI",
        _ => "UNKNOWN",
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use image::{ImageBuffer, Rgb};

    use super::*;

    /// Encodes a solid-color image of the specified size and format.
    pub(crate) fn encode_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let pixels = ImageBuffer::from_pixel(width, height, Rgb([180, 120, 60]));
        let image = DynamicImage::ImageRgb8(pixels);

        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), format)
            .expect("image should encode");

        bytes
    }

    #[test]
    fn png_metadata() -> anyhow::Result<()> {
        let decoded = decode(&encode_image(100, 50, ImageFormat::Png))?;

        assert_eq!(decoded.metadata.dimensions(), "100x50");
        assert_eq!(decoded.metadata.format_name(), "PNG");
        assert_eq!(decoded.image.width(), 100);

        Ok(())
    }

    #[test]
    fn format_comes_from_content() -> anyhow::Result<()> {
        let decoded = decode(&encode_image(8, 8, ImageFormat::Jpeg))?;

        assert_eq!(decoded.metadata.format_name(), "JPEG");

        Ok(())
    }

    #[test]
    fn random_bytes_are_rejected() {
        let result = decode(b"definitely not an image, just some text");

        assert!(
            matches!(result, Err(DecodeError::UnknownFormat)),
            "unrecognized bytes should fail with `UnknownFormat`"
        );
    }

    #[test]
    fn truncated_image_is_rejected() {
        let bytes = encode_image(64, 64, ImageFormat::Png);

        decode(&bytes[..bytes.len() / 2]).expect_err("truncated image should be invalid");
    }

    #[test]
    fn oversized_image_is_too_large() {
        let mut limits = Limits::default();
        limits.max_image_width = Some(10);
        limits.max_image_height = Some(10);

        let result = decode_with_limits(&encode_image(20, 20, ImageFormat::Png), limits);

        assert!(
            matches!(result, Err(DecodeError::TooLarge(_))),
            "an image over the limits should fail with `TooLarge`"
        );
    }

    #[test]
    fn image_content_types() {
        assert!(is_image_content_type(Some("image/png")), "`image/png` should be an image");
        assert!(is_image_content_type(Some("image/x-anything")), "any `image/` type should pass");
        assert!(!is_image_content_type(Some("text/plain")), "`text/plain` isn't an image");
        assert!(!is_image_content_type(Some("application/octet-stream")), "binary isn't an image");
        assert!(!is_image_content_type(None), "a missing type isn't an image");
    }
}
