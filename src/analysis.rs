//! Room analysis results and the analyzers producing them.

use image::DynamicImage;
use serde::Serialize;

use crate::{decode::ImageMetadata, id::AnalysisId};

/// The processing time reported by [`PlaceholderAnalyzer`]. It isn't measured.
const PLACEHOLDER_PROCESSING_TIME: &str = "2.5s";

/// The full result of analyzing an uploaded image.
#[derive(Serialize, Clone, PartialEq, Debug)]
pub(crate) struct AnalysisResponse {
    /// Facts about the uploaded file itself.
    pub(crate) image_info: ImageInfo,

    /// What the analyzer found in the room.
    pub(crate) room_analysis: RoomAnalysis,

    /// Furniture suggested for the room.
    pub(crate) recommendations: Vec<Recommendation>,

    /// How long the analysis took, e.g. `2.5s`.
    pub(crate) processing_time: String,

    /// See [`AnalysisId`].
    pub(crate) analysis_id: AnalysisId,
}

/// Facts about an uploaded image file.
#[derive(Serialize, Clone, PartialEq, Eq, Debug)]
pub(crate) struct ImageInfo {
    /// The file name the client sent, if any.
    pub(crate) filename: Option<String>,

    /// The upload's size in bytes.
    pub(crate) size: usize,

    /// The image's dimensions as `WIDTHxHEIGHT`.
    pub(crate) dimensions: String,

    /// The image format detected from the content, e.g. `PNG`.
    pub(crate) format: &'static str,
}

impl ImageInfo {
    /// Describes an upload from its file name, size and decoded metadata.
    pub(crate) fn new(filename: Option<String>, size: usize, metadata: &ImageMetadata) -> Self {
        Self {
            filename,
            size,
            dimensions: metadata.dimensions(),
            format: metadata.format_name(),
        }
    }
}

/// What was detected in a room.
#[derive(Serialize, Clone, PartialEq, Debug)]
pub(crate) struct RoomAnalysis {
    /// The kind of room, e.g. `living_room`.
    pub(crate) room_type: String,

    /// Every piece of furniture detected.
    pub(crate) furniture_detected: Vec<DetectedFurniture>,

    /// The dominant color scheme.
    pub(crate) color_scheme: String,

    /// The kind of lighting.
    pub(crate) lighting: String,

    /// The interior design style.
    pub(crate) style_detected: String,
}

/// A piece of furniture detected in an image.
#[derive(Serialize, Clone, PartialEq, Debug)]
pub(crate) struct DetectedFurniture {
    /// The kind of furniture, e.g. `sofa`.
    #[serde(rename = "type")]
    pub(crate) kind: String,

    /// How confident the detection is, from 0 to 1.
    pub(crate) confidence: f64,

    /// The bounding box in pixels as `[x1, y1, x2, y2]`.
    pub(crate) bbox: [u32; 4],
}

/// A piece of furniture suggested for a room.
#[derive(Serialize, Clone, PartialEq, Eq, Debug)]
pub(crate) struct Recommendation {
    /// The kind of furniture suggested.
    pub(crate) furniture_type: String,

    /// Why it's suggested.
    pub(crate) reason: String,

    /// How important the suggestion is.
    pub(crate) priority: Priority,
}

/// The importance of a [`Recommendation`].
#[derive(Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Priority {
    /// Noticeably improves the room.
    Medium,

    /// Strongly suggested.
    High,
}

/// Something that analyzes room images.
pub(crate) trait RoomAnalyzer: Send + Sync {
    /// A short name identifying this analyzer in logs.
    fn name(&self) -> &'static str;

    /// Analyzes the contents of a room.
    fn analyze(&self, image: &DynamicImage) -> RoomAnalysis;

    /// Suggests furniture for a room based on its analysis.
    fn recommend(&self, analysis: &RoomAnalysis) -> Vec<Recommendation>;

    /// Describes how long analyses take.
    fn processing_time(&self) -> String;
}

/// A stand-in analyzer until a real model exists. It ignores the image and always returns the same
/// fabricated analysis.
#[derive(Clone, Copy, Default, Debug)]
pub(crate) struct PlaceholderAnalyzer;

impl RoomAnalyzer for PlaceholderAnalyzer {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn analyze(&self, _image: &DynamicImage) -> RoomAnalysis {
        let furniture = |kind: &str, confidence, bbox| DetectedFurniture {
            kind: kind.into(),
            confidence,
            bbox,
        };

        RoomAnalysis {
            room_type: "living_room".into(),
            furniture_detected: vec![
                furniture("sofa", 0.95, [100, 200, 300, 400]),
                furniture("table", 0.87, [200, 300, 400, 450]),
                furniture("tv", 0.91, [50, 100, 250, 200]),
            ],
            color_scheme: "warm_brown".into(),
            lighting: "natural".into(),
            style_detected: "modern".into(),
        }
    }

    fn recommend(&self, _analysis: &RoomAnalysis) -> Vec<Recommendation> {
        vec![
            Recommendation {
                furniture_type: "chair".into(),
                reason: "A chair that goes well with the sofa".into(),
                priority: Priority::High,
            },
            Recommendation {
                furniture_type: "lamp".into(),
                reason: "A standing lamp to improve the lighting".into(),
                priority: Priority::Medium,
            },
        ]
    }

    fn processing_time(&self) -> String {
        PLACEHOLDER_PROCESSING_TIME.into()
    }
}

#[cfg(test)]
mod tests {
    use image::{ImageBuffer, Rgb};

    use super::*;

    #[test]
    fn placeholder_ignores_image_content() {
        let dark = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(4, 4, Rgb([0, 0, 0])));
        let light = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(640, 480, Rgb([255; 3])));

        let analyzer = PlaceholderAnalyzer;

        assert_eq!(analyzer.analyze(&dark), analyzer.analyze(&light));
    }

    #[test]
    fn placeholder_analysis_shape() -> anyhow::Result<()> {
        let analyzer = PlaceholderAnalyzer;
        let analysis = analyzer.analyze(&DynamicImage::new_rgb8(1, 1));

        let json = serde_json::to_value(&analysis)?;

        assert_eq!(json["room_type"], "living_room");
        assert_eq!(json["furniture_detected"][0]["type"], "sofa");
        assert_eq!(
            json["furniture_detected"][2]["bbox"],
            serde_json::json!([50, 100, 250, 200])
        );

        let recommendations = serde_json::to_value(analyzer.recommend(&analysis))?;

        assert_eq!(recommendations[0]["furniture_type"], "chair");
        assert_eq!(recommendations[0]["priority"], "high");
        assert_eq!(recommendations[1]["priority"], "medium");

        Ok(())
    }
}
