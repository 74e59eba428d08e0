//! Rekognition-backed [`FaceService`].

use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types as sdk;
use glance_core::service::{FaceService, ServiceError};
use glance_core::types::{BoundingBox, FaceMatch, FaceRecord};
use std::sync::Arc;
use tokio::runtime::Runtime;

const SERVICE: &str = "rekognition";

pub struct RekognitionService {
    runtime: Arc<Runtime>,
    client: aws_sdk_rekognition::Client,
}

impl RekognitionService {
    pub(crate) fn new(runtime: Arc<Runtime>, client: aws_sdk_rekognition::Client) -> Self {
        Self { runtime, client }
    }
}

impl FaceService for RekognitionService {
    fn compare_faces(
        &self,
        source: &[u8],
        target: &[u8],
        threshold: f32,
    ) -> Result<Vec<FaceMatch>, ServiceError> {
        tracing::debug!(
            source_len = source.len(),
            target_len = target.len(),
            threshold,
            "CompareFaces"
        );
        let request = self
            .client
            .compare_faces()
            .source_image(to_image(source))
            .target_image(to_image(target))
            .similarity_threshold(threshold);

        let output = self
            .runtime
            .block_on(request.send())
            .map_err(request_error)?;
        Ok(output.face_matches().iter().filter_map(convert_match).collect())
    }

    fn recognize_celebrities(&self, image: &[u8]) -> Result<Vec<FaceRecord>, ServiceError> {
        tracing::debug!(len = image.len(), "RecognizeCelebrities");
        let request = self.client.recognize_celebrities().image(to_image(image));

        let output = self
            .runtime
            .block_on(request.send())
            .map_err(request_error)?;
        tracing::debug!(
            unrecognized = output.unrecognized_faces().len(),
            "faces without a celebrity match"
        );
        Ok(output
            .celebrity_faces()
            .iter()
            .filter_map(convert_celebrity)
            .collect())
    }
}

fn request_error<E: std::error::Error>(err: E) -> ServiceError {
    ServiceError::Request {
        service: SERVICE,
        message: DisplayErrorContext(err).to_string(),
    }
}

fn to_image(bytes: &[u8]) -> sdk::Image {
    sdk::Image::builder().bytes(Blob::new(bytes)).build()
}

fn convert_box(bbox: &sdk::BoundingBox) -> BoundingBox {
    BoundingBox {
        left: bbox.left().unwrap_or_default(),
        top: bbox.top().unwrap_or_default(),
        width: bbox.width().unwrap_or_default(),
        height: bbox.height().unwrap_or_default(),
    }
}

/// Faces without a bounding box cannot be drawn and are dropped.
fn convert_face(face: &sdk::ComparedFace) -> Option<FaceRecord> {
    let Some(bbox) = face.bounding_box() else {
        tracing::warn!("face without bounding box in response; skipping");
        return None;
    };
    Some(FaceRecord {
        bounding_box: convert_box(bbox),
        name: None,
        confidence: face.confidence(),
    })
}

fn convert_match(m: &sdk::CompareFacesMatch) -> Option<FaceMatch> {
    let face = convert_face(m.face()?)?;
    Some(FaceMatch {
        similarity: m.similarity().unwrap_or_default(),
        face: FaceRecord {
            confidence: m.similarity(),
            ..face
        },
    })
}

fn convert_celebrity(celebrity: &sdk::Celebrity) -> Option<FaceRecord> {
    let face = convert_face(celebrity.face()?)?;
    Some(FaceRecord {
        name: celebrity.name().map(str::to_string),
        confidence: celebrity.match_confidence(),
        ..face
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sdk_box(left: f32, top: f32, width: f32, height: f32) -> sdk::BoundingBox {
        sdk::BoundingBox::builder()
            .left(left)
            .top(top)
            .width(width)
            .height(height)
            .build()
    }

    fn sdk_face(bbox: Option<sdk::BoundingBox>) -> sdk::ComparedFace {
        sdk::ComparedFace::builder()
            .set_bounding_box(bbox)
            .confidence(99.9)
            .build()
    }

    #[test]
    fn test_convert_celebrity() {
        let celebrity = sdk::Celebrity::builder()
            .name("Neymar")
            .id("3Ir0du6")
            .match_confidence(98.5)
            .face(sdk_face(Some(sdk_box(0.4, 0.2, 0.1, 0.15))))
            .build();

        let face = convert_celebrity(&celebrity).unwrap();
        assert_eq!(face.name.as_deref(), Some("Neymar"));
        assert_eq!(face.confidence, Some(98.5));
        assert!((face.bounding_box.left - 0.4).abs() < 1e-6);
        assert!((face.bounding_box.height - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_convert_celebrity_without_face_is_dropped() {
        let celebrity = sdk::Celebrity::builder().name("Nobody").build();
        assert!(convert_celebrity(&celebrity).is_none());
    }

    #[test]
    fn test_convert_match_carries_similarity() {
        let m = sdk::CompareFacesMatch::builder()
            .similarity(97.25)
            .face(sdk_face(Some(sdk_box(0.1, 0.1, 0.2, 0.2))))
            .build();

        let converted = convert_match(&m).unwrap();
        assert_eq!(converted.similarity, 97.25);
        assert_eq!(converted.face.confidence, Some(97.25));
        assert!(converted.face.name.is_none());
    }

    #[test]
    fn test_convert_match_without_box_is_dropped() {
        let m = sdk::CompareFacesMatch::builder()
            .similarity(90.0)
            .face(sdk_face(None))
            .build();
        assert!(convert_match(&m).is_none());
    }

    #[test]
    fn test_convert_box_missing_fields_default_to_zero() {
        let bbox = sdk::BoundingBox::builder().left(0.5).build();
        let converted = convert_box(&bbox);
        assert_eq!(converted.left, 0.5);
        assert_eq!(converted.width, 0.0);
    }
}
