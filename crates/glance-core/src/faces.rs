//! Face comparison and celebrity recognition call-throughs.
//!
//! Service failures degrade to an empty sequence with a warning. A missing
//! input image is propagated as [`LoadError::NotFound`].

use crate::loader::{self, LoadError};
use crate::service::FaceService;
use crate::types::{FaceMatch, FaceRecord};
use std::path::Path;

/// Similarity percentage used when the caller does not pick one.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 80.0;

pub struct FaceComparator<S> {
    service: S,
}

impl<S: FaceService> FaceComparator<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Compare the face in `source_path` against faces in `target_path`.
    ///
    /// `threshold` is an inclusive lower bound on similarity, in percent. It
    /// is passed to the service as-is; results are not re-filtered here.
    pub fn compare(
        &self,
        source_path: impl AsRef<Path>,
        target_path: impl AsRef<Path>,
        threshold: f32,
    ) -> Result<Vec<FaceMatch>, LoadError> {
        let source = loader::load(source_path)?;
        let target = loader::load(target_path)?;

        match self.service.compare_faces(&source, &target, threshold) {
            Ok(matches) => {
                tracing::debug!(matches = matches.len(), threshold, "faces compared");
                Ok(matches)
            }
            Err(e) => {
                tracing::warn!(error = %e, "face comparison failed; returning no matches");
                Ok(Vec::new())
            }
        }
    }
}

pub struct CelebrityRecognizer<S> {
    service: S,
}

impl<S: FaceService> CelebrityRecognizer<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Identify celebrities in a photo. Each record carries the name and
    /// the service's match confidence.
    pub fn recognize(&self, photo_path: impl AsRef<Path>) -> Result<Vec<FaceRecord>, LoadError> {
        let image = loader::load(photo_path)?;

        match self.service.recognize_celebrities(&image) {
            Ok(faces) => {
                tracing::debug!(faces = faces.len(), "celebrities recognized");
                Ok(faces)
            }
            Err(e) => {
                tracing::warn!(error = %e, "celebrity recognition failed; returning no faces");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ServiceError;
    use crate::types::BoundingBox;
    use std::cell::Cell;
    use tempfile::TempDir;

    struct CannedFaces {
        matches: Option<Vec<FaceMatch>>,
        celebrities: Option<Vec<FaceRecord>>,
        last_threshold: Cell<Option<f32>>,
    }

    impl CannedFaces {
        fn new(matches: Option<Vec<FaceMatch>>, celebrities: Option<Vec<FaceRecord>>) -> Self {
            Self {
                matches,
                celebrities,
                last_threshold: Cell::new(None),
            }
        }
    }

    fn unavailable() -> ServiceError {
        ServiceError::Request {
            service: "rekognition",
            message: "ServiceUnavailable".into(),
        }
    }

    impl FaceService for CannedFaces {
        fn compare_faces(
            &self,
            _source: &[u8],
            _target: &[u8],
            threshold: f32,
        ) -> Result<Vec<FaceMatch>, ServiceError> {
            self.last_threshold.set(Some(threshold));
            self.matches.clone().ok_or_else(unavailable)
        }

        fn recognize_celebrities(&self, _image: &[u8]) -> Result<Vec<FaceRecord>, ServiceError> {
            self.celebrities.clone().ok_or_else(unavailable)
        }
    }

    fn images() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("neymar.jpg");
        let target = dir.path().join("msn.jpg");
        std::fs::write(&source, b"source").unwrap();
        std::fs::write(&target, b"target").unwrap();
        (dir, source, target)
    }

    fn face_match(similarity: f32) -> FaceMatch {
        FaceMatch {
            similarity,
            face: FaceRecord::new(BoundingBox {
                left: 0.1,
                top: 0.1,
                width: 0.2,
                height: 0.2,
            })
            .with_confidence(99.9),
        }
    }

    #[test]
    fn test_compare_empty_matches_is_empty_not_error() {
        let (_dir, source, target) = images();
        let comparator = FaceComparator::new(CannedFaces::new(Some(vec![]), None));

        let matches = comparator
            .compare(&source, &target, DEFAULT_SIMILARITY_THRESHOLD)
            .unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_compare_passes_threshold_through() {
        let (_dir, source, target) = images();
        let service = CannedFaces::new(Some(vec![face_match(97.5)]), None);
        let comparator = FaceComparator::new(&service);

        let matches = comparator.compare(&source, &target, 92.0).unwrap();
        assert_eq!(matches.len(), 1);
        assert!((matches[0].similarity - 97.5).abs() < 1e-6);
        assert_eq!(service.last_threshold.get(), Some(92.0));
    }

    #[test]
    fn test_compare_does_not_refilter_results() {
        // The service owns the threshold; a result below it is passed through.
        let (_dir, source, target) = images();
        let comparator = FaceComparator::new(CannedFaces::new(Some(vec![face_match(50.0)]), None));

        let matches = comparator.compare(&source, &target, 80.0).unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_compare_degrades_on_service_error() {
        let (_dir, source, target) = images();
        let comparator = FaceComparator::new(CannedFaces::new(None, None));

        let matches = comparator.compare(&source, &target, 80.0).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_compare_missing_target_propagates() {
        let (dir, source, _target) = images();
        let comparator = FaceComparator::new(CannedFaces::new(Some(vec![]), None));

        let result = comparator.compare(&source, dir.path().join("nope.jpg"), 80.0);
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[test]
    fn test_recognize_returns_named_faces() {
        let (_dir, photo, _) = images();
        let face = FaceRecord::new(BoundingBox {
            left: 0.4,
            top: 0.2,
            width: 0.1,
            height: 0.15,
        })
        .with_name("Neymar")
        .with_confidence(99.0);
        let recognizer = CelebrityRecognizer::new(CannedFaces::new(None, Some(vec![face.clone()])));

        assert_eq!(recognizer.recognize(&photo).unwrap(), vec![face]);
    }

    #[test]
    fn test_recognize_degrades_on_service_error() {
        let (_dir, photo, _) = images();
        let recognizer = CelebrityRecognizer::new(CannedFaces::new(None, None));
        assert!(recognizer.recognize(&photo).unwrap().is_empty());
    }

    #[test]
    fn test_recognize_missing_photo_propagates() {
        let recognizer = CelebrityRecognizer::new(CannedFaces::new(None, Some(vec![])));
        let result = recognizer.recognize("/nonexistent/torcedores.jpg");
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }
}
