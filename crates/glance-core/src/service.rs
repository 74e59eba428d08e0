//! Remote service seam.
//!
//! The document and face services are consumed through these traits so that
//! components receive an explicitly constructed client handle. Production
//! implementations live in `glance-aws`; tests use in-memory doubles.

use crate::types::{DocumentAnalysis, FaceMatch, FaceRecord, FeatureType};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{service} request failed: {message}")]
    Request {
        service: &'static str,
        message: String,
    },
}

/// Document text and form extraction.
pub trait TextService {
    /// Analyze a document for the requested features.
    fn analyze_document(
        &self,
        document: &[u8],
        features: &[FeatureType],
    ) -> Result<DocumentAnalysis, ServiceError>;

    /// Detect lines and words of text in a document.
    fn detect_document_text(&self, document: &[u8]) -> Result<DocumentAnalysis, ServiceError>;
}

/// Face comparison and celebrity identification.
pub trait FaceService {
    /// Compare the largest face in `source` against every face in `target`,
    /// returning matches with similarity >= `threshold` percent.
    fn compare_faces(
        &self,
        source: &[u8],
        target: &[u8],
        threshold: f32,
    ) -> Result<Vec<FaceMatch>, ServiceError>;

    /// Identify celebrities in an image. Records carry the celebrity name.
    fn recognize_celebrities(&self, image: &[u8]) -> Result<Vec<FaceRecord>, ServiceError>;
}

impl<T: TextService + ?Sized> TextService for &T {
    fn analyze_document(
        &self,
        document: &[u8],
        features: &[FeatureType],
    ) -> Result<DocumentAnalysis, ServiceError> {
        (**self).analyze_document(document, features)
    }

    fn detect_document_text(&self, document: &[u8]) -> Result<DocumentAnalysis, ServiceError> {
        (**self).detect_document_text(document)
    }
}

impl<T: FaceService + ?Sized> FaceService for &T {
    fn compare_faces(
        &self,
        source: &[u8],
        target: &[u8],
        threshold: f32,
    ) -> Result<Vec<FaceMatch>, ServiceError> {
        (**self).compare_faces(source, target, threshold)
    }

    fn recognize_celebrities(&self, image: &[u8]) -> Result<Vec<FaceRecord>, ServiceError> {
        (**self).recognize_celebrities(image)
    }
}
