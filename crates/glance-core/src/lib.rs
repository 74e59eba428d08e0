//! glance-core — Document OCR and face-recognition call-throughs, and
//! bounding-box annotation.
//!
//! Remote services are reached through the [`TextService`] and
//! [`FaceService`] traits. The call-through components degrade to empty
//! results when the service fails; local file, font and image errors are
//! propagated.

pub mod analysis;
pub mod annotate;
pub mod faces;
pub mod geometry;
pub mod loader;
pub mod service;
pub mod types;

pub use analysis::{DocumentAnalyzer, TextLineExtractor};
pub use annotate::{AnnotateError, AnnotationStyle, BoxAnnotator};
pub use faces::{CelebrityRecognizer, FaceComparator, DEFAULT_SIMILARITY_THRESHOLD};
pub use loader::LoadError;
pub use service::{FaceService, ServiceError, TextService};
pub use types::{BoundingBox, DocumentAnalysis, FaceMatch, FaceRecord, FeatureType};
