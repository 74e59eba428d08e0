//! Document OCR call-throughs.
//!
//! Both components degrade on service failure: the error is logged and an
//! empty result is returned. Local file errors are propagated.

use crate::loader::{self, LoadError};
use crate::service::TextService;
use crate::types::{DocumentAnalysis, FeatureType};
use std::path::Path;

/// Form-field extraction over a [`TextService`].
pub struct DocumentAnalyzer<S> {
    service: S,
}

impl<S: TextService> DocumentAnalyzer<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Analyze document bytes for form fields.
    ///
    /// Returns an empty analysis if the service call fails.
    pub fn analyze(&self, document: &[u8]) -> DocumentAnalysis {
        match self
            .service
            .analyze_document(document, &[FeatureType::Forms])
        {
            Ok(analysis) => {
                tracing::debug!(blocks = analysis.blocks.len(), "document analyzed");
                analysis
            }
            Err(e) => {
                tracing::warn!(error = %e, "document analysis failed; returning empty result");
                DocumentAnalysis::default()
            }
        }
    }

    /// Load a document from disk and analyze it.
    pub fn analyze_file(&self, path: impl AsRef<Path>) -> Result<DocumentAnalysis, LoadError> {
        let bytes = loader::load(path)?;
        Ok(self.analyze(&bytes))
    }
}

/// Line-level text detection over a [`TextService`].
pub struct TextLineExtractor<S> {
    service: S,
}

impl<S: TextService> TextLineExtractor<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Detected LINE texts in response order. Empty if the service call fails.
    pub fn extract_lines(&self, document: &[u8]) -> Vec<String> {
        match self.service.detect_document_text(document) {
            Ok(analysis) => analysis.lines(),
            Err(e) => {
                tracing::warn!(error = %e, "text detection failed; returning no lines");
                Vec::new()
            }
        }
    }

    pub fn extract_lines_file(&self, path: impl AsRef<Path>) -> Result<Vec<String>, LoadError> {
        let bytes = loader::load(path)?;
        Ok(self.extract_lines(&bytes))
    }
}
