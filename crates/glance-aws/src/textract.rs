//! Textract-backed [`TextService`].

use aws_sdk_textract::error::DisplayErrorContext;
use aws_sdk_textract::primitives::Blob;
use aws_sdk_textract::types as sdk;
use glance_core::service::{ServiceError, TextService};
use glance_core::types::{Block, BlockType, DocumentAnalysis, FeatureType, Relationship, RelationshipType};
use std::sync::Arc;
use tokio::runtime::Runtime;

const SERVICE: &str = "textract";

pub struct TextractService {
    runtime: Arc<Runtime>,
    client: aws_sdk_textract::Client,
}

impl TextractService {
    pub(crate) fn new(runtime: Arc<Runtime>, client: aws_sdk_textract::Client) -> Self {
        Self { runtime, client }
    }
}

impl TextService for TextractService {
    fn analyze_document(
        &self,
        document: &[u8],
        features: &[FeatureType],
    ) -> Result<DocumentAnalysis, ServiceError> {
        tracing::debug!(len = document.len(), ?features, "AnalyzeDocument");
        let request = self
            .client
            .analyze_document()
            .document(to_document(document))
            .set_feature_types(Some(features.iter().map(to_sdk_feature).collect()));

        let output = self
            .runtime
            .block_on(request.send())
            .map_err(request_error)?;
        Ok(convert_blocks(output.blocks()))
    }

    fn detect_document_text(&self, document: &[u8]) -> Result<DocumentAnalysis, ServiceError> {
        tracing::debug!(len = document.len(), "DetectDocumentText");
        let request = self
            .client
            .detect_document_text()
            .document(to_document(document));

        let output = self
            .runtime
            .block_on(request.send())
            .map_err(request_error)?;
        Ok(convert_blocks(output.blocks()))
    }
}

fn request_error<E: std::error::Error>(err: E) -> ServiceError {
    ServiceError::Request {
        service: SERVICE,
        message: DisplayErrorContext(err).to_string(),
    }
}

fn to_document(bytes: &[u8]) -> sdk::Document {
    sdk::Document::builder().bytes(Blob::new(bytes)).build()
}

fn to_sdk_feature(feature: &FeatureType) -> sdk::FeatureType {
    match feature {
        FeatureType::Forms => sdk::FeatureType::Forms,
    }
}

fn convert_blocks(blocks: &[sdk::Block]) -> DocumentAnalysis {
    DocumentAnalysis {
        blocks: blocks.iter().map(convert_block).collect(),
    }
}

fn convert_block(block: &sdk::Block) -> Block {
    let block_type = match block.block_type().map(|t| t.as_str()) {
        Some("PAGE") => BlockType::Page,
        Some("LINE") => BlockType::Line,
        Some("WORD") => BlockType::Word,
        Some("KEY_VALUE_SET") => BlockType::KeyValueSet,
        Some("SELECTION_ELEMENT") => BlockType::SelectionElement,
        Some("TABLE") => BlockType::Table,
        Some("CELL") => BlockType::Cell,
        _ => BlockType::Other,
    };

    Block {
        id: block.id().map(str::to_string),
        block_type,
        text: block.text().map(str::to_string),
        confidence: block.confidence(),
        entity_types: block
            .entity_types()
            .iter()
            .map(|e| e.as_str().to_string())
            .collect(),
        relationships: block
            .relationships()
            .iter()
            .map(|r| Relationship {
                kind: match r.r#type().map(|t| t.as_str()) {
                    Some("CHILD") => RelationshipType::Child,
                    Some("VALUE") => RelationshipType::Value,
                    _ => RelationshipType::Other,
                },
                ids: r.ids().to_vec(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_line_block() {
        let block = sdk::Block::builder()
            .id("l1")
            .block_type(sdk::BlockType::Line)
            .text("CARTEIRA NACIONAL")
            .confidence(99.1)
            .relationships(
                sdk::Relationship::builder()
                    .r#type(sdk::RelationshipType::Child)
                    .ids("w1")
                    .ids("w2")
                    .build(),
            )
            .build();

        let converted = convert_block(&block);
        assert_eq!(converted.id.as_deref(), Some("l1"));
        assert_eq!(converted.block_type, BlockType::Line);
        assert_eq!(converted.text.as_deref(), Some("CARTEIRA NACIONAL"));
        assert_eq!(converted.relationships.len(), 1);
        assert_eq!(converted.relationships[0].kind, RelationshipType::Child);
        assert_eq!(converted.relationships[0].ids, vec!["w1", "w2"]);
    }

    #[test]
    fn test_convert_key_block_entity_types() {
        let block = sdk::Block::builder()
            .block_type(sdk::BlockType::KeyValueSet)
            .entity_types(sdk::EntityType::Key)
            .build();

        let converted = convert_block(&block);
        assert_eq!(converted.block_type, BlockType::KeyValueSet);
        assert_eq!(converted.entity_types, vec!["KEY"]);
    }

    #[test]
    fn test_convert_blocks_preserves_order_and_filters_lines() {
        let blocks = vec![
            sdk::Block::builder().block_type(sdk::BlockType::Page).build(),
            sdk::Block::builder()
                .block_type(sdk::BlockType::Line)
                .text("first")
                .build(),
            sdk::Block::builder()
                .block_type(sdk::BlockType::Word)
                .text("first")
                .build(),
            sdk::Block::builder()
                .block_type(sdk::BlockType::Line)
                .text("second")
                .build(),
        ];

        let analysis = convert_blocks(&blocks);
        assert_eq!(analysis.blocks.len(), 4);
        assert_eq!(analysis.lines(), vec!["first", "second"]);
    }

    #[test]
    fn test_convert_block_without_type_is_other() {
        let converted = convert_block(&sdk::Block::builder().build());
        assert_eq!(converted.block_type, BlockType::Other);
    }

    #[test]
    fn test_to_sdk_feature() {
        assert_eq!(to_sdk_feature(&FeatureType::Forms), sdk::FeatureType::Forms);
    }
}
