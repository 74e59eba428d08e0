use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Face bounding box as fractions of the image dimensions.
///
/// Values are normally in [0, 1] but the services may return boxes that
/// extend past the image edge; they are kept as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// A detected face, optionally identified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FaceRecord {
    pub bounding_box: BoundingBox,
    /// Display name (celebrity recognition only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Match confidence or similarity score, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl FaceRecord {
    pub fn new(bounding_box: BoundingBox) -> Self {
        Self {
            bounding_box,
            name: None,
            confidence: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// One face in the target image that matched the source face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FaceMatch {
    /// Similarity in percent [0, 100].
    pub similarity: f32,
    pub face: FaceRecord,
}

/// Text-analysis feature requested from the document service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureType {
    Forms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    Page,
    Line,
    Word,
    KeyValueSet,
    SelectionElement,
    Table,
    Cell,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    Child,
    Value,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Relationship {
    #[serde(rename = "Type")]
    pub kind: RelationshipType,
    #[serde(default)]
    pub ids: Vec<String>,
}

/// One element of a document-analysis response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub block_type: BlockType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// "KEY" or "VALUE" for KEY_VALUE_SET blocks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entity_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
}

impl Block {
    pub fn new(block_type: BlockType) -> Self {
        Self {
            id: None,
            block_type,
            text: None,
            confidence: None,
            entity_types: Vec::new(),
            relationships: Vec::new(),
        }
    }

    fn related(&self, kind: RelationshipType) -> impl Iterator<Item = &str> + '_ {
        self.relationships
            .iter()
            .filter(move |r| r.kind == kind)
            .flat_map(|r| r.ids.iter().map(String::as_str))
    }
}

/// Structured response of the document-analysis service.
///
/// The default value (no blocks) is the degraded result returned when the
/// service call fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentAnalysis {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl DocumentAnalysis {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Text of LINE blocks, in response order.
    pub fn lines(&self) -> Vec<String> {
        self.blocks
            .iter()
            .filter(|b| b.block_type == BlockType::Line)
            .filter_map(|b| b.text.clone())
            .collect()
    }

    /// Resolve FORMS output into `(key, value)` text pairs, in key order.
    ///
    /// Each side's text is the CHILD WORD texts joined by a single space.
    /// A key with no VALUE block maps to an empty string.
    pub fn key_values(&self) -> Vec<(String, String)> {
        let by_id: HashMap<&str, &Block> = self
            .blocks
            .iter()
            .filter_map(|b| b.id.as_deref().map(|id| (id, b)))
            .collect();

        let child_text = |block: &Block| -> String {
            block
                .related(RelationshipType::Child)
                .filter_map(|id| by_id.get(id))
                .filter(|b| b.block_type == BlockType::Word)
                .filter_map(|b| b.text.as_deref())
                .collect::<Vec<_>>()
                .join(" ")
        };

        self.blocks
            .iter()
            .filter(|b| {
                b.block_type == BlockType::KeyValueSet && b.entity_types.iter().any(|e| e == "KEY")
            })
            .map(|key| {
                let value = key
                    .related(RelationshipType::Value)
                    .find_map(|id| by_id.get(id))
                    .map(|v| child_text(v))
                    .unwrap_or_default();
                (child_text(key), value)
            })
            .collect()
    }
}
