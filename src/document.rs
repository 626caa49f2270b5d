//! Stored documents and retrieval results

use crate::vector::Embedding;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Open key-value metadata attached to a document. Never interpreted by the store.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Opaque unique identifier assigned at insertion time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generate a fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A stored (text, metadata, embedding) triple.
///
/// The field layout is the on-disk record format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub embedding: Embedding,
}

impl Document {
    pub(crate) fn new(text: String, metadata: Metadata, embedding: Embedding) -> Self {
        Self {
            id: DocumentId::generate(),
            text,
            metadata,
            embedding,
        }
    }
}

/// A retrieved document with its similarity score. The embedding is not exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub text: String,
    pub metadata: Metadata,
    pub score: f64,
}

impl ScoredResult {
    pub(crate) fn from_document(doc: &Document, score: f64) -> Self {
        Self {
            text: doc.text.clone(),
            metadata: doc.metadata.clone(),
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = DocumentId::generate();
        let b = DocumentId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_document_record_layout() {
        let mut metadata = Metadata::new();
        metadata.insert("source".into(), json!("user_preference"));
        let doc = Document {
            id: DocumentId::from("doc-1"),
            text: "deep work in the morning".into(),
            metadata,
            embedding: Embedding::new(vec![0.25, 0.5]),
        };

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "doc-1",
                "text": "deep work in the morning",
                "metadata": {"source": "user_preference"},
                "embedding": [0.25, 0.5],
            })
        );
    }

    #[test]
    fn test_missing_metadata_defaults_to_empty() {
        let doc: Document =
            serde_json::from_str(r#"{"id":"x","text":"t","embedding":[1.0]}"#).unwrap();
        assert!(doc.metadata.is_empty());
    }

    #[test]
    fn test_scored_result_omits_embedding() {
        let doc = Document::new("t".into(), Metadata::new(), Embedding::new(vec![1.0]));
        let value = serde_json::to_value(ScoredResult::from_document(&doc, 0.5)).unwrap();
        assert!(value.get("embedding").is_none());
        assert_eq!(value["score"], json!(0.5));
    }
}
