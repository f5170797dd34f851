//! Core data models used by the library.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::collections::SourceType;

/// Text plus flat metadata, as handed to [`crate::VectorStore::add_documents`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RagDocument {
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl RagDocument {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Map::new(),
        }
    }

    /// Builder-style metadata insert.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// `source_type` metadata, when present and recognised.
    pub fn source_type(&self) -> Option<SourceType> {
        self.metadata
            .get("source_type")
            .and_then(Value::as_str)
            .and_then(SourceType::parse)
    }
}

/// One similarity hit.
///
/// `score` is a distance: lower means more similar, whatever the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub content: String,
    pub metadata: Map<String, Value>,
    pub score: f32,
    pub source_type: SourceType,
}

impl SearchResult {
    pub fn content_hash(&self) -> String {
        content_hash(&self.content)
    }

    /// First of `title`, `endpoint` or `term` metadata, for citations.
    pub fn label(&self) -> Option<&str> {
        ["title", "endpoint", "term"]
            .iter()
            .find_map(|k| self.metadata.get(*k).and_then(Value::as_str))
    }
}

/// Hex SHA-256 of `content`.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_content_sensitive() {
        assert_eq!(content_hash("abc"), content_hash("abc"));
        assert_ne!(content_hash("abc"), content_hash("abd"));
        assert_eq!(content_hash("").len(), 64);
    }

    #[test]
    fn source_type_from_metadata() {
        let d = RagDocument::new("x").with("source_type", "glossary");
        assert_eq!(d.source_type(), Some(SourceType::Glossary));
        let d = RagDocument::new("x").with("source_type", "bogus");
        assert_eq!(d.source_type(), None);
    }

    #[test]
    fn label_prefers_title() {
        let r = SearchResult {
            content: "c".into(),
            metadata: RagDocument::new("c")
                .with("term", "party")
                .with("title", "Parties")
                .metadata,
            score: 0.1,
            source_type: SourceType::Glossary,
        };
        assert_eq!(r.label(), Some("Parties"));
    }
}
