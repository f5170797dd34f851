//! Routing of externally supplied documents into collections.

use std::collections::BTreeMap;

use chrono::Utc;
use doc_loader::IntegrationDocument;
use rag_store::{Collection, RagDocument, SourceType};
use serde::{Deserialize, Serialize};

/// Tag written on every ingested document, whatever collection it lands in.
/// Retrieval reads this tag back as the result's source type.
pub const INGESTED_SOURCE_TYPE: SourceType = SourceType::IntegrationGuide;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestDocument {
    pub content: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub complexity: Option<String>,
    #[serde(default)]
    pub integration_level: Option<String>,
}

impl From<&IntegrationDocument> for IngestDocument {
    fn from(d: &IntegrationDocument) -> Self {
        Self {
            content: d.content.clone(),
            title: Some(d.title.clone()),
            doc_type: Some(d.doc_type.as_str().to_string()),
            complexity: Some(d.complexity.as_str().to_string()),
            integration_level: Some(d.integration_level.as_str().to_string()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub added: usize,
    pub by_collection: BTreeMap<String, usize>,
}

/// Unknown or missing types go to the integration guides.
pub fn target_collection(doc_type: Option<&str>) -> Collection {
    match doc_type.map(str::trim) {
        Some("api") => Collection::ApiSpecifications,
        Some("integration") => Collection::IntegrationGuides,
        Some("tutorial") => Collection::TutorialsExamples,
        Some("glossary") => Collection::GlossaryConcepts,
        Some("use_case") => Collection::UseCasesPatterns,
        _ => Collection::IntegrationGuides,
    }
}

fn or_default(v: &Option<String>, default: &str) -> String {
    v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

pub fn to_rag_document(doc: &IngestDocument) -> RagDocument {
    RagDocument::new(doc.content.clone())
        .with("source_type", INGESTED_SOURCE_TYPE.as_str())
        .with("title", or_default(&doc.title, "Untitled"))
        .with("complexity", or_default(&doc.complexity, "medium"))
        .with("integration_level", or_default(&doc.integration_level, "application"))
        .with("added_date", Utc::now().to_rfc3339())
}

/// Buckets documents by target collection, keeping input order inside each bucket.
pub fn route(docs: &[IngestDocument]) -> BTreeMap<Collection, Vec<RagDocument>> {
    let mut out: BTreeMap<Collection, Vec<RagDocument>> = BTreeMap::new();
    for d in docs {
        out.entry(target_collection(d.doc_type.as_deref()))
            .or_default()
            .push(to_rag_document(d));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(doc_type: Option<&str>) -> IngestDocument {
        IngestDocument {
            content: "Contracts can be created through POST /contracts/create.".into(),
            doc_type: doc_type.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn type_mapping() {
        assert_eq!(target_collection(Some("api")), Collection::ApiSpecifications);
        assert_eq!(target_collection(Some("use_case")), Collection::UseCasesPatterns);
        assert_eq!(target_collection(Some("whitepaper")), Collection::IntegrationGuides);
        assert_eq!(target_collection(None), Collection::IntegrationGuides);
    }

    #[test]
    fn api_document_keeps_integration_guide_tag() {
        let routed = route(&[doc(Some("api"))]);
        let docs = &routed[&Collection::ApiSpecifications];
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source_type(), Some(SourceType::IntegrationGuide));
        assert_eq!(docs[0].metadata["title"], "Untitled");
        assert_eq!(docs[0].metadata["complexity"], "medium");
        assert_eq!(docs[0].metadata["integration_level"], "application");
        assert!(docs[0].metadata.contains_key("added_date"));
    }

    #[test]
    fn json_shape_uses_type_key() {
        let d: IngestDocument = serde_json::from_value(serde_json::json!({
            "content": "Glossary: a party is a legal entity.",
            "title": "Parties",
            "type": "glossary"
        }))
        .unwrap();
        assert_eq!(d.doc_type.as_deref(), Some("glossary"));
        assert_eq!(route(&[d]).keys().copied().collect::<Vec<_>>(), [Collection::GlossaryConcepts]);
    }
}
