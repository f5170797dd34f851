//! In-process [`VectorStore`]: brute-force cosine over per-collection vectors.
//!
//! Nothing is persisted. Scores are `1 - cosine`, so lower is closer.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use crate::collections::Collection;
use crate::embed::EmbeddingsProvider;
use crate::embed_pool::embed_all;
use crate::record::{RagDocument, SearchResult};
use crate::store::{StoreFuture, VectorStore, to_result};

struct StoredRow {
    content: String,
    metadata: Map<String, Value>,
    vector: Vec<f32>,
}

pub struct MemoryStore {
    embedder: Arc<dyn EmbeddingsProvider>,
    concurrency: usize,
    rows: RwLock<HashMap<Collection, Vec<StoredRow>>>,
}

impl MemoryStore {
    pub fn new(embedder: Arc<dyn EmbeddingsProvider>) -> Self {
        Self {
            embedder,
            concurrency: 4,
            rows: RwLock::new(HashMap::new()),
        }
    }
}

pub fn cosine_sim(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a < f32::EPSILON || mag_b < f32::EPSILON {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

impl VectorStore for MemoryStore {
    fn add_documents<'a>(&'a self, collection: Collection, docs: Vec<RagDocument>) -> StoreFuture<'a, usize> {
        Box::pin(async move {
            let vectors = embed_all(&docs, self.embedder.as_ref(), self.embedder.dim(), self.concurrency).await?;
            let n = docs.len();
            let mut rows = self.rows.write().await;
            let bucket = rows.entry(collection).or_default();
            for (d, v) in docs.into_iter().zip(vectors) {
                bucket.push(StoredRow {
                    content: d.content,
                    metadata: d.metadata,
                    vector: v,
                });
            }
            debug!(%collection, added = n, total = bucket.len(), "documents added");
            Ok(n)
        })
    }

    fn similarity_search<'a>(
        &'a self,
        collection: Collection,
        query: &'a str,
        k: usize,
    ) -> StoreFuture<'a, Vec<SearchResult>> {
        Box::pin(async move {
            if k == 0 {
                return Ok(Vec::new());
            }
            let qv = self.embedder.embed(query).await?;
            let rows = self.rows.read().await;
            let Some(bucket) = rows.get(&collection) else {
                return Ok(Vec::new());
            };

            let mut scored: Vec<(f32, &StoredRow)> = bucket
                .iter()
                .map(|r| (1.0 - cosine_sim(&qv, &r.vector), r))
                .collect();
            scored.sort_by(|a, b| a.0.total_cmp(&b.0));
            scored.truncate(k);

            Ok(scored
                .into_iter()
                .map(|(score, r)| to_result(collection, r.content.clone(), r.metadata.clone(), score))
                .collect())
        })
    }

    fn count<'a>(&'a self, collection: Collection) -> StoreFuture<'a, u64> {
        Box::pin(async move {
            Ok(self
                .rows
                .read()
                .await
                .get(&collection)
                .map_or(0, |b| b.len() as u64))
        })
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::SourceType;
    use crate::embed::HashingEmbedder;

    fn store() -> MemoryStore {
        MemoryStore::new(Arc::new(HashingEmbedder::new(128)))
    }

    #[tokio::test]
    async fn search_is_closest_first_and_bounded() {
        let s = store();
        s.add_documents(
            Collection::GlossaryConcepts,
            vec![
                RagDocument::new("Term: Party. A legal entity in a contract").with("source_type", "glossary"),
                RagDocument::new("Term: Template. A predefined contract structure").with("source_type", "glossary"),
                RagDocument::new("Term: Workspace. Logical separation within an account"),
            ],
        )
        .await
        .unwrap();

        let hits = s
            .similarity_search(Collection::GlossaryConcepts, "template predefined structure", 2)
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].content.contains("Template"));
        assert!(hits[0].score <= hits[1].score);
        assert!(hits.iter().all(|h| h.source_type == SourceType::Glossary));
    }

    #[tokio::test]
    async fn duplicates_are_kept_and_counted() {
        let s = store();
        let doc = RagDocument::new("same body");
        s.add_documents(Collection::UseCasesPatterns, vec![doc.clone()]).await.unwrap();
        s.add_documents(Collection::UseCasesPatterns, vec![doc]).await.unwrap();
        assert_eq!(s.count(Collection::UseCasesPatterns).await.unwrap(), 2);
        assert_eq!(s.count(Collection::TutorialsExamples).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn metadata_tag_wins_over_collection_default() {
        let s = store();
        s.add_documents(
            Collection::ApiSpecifications,
            vec![RagDocument::new("api doc").with("source_type", "integration_guide")],
        )
        .await
        .unwrap();
        let hits = s.similarity_search(Collection::ApiSpecifications, "api", 5).await.unwrap();
        assert_eq!(hits[0].source_type, SourceType::IntegrationGuide);
    }

    #[test]
    fn cosine_edges() {
        assert_eq!(cosine_sim(&[], &[]), 0.0);
        assert_eq!(cosine_sim(&[1.0, 0.0], &[0.0, 0.0]), 0.0);
        assert!((cosine_sim(&[1.0, 2.0], &[2.0, 4.0]) - 1.0).abs() < 1e-6);
    }
}
