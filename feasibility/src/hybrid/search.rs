//! Targeted plus cross-collection retrieval and diversity-capped merging.

use std::collections::{HashMap, HashSet};

use rag_store::{Collection, SearchResult, SourceType, VectorStore};
use tracing::{debug, warn};

use super::intent::{analyze_intent, top_collections};
use crate::cfg::HybridConfig;

/// Full hybrid search: targeted pass, blanket pass, merge, truncate.
///
/// A failing collection is logged and skipped; the others still contribute.
pub async fn hybrid_search(
    store: &dyn VectorStore,
    question: &str,
    cfg: &HybridConfig,
) -> Vec<SearchResult> {
    let scores = analyze_intent(question);
    let targets = top_collections(&scores, 2);
    debug!(?scores, ?targets, "intent scores");

    let primary = targeted_search(store, question, &targets, cfg.targeted_k()).await;
    let context = cross_collection_search(store, question, cfg.cross_k(Collection::ALL.len())).await;

    let mut merged = merge_results(primary, context, cfg.max_per_source);
    merged.truncate(cfg.result_limit);
    merged
}

pub async fn targeted_search(
    store: &dyn VectorStore,
    question: &str,
    targets: &[Collection],
    k: usize,
) -> Vec<SearchResult> {
    if k == 0 {
        return Vec::new();
    }
    let mut out = Vec::new();
    for &c in targets {
        out.extend(search_one(store, c, question, k).await);
    }
    out
}

pub async fn cross_collection_search(
    store: &dyn VectorStore,
    question: &str,
    per_collection: usize,
) -> Vec<SearchResult> {
    let mut out = Vec::new();
    for c in Collection::ALL {
        out.extend(search_one(store, c, question, per_collection).await);
    }
    out
}

async fn search_one(
    store: &dyn VectorStore,
    collection: Collection,
    question: &str,
    k: usize,
) -> Vec<SearchResult> {
    match store.similarity_search(collection, question, k).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!(collection = %collection, error = %e, "collection search failed");
            Vec::new()
        }
    }
}

/// Sorts by distance (ascending), drops exact-content duplicates and keeps at
/// most `max_per_source` results per source type.
pub fn merge_results(
    primary: Vec<SearchResult>,
    context: Vec<SearchResult>,
    max_per_source: usize,
) -> Vec<SearchResult> {
    let mut all: Vec<SearchResult> = primary.into_iter().chain(context).collect();
    all.sort_by(|a, b| a.score.total_cmp(&b.score));

    let mut seen: HashSet<String> = HashSet::new();
    let mut per_source: HashMap<SourceType, usize> = HashMap::new();
    let mut out = Vec::new();
    for r in all {
        if !seen.insert(r.content_hash()) {
            continue;
        }
        let n = per_source.entry(r.source_type).or_default();
        if *n < max_per_source {
            *n += 1;
            out.push(r);
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;

    use rag_store::{HashingEmbedder, MemoryStore, RagDocument, RagError, StoreFuture};
    use serde_json::Map;

    /// Store double: searches in `failing` collections return an error, all
    /// other calls go to the wrapped memory store.
    pub(crate) struct FailingStore {
        pub inner: Arc<MemoryStore>,
        pub failing: Vec<Collection>,
    }

    impl VectorStore for FailingStore {
        fn add_documents<'a>(&'a self, collection: Collection, docs: Vec<RagDocument>) -> StoreFuture<'a, usize> {
            self.inner.add_documents(collection, docs)
        }

        fn similarity_search<'a>(
            &'a self,
            collection: Collection,
            query: &'a str,
            k: usize,
        ) -> StoreFuture<'a, Vec<SearchResult>> {
            if self.failing.contains(&collection) {
                return Box::pin(async move {
                    Err(RagError::Qdrant(format!("{} unreachable", collection.name())))
                });
            }
            self.inner.similarity_search(collection, query, k)
        }

        fn count<'a>(&'a self, collection: Collection) -> StoreFuture<'a, u64> {
            self.inner.count(collection)
        }

        fn backend(&self) -> &'static str {
            "failing"
        }
    }

    fn hit(content: &str, score: f32, source_type: SourceType) -> SearchResult {
        SearchResult {
            content: content.into(),
            metadata: Map::new(),
            score,
            source_type,
        }
    }

    #[test]
    fn merge_dedupes_sorts_and_caps() {
        let primary = vec![
            hit("a", 0.4, SourceType::ApiSpec),
            hit("b", 0.1, SourceType::ApiSpec),
            hit("c", 0.2, SourceType::ApiSpec),
            hit("d", 0.3, SourceType::ApiSpec),
        ];
        let context = vec![
            hit("b", 0.05, SourceType::ApiSpec),
            hit("g", 0.5, SourceType::Glossary),
        ];
        let merged = merge_results(primary, context, 3);
        let contents: Vec<_> = merged.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, ["b", "c", "d", "g"]);
        assert!((merged[0].score - 0.05).abs() < f32::EPSILON);
    }

    #[test]
    fn merged_results_hold_invariants() {
        let mut many = Vec::new();
        for i in 0..20 {
            let st = SourceType::ALL[i % 5];
            many.push(hit(&format!("doc {}", i % 7), i as f32 / 10.0, st));
        }
        let merged = merge_results(many.clone(), many, 3);
        let mut hashes = HashSet::new();
        let mut counts: HashMap<SourceType, usize> = HashMap::new();
        for r in &merged {
            assert!(hashes.insert(r.content_hash()));
            *counts.entry(r.source_type).or_default() += 1;
        }
        assert!(counts.values().all(|n| *n <= 3));
        assert!(merged.windows(2).all(|w| w[0].score <= w[1].score));
    }

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new(Arc::new(HashingEmbedder::new(64)));
        for c in Collection::ALL {
            let docs = (0..3)
                .map(|i| {
                    RagDocument::new(format!("{} document number {i}", c.name()))
                        .with("source_type", c.source_type().as_str())
                })
                .collect();
            store.add_documents(c, docs).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn blank_question_uses_only_cross_collection_pass() {
        let store = seeded_store().await;
        let cfg = HybridConfig::default();
        let results = hybrid_search(&store, "   ", &cfg).await;
        // one per collection from the blanket pass, nothing targeted
        assert_eq!(results.len(), 5);
        let types: HashSet<_> = results.iter().map(|r| r.source_type).collect();
        assert_eq!(types.len(), 5);
    }

    #[tokio::test]
    async fn failing_collection_is_skipped() {
        let store = FailingStore {
            inner: Arc::new(seeded_store().await),
            failing: vec![Collection::GlossaryConcepts],
        };
        let cfg = HybridConfig::default();

        let results = hybrid_search(&store, "   ", &cfg).await;
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.source_type != SourceType::Glossary));

        let results = hybrid_search(&store, "what does the glossary term party mean", &cfg).await;
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.source_type != SourceType::Glossary));
    }

    #[tokio::test]
    async fn every_collection_failing_yields_nothing() {
        let store = FailingStore {
            inner: Arc::new(seeded_store().await),
            failing: Collection::ALL.to_vec(),
        };
        let results = hybrid_search(&store, "which api endpoint", &HybridConfig::default()).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn targeted_question_adds_results() {
        let store = seeded_store().await;
        let cfg = HybridConfig::default();
        let results = hybrid_search(&store, "which api endpoint and glossary term", &cfg).await;
        assert!(results.len() > 5);
        assert!(results.len() <= cfg.result_limit);
    }
}
