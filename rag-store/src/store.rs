//! The vector-store capability shared by both backends.

use std::{future::Future, pin::Pin};

use crate::collections::Collection;
use crate::errors::RagError;
use crate::record::{RagDocument, SearchResult};

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RagError>> + Send + 'a>>;

/// Append and similarity search over the five collections.
///
/// Implementations embed text themselves and report scores as distances
/// (lower is more similar). Adding the same content twice stores it twice.
pub trait VectorStore: Send + Sync {
    /// Embeds and appends `docs`; returns how many were stored.
    fn add_documents<'a>(&'a self, collection: Collection, docs: Vec<RagDocument>) -> StoreFuture<'a, usize>;

    /// Up to `k` nearest documents, closest first.
    fn similarity_search<'a>(
        &'a self,
        collection: Collection,
        query: &'a str,
        k: usize,
    ) -> StoreFuture<'a, Vec<SearchResult>>;

    fn count<'a>(&'a self, collection: Collection) -> StoreFuture<'a, u64>;

    /// Short backend name for status output.
    fn backend(&self) -> &'static str;
}

/// Builds a [`SearchResult`]; the tag comes from `source_type` metadata when
/// valid, otherwise from the collection.
pub(crate) fn to_result(
    collection: Collection,
    content: String,
    metadata: serde_json::Map<String, serde_json::Value>,
    score: f32,
) -> SearchResult {
    let source_type = metadata
        .get("source_type")
        .and_then(serde_json::Value::as_str)
        .and_then(crate::collections::SourceType::parse)
        .unwrap_or_else(|| collection.source_type());
    SearchResult {
        content,
        metadata,
        score,
        source_type,
    }
}
