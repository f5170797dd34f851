//! Qdrant-backed [`VectorStore`].

use std::sync::Arc;

use qdrant_client::qdrant::{PointId, PointStruct};
use tracing::{debug, info};
use uuid::Uuid;

use crate::collections::Collection;
use crate::config::RagConfig;
use crate::embed::EmbeddingsProvider;
use crate::embed_pool::embed_all;
use crate::errors::RagError;
use crate::payload::{from_payload, to_payload};
use crate::qdrant_facade::QdrantFacade;
use crate::record::{RagDocument, SearchResult};
use crate::store::{StoreFuture, VectorStore, to_result};

pub struct QdrantStore {
    cfg: RagConfig,
    client: QdrantFacade,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl QdrantStore {
    /// Connects and makes sure all five collections exist.
    ///
    /// # Errors
    /// Config validation, a vector size different from the embedder's, or
    /// Qdrant failures.
    pub async fn connect(cfg: RagConfig, embedder: Arc<dyn EmbeddingsProvider>) -> Result<Self, RagError> {
        if embedder.dim() != cfg.vector_size {
            return Err(RagError::VectorSizeMismatch {
                got: embedder.dim(),
                want: cfg.vector_size,
            });
        }
        let client = QdrantFacade::new(&cfg)?;
        let space = cfg.space();
        for c in Collection::ALL {
            client.ensure_collection(&cfg.collection_name(c), &space).await?;
        }
        info!(url = %cfg.qdrant_url, prefix = %cfg.collection_prefix, "qdrant store ready");
        Ok(Self {
            cfg,
            client,
            embedder,
        })
    }
}

impl VectorStore for QdrantStore {
    fn add_documents<'a>(&'a self, collection: Collection, docs: Vec<RagDocument>) -> StoreFuture<'a, usize> {
        Box::pin(async move {
            if docs.is_empty() {
                return Ok(0);
            }
            let vectors = embed_all(
                &docs,
                self.embedder.as_ref(),
                self.cfg.vector_size,
                self.cfg.embedding_concurrency,
            )
            .await?;

            let points: Vec<PointStruct> = docs
                .iter()
                .zip(vectors)
                .map(|(d, v)| {
                    let id: PointId = Uuid::new_v4().to_string().into();
                    PointStruct {
                        id: Some(id),
                        payload: to_payload(&d.content, &d.metadata),
                        vectors: Some(v.into()),
                        ..Default::default()
                    }
                })
                .collect();

            let name = self.cfg.collection_name(collection);
            let n = self.client.upsert_points(&name, points).await?;
            debug!(collection = %name, added = n, "documents added");
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
            let name = self.cfg.collection_name(collection);
            let hits = self
                .client
                .search(&name, qv, k as u64, self.cfg.exact_search)
                .await?;
            Ok(hits
                .into_iter()
                .map(|(score, payload)| {
                    let (content, metadata) = from_payload(payload);
                    to_result(collection, content, metadata, score)
                })
                .collect())
        })
    }

    fn count<'a>(&'a self, collection: Collection) -> StoreFuture<'a, u64> {
        Box::pin(async move { self.client.count(&self.cfg.collection_name(collection)).await })
    }

    fn backend(&self) -> &'static str {
        "qdrant"
    }
}
