//! Runtime and collection configuration.

use crate::collections::Collection;
use crate::errors::RagError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine similarity (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Describes the vector space of a collection.
#[derive(Clone, Debug)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Configuration shared by every collection.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Prepended to every collection name (`"" + "api_specifications"` by default).
    pub collection_prefix: String,
    /// Embedding dimensionality; every collection uses the same space.
    pub vector_size: usize,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
    /// Maximum number of in-flight embedding requests during ingestion.
    pub embedding_concurrency: usize,
}

impl RagConfig {
    /// Creates a sane default config for a given Qdrant endpoint.
    pub fn new_default(url: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection_prefix: String::new(),
            vector_size: 1536,
            distance: DistanceKind::Cosine,
            exact_search: false,
            embedding_concurrency: 4,
        }
    }

    /// Reads `QDRANT_URL`, `QDRANT_API_KEY`, `RAG_COLLECTION_PREFIX`,
    /// `EMBEDDING_DIM` and `EMBEDDING_CONCURRENCY`.
    pub fn from_env() -> Self {
        let mut cfg = Self::new_default(
            std::env::var("QDRANT_URL").unwrap_or_else(|_| "http://127.0.0.1:6334".into()),
        );
        cfg.qdrant_api_key = std::env::var("QDRANT_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty());
        cfg.collection_prefix = std::env::var("RAG_COLLECTION_PREFIX").unwrap_or_default();
        if let Some(n) = std::env::var("EMBEDDING_DIM").ok().and_then(|s| s.parse().ok()) {
            cfg.vector_size = n;
        }
        if let Some(n) = std::env::var("EMBEDDING_CONCURRENCY")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            cfg.embedding_concurrency = n;
        }
        cfg
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.vector_size == 0 {
            return Err(RagError::Config("vector_size must be > 0".into()));
        }
        if self.embedding_concurrency == 0 {
            return Err(RagError::Config("embedding_concurrency must be > 0".into()));
        }
        Ok(())
    }

    /// Physical collection name for `c`.
    pub fn collection_name(&self, c: Collection) -> String {
        format!("{}{}", self.collection_prefix, c.name())
    }

    pub fn space(&self) -> VectorSpace {
        VectorSpace {
            size: self.vector_size,
            distance: self.distance,
        }
    }
}
