//! Document collections for hybrid retrieval.
//!
//! This crate provides:
//! - the five topical [`Collection`]s and the [`SourceType`] tags stored with documents;
//! - the [`VectorStore`] capability with a Qdrant backend ([`QdrantStore`]) and
//!   an in-process one ([`MemoryStore`]);
//! - [`EmbeddingsProvider`]s: OpenAI through `ai-llm-service`, and an offline hashing embedder.
//!
//! Every backend reports distances, so callers sort ascending.

mod collections;
mod config;
pub mod embed;
mod embed_pool;
mod errors;
mod memory_store;
mod payload;
mod qdrant_facade;
mod qdrant_store;
mod record;
mod store;

pub use collections::{Collection, SourceType};
pub use config::{DistanceKind, RagConfig, VectorSpace};
pub use embed::{EmbeddingsProvider, HashingEmbedder, OpenAiEmbedder};
pub use errors::RagError;
pub use memory_store::MemoryStore;
pub use qdrant_store::QdrantStore;
pub use record::{RagDocument, SearchResult, content_hash};
pub use store::{StoreFuture, VectorStore};
