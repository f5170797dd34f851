//! OpenAI embedding provider backed by the shared `embedding` profile.

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use tracing::trace;

use super::{EmbedFuture, EmbeddingsProvider};
use crate::errors::RagError;

#[derive(Clone)]
pub struct OpenAiEmbedder {
    svc: Arc<LlmServiceProfiles>,
    dim: usize,
}

impl OpenAiEmbedder {
    pub fn new(svc: Arc<LlmServiceProfiles>, dim: usize) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for OpenAiEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
        Box::pin(async move {
            let v = self.svc.embed(text).await?;
            trace!(len = v.len(), "embedding received");
            if v.len() != self.dim {
                return Err(RagError::VectorSizeMismatch {
                    got: v.len(),
                    want: self.dim,
                });
            }
            Ok(v)
        })
    }

    fn dim(&self) -> usize {
        self.dim
    }
}
