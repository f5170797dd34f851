//! Embedding executor with concurrency and dimension checks.

use crate::{embed::EmbeddingsProvider, errors::RagError, record::RagDocument};
use futures::stream::{self, StreamExt};
use tracing::debug;

/// Embeds every document's content, preserving input order.
///
/// # Errors
/// Returns [`RagError::VectorSizeMismatch`] if a vector has the wrong length,
/// or the first provider error.
pub async fn embed_all(
    docs: &[RagDocument],
    provider: &dyn EmbeddingsProvider,
    expected_dim: usize,
    concurrency: usize,
) -> Result<Vec<Vec<f32>>, RagError> {
    debug!(total = docs.len(), concurrency, "embedding documents");

    if docs.is_empty() {
        return Ok(Vec::new());
    }

    let futs: Vec<_> = docs
        .iter()
        .enumerate()
        .map(|(i, d)| async move {
            let v = provider.embed(&d.content).await?;
            Ok::<(usize, Vec<f32>), RagError>((i, v))
        })
        .collect();
    let mut results: Vec<(usize, Vec<f32>)> = stream::iter(futs)
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, RagError>>()?;

    results.sort_by_key(|(i, _)| *i);

    let mut out = Vec::with_capacity(results.len());
    for (_, v) in results {
        if v.len() != expected_dim {
            return Err(RagError::VectorSizeMismatch {
                got: v.len(),
                want: expected_dim,
            });
        }
        out.push(v);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::HashingEmbedder;

    #[tokio::test]
    async fn order_is_preserved() {
        let e = HashingEmbedder::new(32);
        let docs: Vec<_> = ["alpha", "beta", "gamma"].into_iter().map(RagDocument::new).collect();
        let vs = embed_all(&docs, &e, 32, 2).await.unwrap();
        assert_eq!(vs.len(), 3);
        assert_eq!(vs[1], e.embed_sync("beta"));
    }

    #[tokio::test]
    async fn wrong_dimension_is_an_error() {
        let e = HashingEmbedder::new(16);
        let docs = vec![RagDocument::new("x")];
        let err = embed_all(&docs, &e, 32, 1).await.unwrap_err();
        assert!(matches!(err, RagError::VectorSizeMismatch { got: 16, want: 32 }));
    }
}
