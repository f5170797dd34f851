//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! All Qdrant interactions go through this facade so the rest of the crate
//! never touches the builder API directly. Collection names are passed per
//! call; one client serves all five collections.

use std::collections::HashMap;

use crate::config::{DistanceKind, RagConfig, VectorSpace};
use crate::errors::RagError;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, SearchParamsBuilder,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QValue, VectorParamsBuilder,
};
use tracing::{debug, info, warn};

pub struct QdrantFacade {
    client: Qdrant,
    distance: DistanceKind,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            distance: cfg.distance,
        })
    }

    /// Creates `collection` unless it already exists.
    pub async fn ensure_collection(&self, collection: &str, space: &VectorSpace) -> Result<(), RagError> {
        match self.client.collection_info(collection).await {
            Ok(_) => {
                debug!(collection, "collection already exists");
                return Ok(());
            }
            Err(err) => {
                warn!(collection, error = %err, "collection not found, creating");
            }
        }

        let distance = match space.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection)
                    .vectors_config(VectorParamsBuilder::new(space.size as u64, distance)),
            )
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        info!(collection, size = space.size, distance = ?space.distance, "collection created");
        Ok(())
    }

    /// Upserts a batch of points and waits for the write to be applied.
    pub async fn upsert_points(&self, collection: &str, points: Vec<PointStruct>) -> Result<usize, RagError> {
        if points.is_empty() {
            return Ok(0);
        }
        let n = points.len();
        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;
        debug!(collection, points = n, "upsert applied");
        Ok(n)
    }

    /// Similarity search; returns `(distance, payload)` pairs, lowest distance first.
    pub async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        top_k: u64,
        exact: bool,
    ) -> Result<Vec<(f32, HashMap<String, QValue>)>, RagError> {
        let mut builder = SearchPointsBuilder::new(collection, vector, top_k).with_payload(true);
        if exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        let mut out: Vec<_> = res
            .result
            .into_iter()
            .map(|p| (to_distance(self.distance, p.score), p.payload))
            .collect();
        out.sort_by(|a, b| a.0.total_cmp(&b.0));
        debug!(collection, hits = out.len(), "search completed");
        Ok(out)
    }

    pub async fn count(&self, collection: &str) -> Result<u64, RagError> {
        let res = self
            .client
            .count(CountPointsBuilder::new(collection).exact(true))
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;
        Ok(res.result.map(|r| r.count).unwrap_or(0))
    }
}

/// Maps a Qdrant score onto a distance where lower means closer.
///
/// Cosine and dot scores are similarities; Euclid scores already are distances.
pub fn to_distance(kind: DistanceKind, score: f32) -> f32 {
    match kind {
        DistanceKind::Cosine => 1.0 - score,
        DistanceKind::Dot => -score,
        DistanceKind::Euclid => score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similarities_become_ascending_distances() {
        let close = to_distance(DistanceKind::Cosine, 0.95);
        let far = to_distance(DistanceKind::Cosine, 0.10);
        assert!(close < far);
        assert!(to_distance(DistanceKind::Dot, 3.0) < to_distance(DistanceKind::Dot, 1.0));
        assert_eq!(to_distance(DistanceKind::Euclid, 0.4), 0.4);
    }
}
