//! Workspace umbrella crate for grant cluster similarity resolution.
//!
//! This crate stitches together the cluster store and the similarity engine
//! so callers can resolve "clusters similar to this one" with a single API
//! entry point. The HTTP boundary lives in the `grantsim-server` crate.
//!
//! The resolution pipeline is tiered: remote ranking capabilities of the
//! backing store are tried in priority order, advancing only on the
//! capability-missing signal, and a deterministic client-side cosine pipeline
//! serves as the fallback when no remote capability exists.

pub use similarity::{
    cosine_similarity, decode_embedding, normalize_rows, rank, DecodeError, RemoteRanker,
    RemoteRankerError, ResolveError, ResolverConfig, SimilarCluster, SimilarityResolver,
    SCORE_FIELD_ALIASES,
};
pub use store::{
    ClusterStore, EmbeddingRow, GrantCluster, InMemoryStore, RawEmbedding, StoreError,
};

use std::sync::Arc;

/// Resolve clusters similar to `reference_id` with default tuning and no
/// remote strategies.
///
/// Convenience wrapper for embedders that just want the local pipeline;
/// construct a [`SimilarityResolver`] directly to register remote ranking
/// strategies or tune the fallback candidate budget.
pub async fn find_similar_clusters(
    store: Arc<dyn ClusterStore>,
    reference_id: &str,
    threshold: f32,
    limit: usize,
) -> Result<Vec<SimilarCluster>, ResolveError> {
    SimilarityResolver::new(store, ResolverConfig::default())
        .resolve(reference_id, threshold, limit)
        .await
}
