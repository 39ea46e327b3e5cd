use crate::ranker;
use crate::remote::{normalize_rows, RemoteRanker};
use crate::types::{ResolverConfig, SimilarCluster};
use crate::vector::{decode_embedding, DecodeError};
use std::sync::Arc;
use store::{ClusterStore, StoreError};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Errors produced by similarity resolution.
///
/// Every failure path of a resolution call surfaces as one of these; the
/// service boundary converts each into a well-formed response, so nothing
/// escapes to the caller unhandled.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The request itself is unusable; validated boundaries never send this.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The reference cluster id is unknown.
    #[error("reference cluster not found: {0}")]
    NotFound(String),
    /// The reference cluster exists but has no embedding payload.
    #[error("reference cluster has no vector data: {0}")]
    NoEmbedding(String),
    /// The reference embedding payload failed to decode.
    #[error("failed to parse reference vector data: {0}")]
    Decode(#[from] DecodeError),
    /// An existing remote ranking capability returned a genuine failure.
    #[error("remote ranking strategy {strategy} failed: {message}")]
    Remote { strategy: String, message: String },
    /// Loading the reference row failed at the storage layer.
    #[error("failed to fetch reference cluster: {0}")]
    Reference(StoreError),
    /// Listing fallback candidates failed at the storage layer.
    #[error("failed to fetch candidate clusters: {0}")]
    Candidates(StoreError),
    /// A fault outside the enumerated kinds.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Resolves "clusters similar to this one" with a tiered strategy.
///
/// Remote ranking capabilities are consulted in priority order; the resolver
/// advances past a strategy only on the capability-missing signal. When the
/// list is exhausted (including when no strategies are configured) it runs
/// the local pipeline: fetch a bounded candidate slice, then decode, score,
/// threshold, sort, and truncate client-side.
///
/// All collaborators are injected; a resolver holds no mutable state, so one
/// instance serves arbitrarily many concurrent resolutions.
pub struct SimilarityResolver {
    store: Arc<dyn ClusterStore>,
    remotes: Vec<Arc<dyn RemoteRanker>>,
    cfg: ResolverConfig,
}

impl SimilarityResolver {
    /// Construct a resolver with no remote strategies (local pipeline only).
    pub fn new(store: Arc<dyn ClusterStore>, cfg: ResolverConfig) -> Self {
        Self {
            store,
            remotes: Vec::new(),
            cfg,
        }
    }

    /// Append a remote ranking strategy; earlier additions have priority.
    pub fn with_remote(mut self, remote: Arc<dyn RemoteRanker>) -> Self {
        self.remotes.push(remote);
        self
    }

    /// Resolve clusters similar to `reference_id`.
    ///
    /// `threshold` is the minimum similarity score a result must reach;
    /// `limit` bounds the result count. Both are domain-validated by the
    /// boundary; the guards here only keep a misused resolver from producing
    /// nonsense.
    pub async fn resolve(
        &self,
        reference_id: &str,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<SimilarCluster>, ResolveError> {
        if reference_id.trim().is_empty() {
            return Err(ResolveError::InvalidRequest(
                "reference id must not be empty".into(),
            ));
        }
        if limit == 0 {
            return Err(ResolveError::InvalidRequest(
                "limit must be greater than zero".into(),
            ));
        }

        let reference = self.load_reference_vector(reference_id).await?;

        for remote in &self.remotes {
            match remote.rank(&reference, threshold, limit).await {
                Ok(rows) => {
                    tracing::debug!(
                        strategy = remote.name(),
                        rows = rows.len(),
                        "remote ranking strategy succeeded"
                    );
                    return Ok(normalize_rows(rows));
                }
                Err(err) if err.is_capability_missing() => {
                    tracing::debug!(
                        strategy = remote.name(),
                        "ranking capability missing, advancing to next strategy"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        strategy = remote.name(),
                        error = %err,
                        "remote ranking strategy failed"
                    );
                    return Err(ResolveError::Remote {
                        strategy: remote.name().to_string(),
                        message: err.message,
                    });
                }
            }
        }

        tracing::info!(
            reference = reference_id,
            "no remote ranking capability available, falling back to local scoring"
        );
        self.resolve_local(reference_id, &reference, threshold, limit)
            .await
    }

    /// Load and decode the reference cluster's embedding.
    async fn load_reference_vector(&self, reference_id: &str) -> Result<Vec<f32>, ResolveError> {
        let row = self
            .store
            .embedding(reference_id)
            .await
            .map_err(ResolveError::Reference)?
            .ok_or_else(|| ResolveError::NotFound(reference_id.to_string()))?;

        let raw = row
            .embedding
            .ok_or_else(|| ResolveError::NoEmbedding(reference_id.to_string()))?;

        Ok(decode_embedding(&raw)?)
    }

    /// The degraded path: bounded candidate slice, scored client-side.
    async fn resolve_local(
        &self,
        reference_id: &str,
        reference: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<SimilarCluster>, ResolveError> {
        let budget = self.cfg.candidate_budget(limit);
        let candidates = self
            .store
            .list_candidates(reference_id, budget)
            .await
            .map_err(ResolveError::Candidates)?;

        tracing::debug!(
            reference = reference_id,
            candidates = candidates.len(),
            budget,
            "scoring candidate slice locally"
        );
        Ok(ranker::rank(reference, candidates, threshold, limit))
    }
}
