//! # Cluster Similarity
//!
//! ## Purpose
//!
//! `similarity` sits on top of the cluster store (`store`) and is responsible
//! for answering one question: given a reference grant cluster, which other
//! clusters are most similar to it? It resolves that question with a tiered
//! execution strategy:
//!
//! 1. **Remote ranking strategies**, tried in priority order. Each is a named
//!    capability of the backing store (e.g. a scored vector-search function).
//!    A strategy that signals "capability missing" advances the resolver to
//!    the next one; a strategy that fails for real halts resolution.
//! 2. **Local fallback**: when every remote strategy is unavailable, a
//!    bounded candidate slice is fetched and scored client-side with cosine
//!    similarity, thresholded, sorted, and truncated.
//!
//! ## Core Types
//!
//! - [`cosine_similarity`]: pure scoring function over equal-length vectors.
//! - [`decode_embedding`]: normalizes persisted embedding payloads
//!   (native sequence or serialized JSON array) into a numeric vector.
//! - [`rank`]: the deterministic local ranking pipeline.
//! - [`RemoteRanker`]: the remote strategy seam, with
//!   [`RemoteRankerError::is_capability_missing`] as the control-flow
//!   classifier.
//! - [`SimilarityResolver`]: the orchestrator wiring all of the above
//!   together over an injected [`store::ClusterStore`].
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use store::InMemoryStore;
//! use similarity::{ResolverConfig, SimilarityResolver};
//!
//! # async fn run() -> Result<(), similarity::ResolveError> {
//! let store = Arc::new(InMemoryStore::new());
//! let resolver = SimilarityResolver::new(store, ResolverConfig::default());
//! let similar = resolver.resolve("cluster-1", 0.3, 20).await?;
//! # Ok(())
//! # }
//! ```

mod cosine;
mod ranker;
mod remote;
mod resolver;
mod types;
mod vector;

pub use cosine::cosine_similarity;
pub use ranker::rank;
pub use remote::{normalize_rows, RemoteRanker, RemoteRankerError, SCORE_FIELD_ALIASES};
pub use resolver::{ResolveError, SimilarityResolver};
pub use types::{ResolverConfig, SimilarCluster};
pub use vector::{decode_embedding, DecodeError};
