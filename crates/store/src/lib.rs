//! # Cluster Store
//!
//! This crate provides the grant cluster record model and a backend-agnostic
//! read/write interface over the backing store. Clusters are produced by an
//! external ingestion pipeline (domain crawling, scraping, LLM extraction,
//! clustering); this crate only models how they are stored and retrieved.
//!
//! ## Core Types
//!
//! - [`GrantCluster`]: a clustered grant record with descriptive fields and an
//!   optional embedding payload.
//! - [`RawEmbedding`]: the persisted embedding representation, either a
//!   native numeric sequence or a serialized JSON array. Decoding into a
//!   usable vector lives in the `similarity` crate.
//! - [`ClusterStore`]: the storage seam. Constructor-injected wherever it is
//!   consumed so deployments can swap backends and tests can script doubles.
//! - [`InMemoryStore`]: a `RwLock<HashMap>` backend for ephemeral deployments
//!   and tests.

mod backend;
mod cluster;

pub use backend::{ClusterStore, InMemoryStore};
pub use cluster::{EmbeddingRow, GrantCluster, RawEmbedding};

use thiserror::Error;

/// Errors produced by the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying backend failed to serve the request.
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Convenience constructor for backend failures.
    pub fn backend<S: Into<String>>(message: S) -> Self {
        StoreError::Backend(message.into())
    }
}
