use crate::cluster::{EmbeddingRow, GrantCluster};
use crate::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Trait for a grant cluster storage backend.
///
/// The similarity subsystem only reads (`embedding`, `list_candidates`); the
/// mutation methods exist for the service surface that populates the store.
/// All methods take `&self` so a single backend instance can serve arbitrarily
/// many concurrent requests.
#[async_trait]
pub trait ClusterStore: Send + Sync {
    /// Look up a cluster's raw embedding payload by id.
    ///
    /// `Ok(None)` means the id is unknown. A row with `embedding: None` means
    /// the cluster exists but carries no vector.
    async fn embedding(&self, id: &str) -> Result<Option<EmbeddingRow>, StoreError>;

    /// Fetch a bounded candidate set, excluding the reference cluster.
    ///
    /// The slice is arbitrary, not exhaustive: callers size `max` to trade
    /// recall for latency, and the backend returns at most that many rows.
    async fn list_candidates(
        &self,
        exclude_id: &str,
        max: usize,
    ) -> Result<Vec<GrantCluster>, StoreError>;

    /// Insert or replace a cluster record.
    async fn upsert(&self, cluster: GrantCluster) -> Result<(), StoreError>;

    /// Fetch a full cluster record by id.
    async fn get(&self, id: &str) -> Result<Option<GrantCluster>, StoreError>;

    /// Delete a cluster record. Returns whether a record was removed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Number of stored clusters.
    async fn count(&self) -> Result<usize, StoreError>;
}

/// An in-memory store using a `RwLock` around a `HashMap`.
///
/// The deployment backend for ephemeral service instances and the default
/// test double everywhere else.
pub struct InMemoryStore {
    records: RwLock<HashMap<String, GrantCluster>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClusterStore for InMemoryStore {
    async fn embedding(&self, id: &str) -> Result<Option<EmbeddingRow>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(records.get(id).map(|cluster| EmbeddingRow {
            embedding: cluster.embedding.clone(),
        }))
    }

    async fn list_candidates(
        &self,
        exclude_id: &str,
        max: usize,
    ) -> Result<Vec<GrantCluster>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(records
            .values()
            .filter(|cluster| cluster.id != exclude_id)
            .take(max)
            .cloned()
            .collect())
    }

    async fn upsert(&self, cluster: GrantCluster) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        records.insert(cluster.id.clone(), cluster);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<GrantCluster>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(records.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(records.remove(id).is_some())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        Ok(records.len())
    }
}
