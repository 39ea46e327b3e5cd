use crate::config::ServerConfig;
use crate::error::ServerResult;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use similarity::SimilarityResolver;
use std::sync::Arc;
use store::InMemoryStore;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Backing cluster store (shared across requests)
    pub store: Arc<InMemoryStore>,

    /// Similarity resolver (shared across requests)
    pub resolver: Arc<SimilarityResolver>,

    /// Prometheus recorder handle, when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl ServerState {
    /// Create new server state
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        // In-memory backend; a deployment wanting a remote store swaps the
        // ClusterStore implementation injected into the resolver here.
        let store = Arc::new(InMemoryStore::new());

        // Remote ranking strategies are registered here when the backing
        // store exposes them; with none configured the resolver runs its
        // deterministic local pipeline.
        let resolver = Arc::new(SimilarityResolver::new(
            store.clone(),
            config.resolver_config(),
        ));

        let metrics = if config.metrics_enabled {
            match PrometheusBuilder::new().install_recorder() {
                Ok(handle) => Some(handle),
                Err(err) => {
                    tracing::warn!(error = %err, "failed to install metrics recorder");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            config: Arc::new(config),
            store,
            resolver,
            metrics,
        })
    }
}

/// Server metadata for health checks
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub version: String,
    pub uptime_seconds: u64,
}
