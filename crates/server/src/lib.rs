//! Grantsim Server - HTTP REST API for grant cluster similarity
//!
//! This crate provides the HTTP boundary over the similarity resolution
//! subsystem. It supports:
//!
//! - **Similarity Resolution**: rank clusters similar to a reference cluster,
//!   via remote ranking strategies with a deterministic local fallback
//! - **Cluster Management**: insert, fetch, and delete cluster records in the
//!   backing store
//! - **Health & Metrics**: liveness/readiness probes and Prometheus metrics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics
//! - `GET /api/v1/similarity` - Similar clusters (query parameters)
//! - `POST /api/v1/similarity` - Similar clusters (JSON body)
//! - `POST /api/v1/clusters` - Upsert a cluster
//! - `GET /api/v1/clusters/stats` - Store statistics
//! - `GET /api/v1/clusters/{id}` - Get cluster by id
//! - `DELETE /api/v1/clusters/{id}` - Delete cluster

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
