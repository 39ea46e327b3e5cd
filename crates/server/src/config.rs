use serde::{Deserialize, Serialize};
use similarity::ResolverConfig;
use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Metrics endpoint enabled
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Similarity threshold applied when a request omits one
    #[serde(default = "default_threshold")]
    pub default_threshold: f32,

    /// Result limit applied when a request omits one
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Candidate slice ceiling for the local fallback path
    #[serde(default = "default_candidate_cap")]
    pub candidate_cap: usize,

    /// Candidates fetched per requested result in the local fallback path
    #[serde(default = "default_candidate_oversample")]
    pub candidate_oversample: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            default_threshold: default_threshold(),
            default_limit: default_limit(),
            candidate_cap: default_candidate_cap(),
            candidate_oversample: default_candidate_oversample(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config files
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("grantsim").required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("GRANTSIM").separator("__"));

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }

    /// Resolver tuning derived from the fallback knobs
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            candidate_cap: self.candidate_cap,
            oversample_factor: self.candidate_oversample,
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_threshold() -> f32 {
    0.3
}

fn default_limit() -> usize {
    20
}

fn default_candidate_cap() -> usize {
    50
}

fn default_candidate_oversample() -> usize {
    3
}
