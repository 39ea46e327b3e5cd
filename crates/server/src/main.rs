//! Grantsim Server - HTTP REST API for grant cluster similarity
//!
//! This binary serves similarity resolution over the cluster store, with
//! remote ranking strategies and a deterministic local fallback.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment, then configuration
    dotenvy::dotenv().ok();
    let config = ServerConfig::load()?;

    // Start server
    server::start_server(config).await?;

    Ok(())
}
