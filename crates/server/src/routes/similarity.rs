use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use similarity::SimilarCluster;
use std::sync::Arc;
use std::time::Instant;

/// Similarity request parameters, shared by the query-string and JSON-body
/// variants of the endpoint.
#[derive(Debug, Deserialize)]
pub struct SimilarityParams {
    /// Reference cluster id
    #[serde(default, alias = "clusterId")]
    pub cluster_id: Option<String>,

    /// Minimum similarity score in [0, 1]
    #[serde(default)]
    pub threshold: Option<f32>,

    /// Maximum results to return, integer in [1, 100]
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Similarity response envelope
#[derive(Debug, Serialize)]
pub struct SimilarityResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<SimilarCluster>,
}

/// Hard ceiling on the per-request result limit.
const MAX_LIMIT: i64 = 100;

/// Validate request parameters, applying configured defaults.
///
/// Runs before the resolver is invoked; violations produce a 400 naming the
/// offending parameter, matching the upstream dashboard contract.
fn validate(
    params: SimilarityParams,
    config: &ServerConfig,
) -> Result<(String, f32, usize), ServerError> {
    let cluster_id = match params.cluster_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            return Err(ServerError::BadRequest(
                "Missing required parameter: cluster_id".to_string(),
            ))
        }
    };

    let threshold = params.threshold.unwrap_or(config.default_threshold);
    if threshold.is_nan() || !(0.0..=1.0).contains(&threshold) {
        return Err(ServerError::BadRequest(
            "Invalid threshold parameter. Must be a number between 0 and 1.".to_string(),
        ));
    }

    let limit = params.limit.unwrap_or(config.default_limit as i64);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(ServerError::BadRequest(
            "Invalid limit parameter. Must be a positive integer between 1 and 100.".to_string(),
        ));
    }

    Ok((cluster_id, threshold, limit as usize))
}

/// Find clusters similar to a reference cluster (query parameters).
///
/// `GET /api/v1/similarity?cluster_id={id}&threshold={number}&limit={number}`
pub async fn similar_clusters_query(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<SimilarityParams>,
) -> ServerResult<Json<SimilarityResponse>> {
    resolve_similar(state, params).await
}

/// Find clusters similar to a reference cluster (JSON body).
///
/// `POST /api/v1/similarity` with `{ "cluster_id": ..., "threshold": ..., "limit": ... }`
pub async fn similar_clusters_body(
    State(state): State<Arc<ServerState>>,
    Json(params): Json<SimilarityParams>,
) -> ServerResult<Json<SimilarityResponse>> {
    resolve_similar(state, params).await
}

async fn resolve_similar(
    state: Arc<ServerState>,
    params: SimilarityParams,
) -> ServerResult<Json<SimilarityResponse>> {
    let (cluster_id, threshold, limit) = validate(params, &state.config)?;

    let start = Instant::now();
    let result = state.resolver.resolve(&cluster_id, threshold, limit).await;

    metrics::counter!("similarity_requests_total").increment(1);
    metrics::histogram!("similarity_resolve_duration_seconds")
        .record(start.elapsed().as_secs_f64());

    let data = result?;
    Ok(Json(SimilarityResponse {
        success: true,
        count: data.len(),
        data,
    }))
}
