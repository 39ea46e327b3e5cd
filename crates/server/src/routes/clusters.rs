use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use store::{ClusterStore, GrantCluster};

/// Insert or replace a cluster record.
///
/// `POST /api/v1/clusters` with a full cluster document. The embedding
/// payload is optional and accepted in either persisted shape (native array
/// or serialized JSON string).
pub async fn upsert_cluster(
    State(state): State<Arc<ServerState>>,
    Json(cluster): Json<GrantCluster>,
) -> ServerResult<impl IntoResponse> {
    if cluster.id.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "cluster id must not be empty".to_string(),
        ));
    }

    let id = cluster.id.clone();
    state.store.upsert(cluster).await?;
    metrics::counter!("cluster_upserts_total").increment(1);

    Ok((StatusCode::CREATED, Json(json!({ "status": "ok", "id": id }))))
}

/// Fetch a cluster record by id.
///
/// `GET /api/v1/clusters/{id}`
pub async fn get_cluster(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> ServerResult<Json<GrantCluster>> {
    let cluster = state.store.get(&id).await?.ok_or(ServerError::NotFound)?;
    Ok(Json(cluster))
}

/// Delete a cluster record.
///
/// `DELETE /api/v1/clusters/{id}`
pub async fn delete_cluster(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> ServerResult<impl IntoResponse> {
    if !state.store.delete(&id).await? {
        return Err(ServerError::NotFound);
    }
    Ok(Json(json!({ "status": "deleted", "id": id })))
}

/// Store statistics.
///
/// `GET /api/v1/clusters/stats`
pub async fn cluster_stats(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    let clusters = state.store.count().await?;
    Ok(Json(json!({ "clusters": clusters })))
}
