use crate::AppState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET /health - health check with connection and partition counts
pub async fn health(State(state): State<AppState>) -> Response {
    let health = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "connections": state.registry.total_count().await,
        "partitions": state.partition_count,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - liveness probe (is the process alive?)
pub async fn liveness() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - readiness probe (ready to accept traffic?)
pub async fn readiness() -> Response {
    (StatusCode::OK, "Ready").into_response()
}
