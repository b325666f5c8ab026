use crate::{AppState, api, health, ws};

use axum::{
    Router,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState, metrics_handle: PrometheusHandle) -> Router {
    Router::new()
        // WebSocket endpoint
        .route("/ws", get(ws::handler))
        // Broadcast trigger endpoint
        .route("/broadcast", post(api::broadcast))
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        // Prometheus scrape endpoint
        .route(
            "/metrics",
            get(move || {
                let handle = metrics_handle.clone();
                async move { handle.render() }
            }),
        )
        // Add shared state
        .with_state(state)
        // CORS middleware (allow all origins for WebSocket)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
