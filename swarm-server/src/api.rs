use crate::AppState;

use axum::{Json, extract::State};
use serde::Deserialize;
use swarm_core::BroadcastRequest;
use swarm_pipeline::TriggerOutcome;

#[derive(Debug, Deserialize)]
pub struct BroadcastBody {
    pub payload: String,
}

/// POST /broadcast - fan one message out to every live connection.
///
/// Returns what was enqueued; downstream failures surface in logs and
/// metrics, not in this response.
pub async fn broadcast(
    State(state): State<AppState>,
    Json(body): Json<BroadcastBody>,
) -> Json<TriggerOutcome> {
    let outcome = state
        .trigger
        .broadcast(BroadcastRequest::new(body.payload))
        .await;

    Json(outcome)
}
