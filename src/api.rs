use crate::paxos::{ExecuteReply, ExecuteRequest};
use crate::service::KeyValueService;
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Router for the KV entry point published at a peer's base URL.
pub fn router(service: Arc<KeyValueService>) -> Router {
    Router::new()
        .route("/execute", post(execute))
        .route("/health", get(health))
        .with_state(service)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn execute(
    State(service): State<Arc<KeyValueService>>,
    Json(req): Json<ExecuteRequest>,
) -> impl IntoResponse {
    let response = service.execute_command(&req.client_id, &req.command).await;
    Json(ExecuteReply { response })
}
