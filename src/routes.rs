use axum::{
    Router,
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::credentials::CredentialSet;
use crate::error::Error;
use crate::node::{self, ParameterSet};
use crate::types::*;

// =============================================================================
// Router
// =============================================================================

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/execute", post(execute))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Body types
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteBody {
    items: Vec<WorkflowItem>,
    parameters: ParameterSet,
    #[serde(default)]
    credentials: Option<CredentialSet>,
    continue_on_fail: Option<bool>,
}

// =============================================================================
// Handlers
// =============================================================================

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

async fn execute(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ExecuteBody>,
) -> Result<impl IntoResponse, Error> {
    let credentials = match &body.credentials {
        Some(overlay) => state.config.credentials.merged_with(overlay),
        None => state.config.credentials.clone(),
    };
    let continue_on_fail = body
        .continue_on_fail
        .unwrap_or(state.config.continue_on_fail);

    let outputs = node::execute(&body.items, &body.parameters, &credentials, continue_on_fail)
        .await?;
    Ok(Json(outputs))
}
