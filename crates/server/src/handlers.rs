//! # Route Handlers

use crate::{errors::AppError, state::AppState};
use axum::{extract::State, Json};
use edgecoach::{ChatRequest, ChatResponse};
use serde_json::Value;
use tracing::info;

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "edgecoach server is running."
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// The handler for `POST /chat`.
///
/// The body is taken as loose JSON so envelope validation produces the
/// pipeline's own `InvalidRequest` message instead of a generic rejection.
pub async fn chat_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<ChatResponse>, AppError> {
    let request = ChatRequest::from_value(payload)?;
    info!(
        "Received chat query ({} prior messages)",
        request.messages.len()
    );
    let response = app_state.orchestrator.handle(request).await?;
    Ok(Json(response))
}
