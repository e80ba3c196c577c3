use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::AppState;

/// Trigger one reconciliation cycle. A trigger that arrives while a cycle
/// is running is refused rather than queued.
pub async fn refresh_handler(State(state): State<Arc<AppState>>) -> Response {
    let Ok(_guard) = state.refresh_lock.try_lock() else {
        return (
            StatusCode::CONFLICT,
            Json(serde_json::json!({
                "success": false,
                "error": "A refresh is already running"
            })),
        )
            .into_response();
    };

    match state.reconciler.run_once().await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => {
            tracing::warn!("Refresh failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "error": e.to_string()
                })),
            )
                .into_response()
        }
    }
}
