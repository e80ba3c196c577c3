use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    q: Option<String>,
}

/// Proxy a web search, reshaped to the fields the frontend uses.
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let query = params.q.unwrap_or_default();
    if query.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Query parameter 'q' is required" })),
        )
            .into_response();
    }

    let Some(search) = &state.search else {
        return search_unavailable();
    };

    match search.search(&query).await {
        Ok(results) => {
            let total = results.len();
            Json(serde_json::json!({
                "query": query,
                "results": results,
                "total": total,
            }))
            .into_response()
        }
        Err(e) => {
            tracing::warn!("Search upstream failed: {}", e);
            search_unavailable()
        }
    }
}

fn search_unavailable() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(serde_json::json!({ "error": "Search API unavailable" })),
    )
        .into_response()
}

/// Logos for the fixed set of companies the frontend decorates.
pub async fn logos_handler(State(state): State<Arc<AppState>>) -> Response {
    let Some(logos) = &state.logos else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": "Logo service not configured" })),
        )
            .into_response();
    };

    let map = logos.company_logos().await;
    tracing::debug!("Resolved {} company logos", map.len());
    Json(map).into_response()
}

/// Logo lookup for a free-form query. Always answers with a list, empty
/// when the query is blank or the service is not configured.
pub async fn search_logos_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let query = params.q.unwrap_or_default();
    if query.is_empty() {
        return Json(serde_json::json!([])).into_response();
    }

    let Some(logos) = &state.logos else {
        return Json(serde_json::json!([])).into_response();
    };

    Json(logos.search_logos(&query).await).into_response()
}
