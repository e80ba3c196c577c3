use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::Story;

use super::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct StoriesQuery {
    limit: Option<u32>,
    offset: Option<u32>,
}

/// Story as served to readers: `by` becomes `author` and a fixed status
/// marker is attached for the frontend.
#[derive(Debug, Serialize)]
struct ApiStory {
    id: i64,
    title: String,
    url: Option<String>,
    score: i64,
    author: String,
    time: i64,
    descendants: i64,
    summary: Option<String>,
    status: &'static str,
}

impl From<Story> for ApiStory {
    fn from(story: Story) -> Self {
        Self {
            id: story.id,
            title: story.title,
            url: story.url,
            score: story.score,
            author: story.by,
            time: story.time,
            descendants: story.descendants,
            summary: story.summary,
            status: "active",
        }
    }
}

/// List stored stories in rank order.
pub async fn stories_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StoriesQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(100);
    let offset = query.offset.unwrap_or(0);

    match state.store.select_page(limit, offset).await {
        Ok(stories) => {
            let stories: Vec<ApiStory> = stories.into_iter().map(ApiStory::from).collect();
            Json(serde_json::json!({ "stories": stories })).into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to load stories: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Server error" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{app, testutil};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn lists_stories_in_stored_order_with_author_field() {
        let mut store = mockito::Server::new_async().await;
        let _page = store
            .mock("GET", "/hack?limit=2&offset=0&order=rank_position.asc")
            .with_status(200)
            .with_body(
                r#"[
                    {"id": 1, "title": "first", "url": "https://a.example", "score": 10, "by": "alice", "time": 1, "descendants": 3, "type": "story", "rank_position": 1, "summary": "short words"},
                    {"id": 2, "title": "second", "url": null, "score": 5, "by": "bob", "time": 2, "descendants": 0, "type": "story", "rank_position": 2, "summary": null}
                ]"#,
            )
            .create_async()
            .await;

        let app = app(testutil::state(&store));
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/stories?limit=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        let stories = json["stories"].as_array().unwrap();
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0]["author"], "alice");
        assert_eq!(stories[0]["status"], "active");
        assert_eq!(stories[0]["summary"], "short words");
        assert_eq!(stories[1]["url"], serde_json::Value::Null);
        assert!(stories[0].get("by").is_none());
    }

    #[tokio::test]
    async fn store_failure_maps_to_server_error() {
        let mut store = mockito::Server::new_async().await;
        let _page = store
            .mock("GET", "/hack?limit=100&offset=0&order=rank_position.asc")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let app = app(testutil::state(&store));
        let resp = app
            .oneshot(Request::builder().uri("/stories").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Server error");
    }
}
