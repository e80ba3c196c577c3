use std::collections::HashSet;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Story;

/// The PostgREST table holding mirrored stories.
const TABLE: &str = "hack";

#[derive(Debug, Deserialize)]
struct IdRow {
    id: i64,
}

pub struct StoreClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl StoreClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url,
            api_key,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.base_url, TABLE)
    }

    /// All ids currently persisted.
    pub async fn select_ids(&self) -> Result<HashSet<i64>> {
        let response = self
            .client
            .get(format!("{}?select=id", self.table_url()))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AppError::StoreApi(format!("API error: {}", error_text)));
        }

        let rows: Vec<IdRow> = response.json().await?;
        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    /// Bulk-delete rows by id. Returns how many ids the delete covered;
    /// an empty set short-circuits without issuing a request.
    pub async fn delete_by_ids(&self, ids: &[i64]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let id_list = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let response = self
            .client
            .delete(format!("{}?id=in.({})", self.table_url(), id_list))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AppError::StoreApi(format!("API error: {}", error_text)));
        }

        Ok(ids.len())
    }

    /// Insert one story. The serialized body never includes `summary`.
    pub async fn insert(&self, story: &Story) -> Result<()> {
        let response = self
            .client
            .post(self.table_url())
            .header("apikey", &self.api_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(&self.api_key)
            .json(story)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AppError::StoreApi(format!("API error: {}", error_text)));
        }

        Ok(())
    }

    /// Patch a single row with a partial body.
    pub async fn patch<T: Serialize>(&self, id: i64, body: &T) -> Result<()> {
        let response = self
            .client
            .patch(format!("{}?id=eq.{}", self.table_url(), id))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AppError::StoreApi(format!("API error: {}", error_text)));
        }

        Ok(())
    }

    /// A page of stories in serving order (best rank first).
    pub async fn select_page(&self, limit: u32, offset: u32) -> Result<Vec<Story>> {
        let response = self
            .client
            .get(format!(
                "{}?limit={}&offset={}&order=rank_position.asc",
                self.table_url(),
                limit,
                offset
            ))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AppError::StoreApi(format!("API error: {}", error_text)));
        }

        let stories: Vec<Story> = response.json().await?;
        Ok(stories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RankPatch;
    use mockito::Matcher;

    fn client_for(server: &mockito::Server) -> StoreClient {
        StoreClient::new(server.url(), "test-key".to_string())
    }

    fn story(id: i64) -> Story {
        Story {
            id,
            title: format!("story {}", id),
            url: Some("https://example.com/post".to_string()),
            score: 42,
            by: "alice".to_string(),
            time: 1_700_000_000,
            descendants: 5,
            kind: "story".to_string(),
            rank_position: 1,
            summary: None,
        }
    }

    #[tokio::test]
    async fn select_ids_collects_id_column() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/hack?select=id")
            .match_header("apikey", "test-key")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(r#"[{"id": 1}, {"id": 2}]"#)
            .create_async()
            .await;

        let ids = client_for(&server).select_ids().await.unwrap();
        assert_eq!(ids, HashSet::from([1, 2]));
    }

    #[tokio::test]
    async fn delete_skips_request_for_empty_set() {
        // No mock registered, so any request would come back as an error.
        let server = mockito::Server::new_async().await;

        let removed = client_for(&server).delete_by_ids(&[]).await.unwrap();
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn delete_builds_in_filter() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("DELETE", "/hack?id=in.(5,6,7)")
            .with_status(204)
            .create_async()
            .await;

        let removed = client_for(&server).delete_by_ids(&[5, 6, 7]).await.unwrap();
        assert_eq!(removed, 3);
    }

    #[tokio::test]
    async fn insert_sends_minimal_return_preference() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hack")
            .match_header("prefer", "return=minimal")
            .match_body(Matcher::PartialJsonString(
                r#"{"id": 9, "type": "story", "rank_position": 1}"#.to_string(),
            ))
            .with_status(201)
            .create_async()
            .await;

        client_for(&server).insert(&story(9)).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn patch_targets_one_row() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/hack?id=eq.9")
            .match_body(Matcher::JsonString(
                r#"{"rank_position": 3, "score": 77}"#.to_string(),
            ))
            .with_status(204)
            .create_async()
            .await;

        client_for(&server)
            .patch(
                9,
                &RankPatch {
                    rank_position: 3,
                    score: 77,
                },
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn select_page_orders_by_rank() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/hack?limit=2&offset=0&order=rank_position.asc")
            .with_status(200)
            .with_body(
                r#"[
                    {"id": 1, "title": "a", "url": null, "score": 5, "by": "x", "time": 0, "descendants": 0, "type": "story", "rank_position": 1, "summary": "s"},
                    {"id": 2, "title": "b", "url": null, "score": 3, "by": "y", "time": 0, "descendants": 0, "type": "story", "rank_position": 2}
                ]"#,
            )
            .create_async()
            .await;

        let page = client_for(&server).select_page(2, 0).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].summary.as_deref(), Some("s"));
        assert!(page[1].summary.is_none());
    }

    #[tokio::test]
    async fn failed_store_call_surfaces_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/hack")
            .with_status(409)
            .with_body("duplicate key")
            .create_async()
            .await;

        let err = client_for(&server).insert(&story(9)).await.unwrap_err();
        assert!(matches!(err, AppError::StoreApi(_)));
    }
}
