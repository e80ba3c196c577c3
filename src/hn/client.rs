use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::models::HnItem;

pub struct HnClient {
    client: Client,
    base_url: String,
}

impl HnClient {
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("hackfeed/1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// Fetch the current ranked story ids, truncated to `limit`.
    /// The array order is the feed's ranking and is preserved.
    pub async fn fetch_top_ids(&self, limit: usize) -> Result<Vec<i64>> {
        let response = self
            .client
            .get(format!("{}/topstories.json", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(
                anyhow::anyhow!("Failed to fetch top stories: HTTP {}", response.status()).into(),
            );
        }

        let mut ids: Vec<i64> = response.json().await?;
        ids.truncate(limit);
        Ok(ids)
    }

    /// Fetch one item. The API answers unknown or dead ids with JSON `null`,
    /// which comes back as `Ok(None)`.
    pub async fn fetch_item(&self, id: i64) -> Result<Option<HnItem>> {
        let response = self
            .client
            .get(format!("{}/item/{}.json", self.base_url, id))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(
                anyhow::anyhow!("Failed to fetch item {}: HTTP {}", id, response.status()).into(),
            );
        }

        let item: Option<HnItem> = response.json().await?;
        Ok(item)
    }
}
