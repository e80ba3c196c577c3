use std::collections::HashSet;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::ai::Summarizer;
use crate::error::Result;
use crate::hn::HnClient;
use crate::models::{RankPatch, SummaryPatch};
use crate::store::StoreClient;
use crate::sync::delta::make_delta;

/// How much of the ranked feed is mirrored.
const TOP_STORIES_LIMIT: usize = 100;
/// Fan-out cap for per-item work within a cycle.
const MAX_CONCURRENT_ITEMS: usize = 5;

/// What one reconciliation cycle did.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    pub success: bool,
    pub timestamp: String,
    pub removed_old_stories: usize,
    pub added_new_stories: usize,
    pub updated_ranks: usize,
    pub total_stories_in_db: usize,
}

/// Keeps the stored table converged on the current top stories.
pub struct Reconciler {
    hn: HnClient,
    store: Arc<StoreClient>,
    summarizer: Option<Summarizer>,
}

impl Reconciler {
    pub fn new(hn: HnClient, store: Arc<StoreClient>, summarizer: Option<Summarizer>) -> Self {
        Self {
            hn,
            store,
            summarizer,
        }
    }

    /// Run one reconciliation cycle: remove stale rows, insert new stories
    /// (with a summary when one can be produced), then refresh rank and
    /// score for every ranked id.
    ///
    /// Only the two reads that feed the delta can fail the cycle. Past
    /// that point every failure is caught at the single story it affects,
    /// logged, and skipped; the next cycle recomputes the delta from
    /// scratch and heals whatever was missed.
    pub async fn run_once(&self) -> Result<RefreshOutcome> {
        tracing::info!("Starting story refresh");

        let ranked = self.hn.fetch_top_ids(TOP_STORIES_LIMIT).await?;
        let persisted = self.store.select_ids().await?;

        let delta = make_delta(&ranked, &persisted);
        tracing::info!(
            "Delta: {} to remove, {} to add, {} to update",
            delta.to_remove.len(),
            delta.to_add.len(),
            delta.to_update.len()
        );

        let removed = match self.store.delete_by_ids(&delta.to_remove).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Failed to remove stale stories: {}", e);
                0
            }
        };

        let added = self.add_new_stories(&ranked, &delta.to_add).await;
        let updated = self.update_ranks(&ranked).await;

        let outcome = RefreshOutcome {
            success: true,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            removed_old_stories: removed,
            added_new_stories: added,
            updated_ranks: updated,
            total_stories_in_db: ranked.len(),
        };

        tracing::info!(
            "Refresh completed: removed {}, added {}, updated {}",
            outcome.removed_old_stories,
            outcome.added_new_stories,
            outcome.updated_ranks
        );

        Ok(outcome)
    }

    /// Insert every id in `to_add` concurrently, returning how many landed.
    async fn add_new_stories(&self, ranked: &[i64], to_add: &[i64]) -> usize {
        let to_add_set: HashSet<i64> = to_add.iter().copied().collect();

        // Rank is the 1-based position in the full ranked list.
        let new_entries: Vec<(i64, i64)> = ranked
            .iter()
            .enumerate()
            .filter_map(|(index, &id)| to_add_set.contains(&id).then_some((id, index as i64 + 1)))
            .collect();

        let added: Vec<i64> = stream::iter(new_entries)
            .map(|(id, rank_position)| async move {
                match self.add_story(id, rank_position).await {
                    Ok(true) => Some(id),
                    Ok(false) => None,
                    Err(e) => {
                        tracing::warn!("Failed to add story {}: {}", id, e);
                        None
                    }
                }
            })
            .buffer_unordered(MAX_CONCURRENT_ITEMS)
            .filter_map(|r| async move { r })
            .collect()
            .await;

        added.len()
    }

    /// Fetch detail and insert a single new story. `Ok(false)` means the
    /// item was skipped rather than failed.
    async fn add_story(&self, id: i64, rank_position: i64) -> Result<bool> {
        let Some(item) = self.hn.fetch_item(id).await? else {
            tracing::debug!("Item {} is gone upstream, skipping", id);
            return Ok(false);
        };

        let Some(story) = item.into_story(rank_position) else {
            tracing::debug!("Item {} is not a titled story, skipping", id);
            return Ok(false);
        };

        let url = story.url.clone();
        self.store.insert(&story).await?;
        tracing::debug!("Added story {} at rank {}", id, rank_position);

        // The insert already counts; losing the summary only loses the
        // summary. It is written here once and never touched again.
        if let (Some(url), Some(summarizer)) = (url, &self.summarizer) {
            if let Some(summary) = summarizer.summarize(&url).await {
                match self.store.patch(id, &SummaryPatch { summary }).await {
                    Ok(()) => tracing::debug!("Stored summary for story {}", id),
                    Err(e) => tracing::warn!("Failed to store summary for story {}: {}", id, e),
                }
            }
        }

        Ok(true)
    }

    /// Re-fetch every ranked id and patch its rank and score, returning how
    /// many rows were patched. Newly inserted stories are included so their
    /// score is already fresh by the end of the cycle.
    async fn update_ranks(&self, ranked: &[i64]) -> usize {
        let entries: Vec<(i64, i64)> = ranked
            .iter()
            .enumerate()
            .map(|(index, &id)| (id, index as i64 + 1))
            .collect();

        let updated: Vec<i64> = stream::iter(entries)
            .map(|(id, rank_position)| async move {
                match self.update_story(id, rank_position).await {
                    Ok(true) => Some(id),
                    Ok(false) => None,
                    Err(e) => {
                        tracing::warn!("Failed to update story {}: {}", id, e);
                        None
                    }
                }
            })
            .buffer_unordered(MAX_CONCURRENT_ITEMS)
            .filter_map(|r| async move { r })
            .collect()
            .await;

        updated.len()
    }

    async fn update_story(&self, id: i64, rank_position: i64) -> Result<bool> {
        let Some(item) = self.hn.fetch_item(id).await? else {
            tracing::debug!("Item {} is gone upstream, skipping update", id);
            return Ok(false);
        };

        self.store
            .patch(
                id,
                &RankPatch {
                    rank_position,
                    score: item.score,
                },
            )
            .await?;

        Ok(true)
    }
}
