use serde::{Deserialize, Serialize};

/// A story row in the `hack` table.
///
/// `summary` is skipped during serialization when unset, so an insert body
/// never claims the column; it is only ever written by a follow-up patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub id: i64,
    pub title: String,
    pub url: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub by: String,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub descendants: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub rank_position: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// An item as returned by the HackerNews API.
///
/// The API answers unknown or dead ids with JSON `null`, which callers see
/// as a `None` at the fetch site. Numeric fields the API omits default to 0,
/// a missing author to the empty string.
#[derive(Debug, Clone, Deserialize)]
pub struct HnItem {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub by: String,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub descendants: i64,
}

impl HnItem {
    /// Convert into a persistable story at the given 1-based rank.
    ///
    /// Only story-typed items that carry a title are persisted; everything
    /// else (jobs, polls, title-less ghosts) yields `None`.
    pub fn into_story(self, rank_position: i64) -> Option<Story> {
        if self.kind != "story" {
            return None;
        }
        let title = self.title?;
        Some(Story {
            id: self.id,
            title,
            url: self.url,
            score: self.score,
            by: self.by,
            time: self.time,
            descendants: self.descendants,
            kind: self.kind,
            rank_position,
            summary: None,
        })
    }
}

/// Partial update applied to every ranked story each sync cycle.
#[derive(Debug, Serialize)]
pub struct RankPatch {
    pub rank_position: i64,
    pub score: i64,
}

/// Applied at most once per story, right after a successful insert.
#[derive(Debug, Serialize)]
pub struct SummaryPatch {
    pub summary: String,
}
