use std::collections::HashSet;

/// What has to change for the stored table to mirror the ranked feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncDelta {
    /// Persisted ids that fell out of the ranking; removed in one bulk call.
    /// Sorted so the delete filter is stable.
    pub to_remove: Vec<i64>,
    /// Ranked ids not yet persisted, in ranked order.
    pub to_add: Vec<i64>,
    /// Ids both ranked and persisted, in ranked order.
    pub to_update: Vec<i64>,
}

/// Compare the current ranked ids against the persisted id set.
///
/// `ranked` order encodes rank and is preserved in `to_add` and `to_update`.
pub fn make_delta(ranked: &[i64], persisted: &HashSet<i64>) -> SyncDelta {
    let ranked_set: HashSet<i64> = ranked.iter().copied().collect();

    let mut to_remove: Vec<i64> = persisted
        .iter()
        .copied()
        .filter(|id| !ranked_set.contains(id))
        .collect();
    to_remove.sort_unstable();

    let to_add = ranked
        .iter()
        .copied()
        .filter(|id| !persisted.contains(id))
        .collect();

    let to_update = ranked
        .iter()
        .copied()
        .filter(|id| persisted.contains(id))
        .collect();

    SyncDelta {
        to_remove,
        to_add,
        to_update,
    }
}
