use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::sync::Reconciler;

/// Serializes refresh cycles between the interval task and the HTTP
/// trigger. Whoever cannot take it immediately skips instead of queueing.
pub type RefreshLock = Arc<Mutex<()>>;

/// Spawn the periodic refresh task. The first tick fires immediately, so
/// the store is primed on startup.
pub fn spawn_scheduler(
    reconciler: Arc<Reconciler>,
    lock: RefreshLock,
    interval_minutes: u32,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(u64::from(interval_minutes) * 60));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            let Ok(_guard) = lock.try_lock() else {
                tracing::debug!("Refresh already in flight, skipping tick");
                continue;
            };

            match reconciler.run_once().await {
                Ok(outcome) => tracing::info!(
                    "Scheduled refresh: removed {}, added {}, updated {}",
                    outcome.removed_old_stories,
                    outcome.added_new_stories,
                    outcome.updated_ranks
                ),
                Err(e) => tracing::warn!("Scheduled refresh failed: {}", e),
            }
        }
    })
}
