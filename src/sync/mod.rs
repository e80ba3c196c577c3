mod delta;
mod engine;
mod scheduler;

pub use engine::{Reconciler, RefreshOutcome};
pub use scheduler::{spawn_scheduler, RefreshLock};
