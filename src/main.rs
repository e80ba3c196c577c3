use tokio::net::TcpListener;

mod ai;
mod api;
mod config;
mod error;
mod hn;
mod models;
mod services;
mod store;
mod sync;

use api::AppState;
use config::Config;
use error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (informational by default, overridable via RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Check for --refresh flag (headless one-shot refresh)
    let headless_refresh = args.len() >= 2 && args[1] == "--refresh";

    // Load configuration
    let config = Config::load()?;

    if config.store_key.is_none() {
        tracing::warn!("No store key configured; persistence calls will likely be rejected");
    }
    if config.openai_api_key.is_none() {
        tracing::info!("No model key configured; stories will be mirrored without summaries");
    }

    let state = AppState::from_config(&config);

    // If headless refresh, run one cycle and exit
    if headless_refresh {
        let outcome = state.reconciler.run_once().await?;
        println!(
            "Refreshed stories: removed {}, added {}, updated {}, {} in store",
            outcome.removed_old_stories,
            outcome.added_new_stories,
            outcome.updated_ranks,
            outcome.total_stories_in_db
        );
        return Ok(());
    }

    // Background refresh loop
    if config.refresh_interval_minutes > 0 {
        sync::spawn_scheduler(
            state.reconciler.clone(),
            state.refresh_lock.clone(),
            config.refresh_interval_minutes,
        );
    } else {
        tracing::info!("Periodic refresh disabled; trigger cycles via POST /refresh");
    }

    let listener = TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("Listening on {}", config.listen_addr);
    axum::serve(listener, api::app(state)).await?;

    Ok(())
}
