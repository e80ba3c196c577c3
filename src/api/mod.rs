use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::sync::Mutex;

use crate::ai::{LlmClient, Summarizer};
use crate::config::Config;
use crate::hn::HnClient;
use crate::services::{LogoClient, SearchClient};
use crate::store::StoreClient;
use crate::sync::{Reconciler, RefreshLock};

mod assist;
mod refresh;
mod search;
mod stories;

/// Everything the handlers need, shared behind one `Arc`.
pub struct AppState {
    pub store: Arc<StoreClient>,
    pub llm: Option<Arc<LlmClient>>,
    pub search: Option<Arc<SearchClient>>,
    pub logos: Option<Arc<LogoClient>>,
    pub reconciler: Arc<Reconciler>,
    pub refresh_lock: RefreshLock,
}

impl AppState {
    /// Wire up every client from the loaded configuration. Services whose
    /// key is missing stay `None`; their routes degrade per request
    /// instead of failing at startup.
    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(StoreClient::new(
            config.store_url.clone(),
            config.store_key.clone().unwrap_or_default(),
        ));

        let llm = config.openai_api_key.clone().map(|key| {
            Arc::new(LlmClient::new(
                config.openai_api_url.clone(),
                config.openai_model.clone(),
                key,
            ))
        });
        let search = config
            .brave_api_key
            .clone()
            .map(|key| Arc::new(SearchClient::new(config.brave_api_url.clone(), key)));
        let logos = config
            .logo_api_key
            .clone()
            .map(|key| Arc::new(LogoClient::new(config.logo_api_url.clone(), key)));

        let summarizer = llm.clone().map(Summarizer::new);
        let reconciler = Arc::new(Reconciler::new(
            HnClient::new(config.hn_api_url.clone()),
            store.clone(),
            summarizer,
        ));

        Self {
            store,
            llm,
            search,
            logos,
            reconciler,
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/stories", get(stories::stories_handler))
        .route("/refresh", post(refresh::refresh_handler))
        .route("/suggestions", post(assist::suggestions_handler))
        .route("/answer", post(assist::answer_handler))
        .route("/think", post(assist::think_handler))
        .route("/result-summary", post(assist::result_summary_handler))
        .route("/search", get(search::search_handler))
        .route("/logos", get(search::logos_handler))
        .route("/search-logos", get(search::search_logos_handler))
        .with_state(Arc::new(state))
}
