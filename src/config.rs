use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_hn_api_url")]
    pub hn_api_url: String,

    #[serde(default = "default_store_url")]
    pub store_url: String,
    pub store_key: Option<String>,

    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    pub openai_api_key: Option<String>,

    #[serde(default = "default_brave_api_url")]
    pub brave_api_url: String,
    pub brave_api_key: Option<String>,

    #[serde(default = "default_logo_api_url")]
    pub logo_api_url: String,
    pub logo_api_key: Option<String>,

    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_minutes: u32,
}

fn default_listen_addr() -> String {
    "127.0.0.1:3100".to_string()
}

fn default_hn_api_url() -> String {
    "https://hacker-news.firebaseio.com/v0".to_string()
}

fn default_store_url() -> String {
    // Supabase local development REST endpoint
    "http://localhost:54321/rest/v1".to_string()
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_brave_api_url() -> String {
    "https://api.search.brave.com/res/v1".to_string()
}

fn default_logo_api_url() -> String {
    "https://api.logo.dev".to_string()
}

fn default_refresh_interval() -> u32 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            hn_api_url: default_hn_api_url(),
            store_url: default_store_url(),
            store_key: None,
            openai_api_url: default_openai_api_url(),
            openai_model: default_openai_model(),
            openai_api_key: None,
            brave_api_url: default_brave_api_url(),
            brave_api_key: None,
            logo_api_url: default_logo_api_url(),
            logo_api_key: None,
            refresh_interval_minutes: default_refresh_interval(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config: Config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            let config = Config::default();
            config.save()?;
            config
        };

        config.fill_keys_from_env();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hackfeed")
            .join("config.toml")
    }

    /// Secrets can be supplied via environment variables instead of the config file.
    fn fill_keys_from_env(&mut self) {
        if self.store_key.is_none() {
            self.store_key = std::env::var("HACKFEED_STORE_KEY").ok();
        }
        if self.openai_api_key.is_none() {
            self.openai_api_key = std::env::var("HACKFEED_OPENAI_KEY").ok();
        }
        if self.brave_api_key.is_none() {
            self.brave_api_key = std::env::var("HACKFEED_BRAVE_KEY").ok();
        }
        if self.logo_api_key.is_none() {
            self.logo_api_key = std::env::var("HACKFEED_LOGO_KEY").ok();
        }
    }
}
