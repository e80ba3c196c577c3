use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Store API error: {0}")]
    StoreApi(String),

    #[error("LLM API error: {0}")]
    LlmApi(String),

    #[error("Search API error: {0}")]
    SearchApi(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
