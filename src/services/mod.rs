mod content_fetcher;
mod logos;
mod search;

pub use content_fetcher::ContentFetcher;
pub use logos::{LogoClient, LogoHit};
pub use search::{SearchClient, SearchResult};
