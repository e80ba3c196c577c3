use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use url::Url;

use crate::error::Result;

const USER_AGENT_STRING: &str = "Mozilla/5.0 (compatible; HackNewsBot/1.0)";

/// Pages that clean down to less than this many characters are not worth
/// summarizing.
const MIN_CONTENT_CHARS: usize = 100;

pub struct ContentFetcher {
    client: Client,
}

impl ContentFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT_STRING)
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    /// Fetch a page and reduce it to readable text.
    ///
    /// Soft failure mode throughout: a bad URL, an unhappy status, or a page
    /// with nothing worth reading all come back as `Ok(None)`.
    pub async fn fetch_page_text(&self, page_url: &str) -> Result<Option<String>> {
        if Url::parse(page_url).is_err() {
            tracing::debug!("Skipping invalid URL: {}", page_url);
            return Ok(None);
        }

        let response = self.client.get(page_url).send().await?;

        if !response.status().is_success() {
            tracing::debug!("Failed to fetch {}: {}", page_url, response.status());
            return Ok(None);
        }

        let html = response.text().await?;

        Ok(self.extract_text(&html))
    }

    /// Strip script and style blocks, then all remaining tags, and collapse
    /// whitespace down to single spaces.
    fn extract_text(&self, html: &str) -> Option<String> {
        let script_re = Regex::new(r"(?is)<script[^>]*>.*?</script>").ok()?;
        let style_re = Regex::new(r"(?is)<style[^>]*>.*?</style>").ok()?;
        let tag_re = Regex::new(r"<[^>]*>").ok()?;
        let space_re = Regex::new(r"\s+").ok()?;

        let text = script_re.replace_all(html, "");
        let text = style_re.replace_all(&text, "");
        let text = tag_re.replace_all(&text, " ");
        let text = space_re.replace_all(&text, " ");
        let cleaned = text.trim().to_string();

        if cleaned.chars().count() < MIN_CONTENT_CHARS {
            tracing::debug!("Extracted content too short ({} chars)", cleaned.len());
            return None;
        }

        Some(cleaned)
    }
}

impl Default for ContentFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_text_strips_markup_and_collapses_whitespace() {
        let fetcher = ContentFetcher::new();
        let html = format!(
            "<html><head><script>var x = 1;</script><style>body {{}}</style></head>\
             <body><h1>Title</h1>\n\n<p>{}</p></body></html>",
            "word ".repeat(40)
        );

        let text = fetcher.extract_text(&html).unwrap();
        assert!(!text.contains("var x"));
        assert!(!text.contains("body {"));
        assert!(!text.contains('<'));
        assert!(text.starts_with("Title word word"));
        assert!(!text.contains("  "));
    }

    #[test]
    fn extract_text_rejects_thin_pages() {
        let fetcher = ContentFetcher::new();
        let html = "<html><body><p>Too short to bother with.</p></body></html>";

        assert!(fetcher.extract_text(html).is_none());
    }

    #[tokio::test]
    async fn fetch_page_text_returns_none_for_invalid_url() {
        let fetcher = ContentFetcher::new();
        assert!(fetcher.fetch_page_text("not a url").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fetch_page_text_returns_none_on_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/gone")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = ContentFetcher::new();
        let url = format!("{}/gone", server.url());
        assert!(fetcher.fetch_page_text(&url).await.unwrap().is_none());
    }
}
