use std::sync::Arc;

use crate::ai::LlmClient;
use crate::services::ContentFetcher;

/// Upper bound on cleaned page text submitted to the model.
const MAX_CONTENT_CHARS: usize = 8000;
/// Served summaries never exceed this many characters.
const SUMMARY_BUDGET_CHARS: usize = 300;
const SUMMARY_MAX_TOKENS: u32 = 200;
const SUMMARY_TEMPERATURE: f32 = 0.3;

pub struct Summarizer {
    fetcher: ContentFetcher,
    llm: Arc<LlmClient>,
}

impl Summarizer {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self {
            fetcher: ContentFetcher::new(),
            llm,
        }
    }

    /// Produce a bounded summary of the page behind `url`.
    ///
    /// Every failure along the way (unreachable page, thin content, model
    /// trouble) collapses to `None`; callers treat a missing summary as a
    /// normal outcome, not an error.
    pub async fn summarize(&self, url: &str) -> Option<String> {
        let text = match self.fetcher.fetch_page_text(url).await {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!("Failed to fetch {} for summary: {}", url, e);
                return None;
            }
        };

        // Truncate content if too long
        let content: String = text.chars().take(MAX_CONTENT_CHARS).collect();

        let prompt = format!(
            "Please provide a 300-character summary of the following content. \
             Make sure that the summary is complete and in full sentences:\n\n{}",
            content
        );

        let summary = match self
            .llm
            .chat(&prompt, SUMMARY_MAX_TOKENS, SUMMARY_TEMPERATURE)
            .await
        {
            Ok(Some(summary)) => summary,
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!("Summary generation failed for {}: {}", url, e);
                return None;
            }
        };

        Some(clamp_summary(summary))
    }
}

/// Anything over budget is cut to 297 characters plus an ellipsis, so the
/// result lands at exactly 300.
fn clamp_summary(summary: String) -> String {
    if summary.chars().count() > SUMMARY_BUDGET_CHARS {
        let head: String = summary.chars().take(SUMMARY_BUDGET_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarizer_for(server: &mockito::Server) -> Summarizer {
        let llm = Arc::new(LlmClient::new(
            server.url(),
            "gpt-3.5-turbo".to_string(),
            "sk-test".to_string(),
        ));
        Summarizer::new(llm)
    }

    fn page_body(words: usize) -> String {
        format!("<html><body><p>{}</p></body></html>", "lorem ".repeat(words))
    }

    #[test]
    fn clamp_leaves_short_summaries_alone() {
        let summary = "Short and sweet.".to_string();
        assert_eq!(clamp_summary(summary.clone()), summary);
    }

    #[test]
    fn clamp_cuts_long_summaries_to_exactly_300() {
        let long = "x".repeat(340);
        let clamped = clamp_summary(long);

        assert_eq!(clamped.chars().count(), 300);
        assert!(clamped.ends_with("..."));
        assert_eq!(&clamped[..297], &"x".repeat(297));
    }

    #[test]
    fn clamp_respects_char_boundaries() {
        // Multibyte input must not be split mid-character.
        let long = "é".repeat(340);
        let clamped = clamp_summary(long);

        assert_eq!(clamped.chars().count(), 300);
        assert!(clamped.ends_with("..."));
    }

    #[tokio::test]
    async fn summarize_runs_page_through_the_model() {
        let mut server = mockito::Server::new_async().await;
        let _page = server
            .mock("GET", "/article")
            .with_status(200)
            .with_body(page_body(60))
            .create_async()
            .await;
        let _chat = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"content": "A tidy summary."}}]}"#)
            .create_async()
            .await;

        let summarizer = summarizer_for(&server);
        let url = format!("{}/article", server.url());

        assert_eq!(summarizer.summarize(&url).await.as_deref(), Some("A tidy summary."));
    }

    #[tokio::test]
    async fn summarize_skips_thin_pages_without_calling_the_model() {
        let mut server = mockito::Server::new_async().await;
        let _page = server
            .mock("GET", "/article")
            .with_status(200)
            .with_body("<html><body>50 chars of content is not enough.</body></html>")
            .create_async()
            .await;
        let chat = server
            .mock("POST", "/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let summarizer = summarizer_for(&server);
        let url = format!("{}/article", server.url());

        assert!(summarizer.summarize(&url).await.is_none());
        chat.assert_async().await;
    }

    #[tokio::test]
    async fn summarize_swallows_model_errors() {
        let mut server = mockito::Server::new_async().await;
        let _page = server
            .mock("GET", "/article")
            .with_status(200)
            .with_body(page_body(60))
            .create_async()
            .await;
        let _chat = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .create_async()
            .await;

        let summarizer = summarizer_for(&server);
        let url = format!("{}/article", server.url());

        assert!(summarizer.summarize(&url).await.is_none());
    }
}
