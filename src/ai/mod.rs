mod client;
mod summarizer;

pub use client::LlmClient;
pub use summarizer::Summarizer;
