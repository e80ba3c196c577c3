use std::collections::HashMap;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Domains whose logos back the default company strip.
const COMPANY_DOMAINS: &[&str] = &[
    "github.com",
    "google.com",
    "microsoft.com",
    "apple.com",
    "amazon.com",
    "facebook.com",
    "meta.com",
    "netflix.com",
    "spotify.com",
    "uber.com",
    "airbnb.com",
    "tesla.com",
    "nvidia.com",
    "intel.com",
    "adobe.com",
    "reddit.com",
    "twitter.com",
    "youtube.com",
    "medium.com",
    "stackoverflow.com",
    "openai.com",
    "nytimes.com",
    "wsj.com",
    "bloomberg.com",
    "reuters.com",
    "cnn.com",
    "bbc.com",
    "techcrunch.com",
    "wired.com",
    "theverge.com",
    "ycombinator.com",
];

/// Abbreviation and alias expansion for logo search.
const COMPANY_ALIASES: &[(&str, &[&str])] = &[
    ("nyt", &["new york times", "nytimes"]),
    ("ny", &["new york times", "nytimes"]),
    ("wsj", &["wall street journal", "wsj"]),
    ("wall", &["wall street journal", "wsj"]),
    ("hacker", &["y combinator", "ycombinator"]),
    ("yc", &["y combinator", "ycombinator"]),
    ("fb", &["facebook", "meta"]),
    ("ig", &["instagram"]),
    ("yt", &["youtube"]),
    ("gh", &["github"]),
    ("ms", &["microsoft"]),
    ("goog", &["google"]),
    ("amzn", &["amazon"]),
    ("nflx", &["netflix"]),
    ("twtr", &["twitter", "x"]),
    ("spot", &["spotify"]),
    ("uber", &["uber"]),
    ("abnb", &["airbnb"]),
    ("tsla", &["tesla"]),
    ("nvda", &["nvidia"]),
    ("intc", &["intel"]),
    ("adbe", &["adobe"]),
    ("ai", &["openai"]),
    ("cnn", &["cnn"]),
    ("bbc", &["bbc"]),
    ("tc", &["techcrunch"]),
    ("reddit", &["reddit"]),
    ("medium", &["medium"]),
    ("so", &["stackoverflow", "stack overflow"]),
    ("apple", &["apple"]),
    ("amazon", &["amazon"]),
    ("google", &["google"]),
    ("microsoft", &["microsoft"]),
    ("meta", &["meta", "facebook"]),
    ("netflix", &["netflix"]),
    ("spotify", &["spotify"]),
    ("github", &["github"]),
    ("twitter", &["twitter", "x"]),
    ("youtube", &["youtube"]),
    ("tesla", &["tesla"]),
    ("nvidia", &["nvidia"]),
    ("intel", &["intel"]),
    ("adobe", &["adobe"]),
    ("openai", &["openai"]),
    ("bloomberg", &["bloomberg"]),
    ("reuters", &["reuters"]),
    ("wired", &["wired"]),
    ("verge", &["the verge", "verge"]),
];

/// Most terms a single search fans out to, and most hits returned.
const MAX_LOOKUPS: usize = 8;

#[derive(Debug, Deserialize)]
struct LogoRow {
    logo_url: Option<String>,
    domain: Option<String>,
}

/// A resolved logo for one search term.
#[derive(Debug, Clone, Serialize)]
pub struct LogoHit {
    pub name: String,
    pub logo_url: String,
    pub domain: String,
}

pub struct LogoClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl LogoClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Logos for the fixed company strip, keyed by cleaned company name.
    /// Companies the lookup cannot resolve are simply absent from the map.
    pub async fn company_logos(&self) -> HashMap<String, String> {
        let names: Vec<String> = COMPANY_DOMAINS.iter().map(|d| company_name(d)).collect();
        let hits: Vec<(String, String)> = stream::iter(names)
            .map(|name| async move { self.lookup(&name).await.map(|hit| (name, hit.logo_url)) })
            .buffer_unordered(5) // Max 5 concurrent fetches
            .filter_map(|hit| async { hit })
            .collect()
            .await;

        hits.into_iter().collect()
    }

    /// Expand a free-form query through the alias table and resolve logos
    /// for the matching terms.
    pub async fn search_logos(&self, query: &str) -> Vec<LogoHit> {
        let terms = expand_terms(query);

        let hits: Vec<LogoHit> = stream::iter(terms)
            .map(|term| async move { self.lookup(&term).await })
            .buffer_unordered(5) // Max 5 concurrent fetches
            .filter_map(|hit| async { hit })
            .collect()
            .await;

        hits.into_iter().take(MAX_LOOKUPS).collect()
    }

    /// Look up the best logo for one term. Failed lookups and empty answers
    /// both come back as `None`; callers skip and move on.
    async fn lookup(&self, term: &str) -> Option<LogoHit> {
        let response = match self
            .client
            .get(format!(
                "{}/search?q={}",
                self.base_url,
                urlencoding::encode(term)
            ))
            .header("Accept", "application/json")
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Logo lookup failed for {}: {}", term, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Logo lookup failed for {}: {}", term, response.status());
            return None;
        }

        let rows: Vec<LogoRow> = response.json().await.ok()?;
        let first = rows.into_iter().next()?;
        let logo_url = first.logo_url?;

        Some(LogoHit {
            name: term.to_string(),
            logo_url,
            domain: first.domain.unwrap_or_else(|| term.to_string()),
        })
    }
}

/// Domain to display name: strip the TLD and a leading "the".
fn company_name(domain: &str) -> String {
    domain.trim_end_matches(".com").replacen("the", "", 1)
}

/// Expand a query through the alias table: the direct term first, then
/// aliases for prefix matches, then aliases for substring matches.
/// Insertion order is preserved and duplicates are dropped.
fn expand_terms(query: &str) -> Vec<String> {
    let search_term = query.trim().to_lowercase();

    let mut terms: Vec<String> = Vec::new();
    add_term(&mut terms, &search_term);

    for (key, aliases) in COMPANY_ALIASES {
        if key.starts_with(search_term.as_str()) || search_term.starts_with(key) {
            for alias in *aliases {
                add_term(&mut terms, alias);
            }
        }
    }

    for (key, aliases) in COMPANY_ALIASES {
        if key.contains(search_term.as_str()) || search_term.contains(key) {
            for alias in *aliases {
                add_term(&mut terms, alias);
            }
        }
    }

    terms.truncate(MAX_LOOKUPS);
    terms
}

fn add_term(terms: &mut Vec<String>, term: &str) {
    if !terms.iter().any(|t| t == term) {
        terms.push(term.to_string());
    }
}
