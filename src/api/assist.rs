use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use regex::Regex;
use serde::Deserialize;

use super::AppState;

const SUGGESTIONS_MAX_TOKENS: u32 = 150;
const SUGGESTIONS_TEMPERATURE: f32 = 0.7;
const ANSWER_MAX_TOKENS: u32 = 150;
const ANSWER_TEMPERATURE: f32 = 0.4;
const THINK_MAX_TOKENS: u32 = 250;
const THINK_TEMPERATURE: f32 = 0.6;
const RESULT_SUMMARY_MAX_TOKENS: u32 = 150;
const RESULT_SUMMARY_TEMPERATURE: f32 = 0.5;
const MAX_SUGGESTIONS: usize = 8;

/// Served when no model is configured, and truncated to four entries when
/// the model errors out on an empty query.
const STATIC_SUGGESTIONS: [&str; 8] = [
    "AI developments 2024",
    "React best practices",
    "Startup funding news",
    "Open source projects",
    "Tech industry trends",
    "Web development tools",
    "Machine learning basics",
    "Software engineering tips",
];

/// Served when the model comes back empty.
const SPARSE_SUGGESTIONS: [&str; 4] = [
    "AI developments",
    "React tips",
    "Startup advice",
    "Open source",
];

#[derive(Debug, Deserialize, Default)]
pub struct QueryBody {
    #[serde(default)]
    query: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummaryBody {
    #[serde(default)]
    selected_query: String,
    highlighted_result: Option<HighlightedResult>,
    #[serde(default)]
    search_results: Vec<SearchResultRef>,
}

#[derive(Debug, Deserialize, Default)]
struct HighlightedResult {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResultRef {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
}

/// Suggest follow-up searches for a partial query. Every failure mode
/// degrades to a canned list; this endpoint never reports an error.
pub async fn suggestions_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<QueryBody>>,
) -> Response {
    let query = body.map(|Json(b)| b.query).unwrap_or_default();

    let Some(llm) = &state.llm else {
        return suggestions_reply(&STATIC_SUGGESTIONS);
    };

    let prompt = if query.trim().is_empty() {
        "Generate 8 popular tech and startup search suggestions that would be interesting \
         to research. Make each suggestion 2-5 words, focused on current trends and \
         actionable topics. Return only the suggestions, one per line."
            .to_string()
    } else {
        format!(
            "Based on the search query \"{query}\", generate 8 relevant, specific search \
             suggestions for finding articles, tutorials, or discussions. Make each \
             suggestion 2-5 words, focused on actionable topics someone might want to \
             research. Return only the suggestions, one per line."
        )
    };

    match llm
        .chat(&prompt, SUGGESTIONS_MAX_TOKENS, SUGGESTIONS_TEMPERATURE)
        .await
    {
        Ok(Some(reply)) => suggestions_reply(&parse_suggestions(&reply)),
        Ok(None) => suggestions_reply(&SPARSE_SUGGESTIONS),
        Err(e) => {
            tracing::debug!("Suggestion model call failed: {}", e);
            suggestions_reply(&contextual_suggestions(&query))
        }
    }
}

fn suggestions_reply<S: serde::Serialize>(suggestions: &S) -> Response {
    Json(serde_json::json!({ "suggestions": suggestions })).into_response()
}

/// Split a model reply into clean suggestion lines, dropping any "1. "
/// style numbering the model added despite instructions.
fn parse_suggestions(reply: &str) -> Vec<String> {
    let numbering = Regex::new(r"^\d+\.\s*").ok();

    reply
        .lines()
        .map(|line| {
            let line = match &numbering {
                Some(re) => re.replace(line, "").into_owned(),
                None => line.to_string(),
            };
            line.trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Templated suggestions for when the model is unreachable.
fn contextual_suggestions(query: &str) -> Vec<String> {
    if query.trim().is_empty() {
        return STATIC_SUGGESTIONS[..4].iter().map(|s| s.to_string()).collect();
    }

    [
        "best practices",
        "tutorial",
        "vs alternatives",
        "getting started",
        "advanced tips",
        "use cases",
        "examples",
        "troubleshooting",
    ]
    .iter()
    .map(|suffix| format!("{query} {suffix}"))
    .collect()
}

/// Give a short self-contained answer about the query.
pub async fn answer_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<QueryBody>>,
) -> Response {
    let query = body.map(|Json(b)| b.query).unwrap_or_default();

    let fallback = format!(
        "Search for \"{query}\" across multiple sources to find the latest articles, \
         discussions, and insights on this topic."
    );

    let Some(llm) = &state.llm else {
        return answer_reply(fallback);
    };

    let prompt = format!(
        "Provide a brief, informative answer about \"{query}\". The answer should be 2-3 \
         sentences, completely self-contained without pronouns (avoid \"it\", \"this\", \
         \"they\", etc.), and understandable without seeing the original query. Focus on \
         explaining what {query} is, why {query} matters, or what someone would find when \
         researching {query}."
    );

    match llm.chat(&prompt, ANSWER_MAX_TOKENS, ANSWER_TEMPERATURE).await {
        Ok(Some(answer)) => answer_reply(answer),
        Ok(None) => answer_reply(format!(
            "Search for \"{query}\" to discover relevant articles, tutorials, and \
             discussions about this topic."
        )),
        Err(e) => {
            tracing::debug!("Answer model call failed: {}", e);
            answer_reply(fallback)
        }
    }
}

/// Longer analytical take on the query, for the deep-focus mode.
pub async fn think_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<QueryBody>>,
) -> Response {
    let query = body.map(|Json(b)| b.query).unwrap_or_default();

    let Some(llm) = &state.llm else {
        return answer_reply(format!(
            "Deep dive analysis for \"{query}\" - examining patterns, trends, and insights \
             across multiple sources to provide comprehensive understanding."
        ));
    };

    let prompt = format!(
        "You are an expert analyst providing a deep dive on \"{query}\".\n\n\
         Provide a comprehensive, analytical response that goes beyond surface-level \
         information. Focus on:\n\
         - Key insights and trends\n\
         - Practical implications\n\
         - Important considerations or challenges\n\
         - Current state and future outlook\n\
         - Actionable recommendations\n\n\
         Make this a thoughtful, well-structured analysis in 3-4 sentences that someone \
         deeply researching \"{query}\" would find valuable."
    );

    match llm.chat(&prompt, THINK_MAX_TOKENS, THINK_TEMPERATURE).await {
        Ok(Some(answer)) => answer_reply(answer),
        Ok(None) => answer_reply(format!(
            "In-depth analysis of \"{query}\" requires examining current landscape, key \
             challenges, and emerging opportunities in this domain."
        )),
        Err(e) => {
            tracing::debug!("Think model call failed: {}", e);
            answer_reply(format!(
                "Deep analysis for \"{query}\" involves examining current trends, practical \
                 applications, and key considerations. This topic requires understanding \
                 multiple perspectives and staying current with latest developments."
            ))
        }
    }
}

fn answer_reply(answer: String) -> Response {
    Json(serde_json::json!({ "answer": answer })).into_response()
}

/// Summarize one highlighted search result against the rest of the page.
pub async fn result_summary_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<ResultSummaryBody>>,
) -> Response {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let query = body.selected_query;
    let highlighted = body.highlighted_result.unwrap_or_default();

    let Some(llm) = &state.llm else {
        let title = highlighted
            .title
            .unwrap_or_else(|| "This search result".to_string());
        return summary_reply(format!(
            "{title} provides relevant information about \"{query}\". Navigate through \
             other results to explore different perspectives and sources on this topic."
        ));
    };

    let result_title = highlighted
        .title
        .unwrap_or_else(|| "Search result".to_string());
    let result_description = highlighted
        .description
        .unwrap_or_else(|| "No description available".to_string());
    let result_url = highlighted.url.unwrap_or_default();

    // Up to three sibling results give the model something to contrast
    // the highlighted one against.
    let other_results = if body.search_results.len() > 1 {
        body.search_results
            .iter()
            .take(3)
            .filter(|r| r.url != result_url)
            .map(|r| format!("- {}", r.title))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        String::new()
    };
    let contextual_info = if other_results.is_empty() {
        String::new()
    } else {
        format!("\n\nOther related results for comparison:\n{other_results}")
    };

    let prompt = format!(
        "Summarize this specific search result as it relates to the query \"{query}\":\n\n\
         Title: {result_title}\n\
         Description: {result_description}\n\
         Source: {result_url}{contextual_info}\n\n\
         Provide a 2-3 sentence summary that explains:\n\
         1. What specific information this source offers about \"{query}\"\n\
         2. What makes this particular result unique or valuable compared to other sources\n\
         3. Key insights or perspective this source provides\n\n\
         Focus on being concise and highlighting what's distinctive about THIS specific result."
    );

    match llm
        .chat(&prompt, RESULT_SUMMARY_MAX_TOKENS, RESULT_SUMMARY_TEMPERATURE)
        .await
    {
        Ok(Some(summary)) => summary_reply(summary),
        Ok(None) => summary_reply(format!(
            "{result_title} contains relevant information about \"{query}\". This result \
             provides valuable context and details for your research on this topic."
        )),
        Err(e) => {
            tracing::debug!("Result summary model call failed: {}", e);
            summary_reply(format!(
                "{result_title} offers specific insights about \"{query}\". This source \
                 provides a unique perspective that complements other available information \
                 on this topic."
            ))
        }
    }
}

fn summary_reply(summary: String) -> Response {
    Json(serde_json::json!({ "summary": summary })).into_response()
}
