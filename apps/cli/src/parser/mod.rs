//! Response parser: pulls the JSON report out of the model's free text.
//!
//! Steps: trim, prefer a ```json fenced block, else the outermost braces,
//! strict parse, required-field check, then attach grounding sources. There is
//! no repair of malformed JSON and no check of the values themselves.

use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::llm_client::ModelResponse;
use crate::models::analysis::{AnalysisResult, GroundingSource};

/// Keys every report must carry, in the order they are reported when missing.
pub const REQUIRED_FIELDS: &[&str] = &[
    "companyName",
    "score",
    "missingSkills",
    "strengths",
    "quickTake",
    "pitchHighlights",
    "sampleEmail",
];

/// Title given to a grounding source the provider left untitled.
pub const UNTITLED_SOURCE: &str = "External Source";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("The AI returned an invalid format. Please try again.")]
    InvalidFormat,

    #[error("The AI response is missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

pub fn parse_analysis(response: &ModelResponse) -> Result<AnalysisResult, ParseError> {
    let candidate = extract_json_candidate(&response.text);

    let value: Value = serde_json::from_str(candidate).map_err(|e| {
        error!(error = %e, raw = %response.text, "Failed to parse AI response as JSON");
        ParseError::InvalidFormat
    })?;

    let missing = missing_fields(&value);
    if !missing.is_empty() {
        error!(?missing, "AI response is missing required fields");
        return Err(ParseError::MissingFields(missing));
    }

    let mut result: AnalysisResult = serde_json::from_value(value).map_err(|e| {
        error!(error = %e, raw = %response.text, "AI response fields have unexpected types");
        ParseError::InvalidFormat
    })?;

    let sources = grounding_sources(response);
    if !sources.is_empty() {
        result.grounding_sources = Some(sources);
    }

    Ok(result)
}

/// Picks the substring most likely to hold the JSON object.
///
/// Falls back to the trimmed text itself, which then fails the strict parse.
pub fn extract_json_candidate(text: &str) -> &str {
    let text = text.trim();

    if let Some(inner) = fenced_json_block(text) {
        return inner;
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Content of the first ```json fence, up to the next closing fence.
fn fenced_json_block(text: &str) -> Option<&str> {
    const OPEN: &str = "```json";
    const CLOSE: &str = "```";

    let start = text.find(OPEN)? + OPEN.len();
    let rest = &text[start..];
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    let end = rest.find(CLOSE)?;
    let inner = &rest[..end];
    Some(inner.strip_suffix('\n').unwrap_or(inner))
}

fn missing_fields(value: &Value) -> Vec<String> {
    let object = value.as_object();
    REQUIRED_FIELDS
        .iter()
        .filter(|field| object.map_or(true, |o| !o.contains_key(**field)))
        .map(|field| field.to_string())
        .collect()
}

fn grounding_sources(response: &ModelResponse) -> Vec<GroundingSource> {
    response
        .grounding_chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .map(|web| GroundingSource {
            title: web
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED_SOURCE.to_string()),
            uri: web.uri.clone().unwrap_or_default(),
        })
        .collect()
}
