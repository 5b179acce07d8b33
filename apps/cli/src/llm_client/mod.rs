//! Model client: the single point of entry for generative-model calls.
//!
//! Callers depend on the [`ModelClient`] trait; [`GeminiClient`] is the
//! production implementation over the Gemini `generateContent` REST endpoint.
//! Nothing here retries: every failure is classified and handed back.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod adapter;

pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Provider message that signals the credential lacks the tier needed for
/// search-grounded requests. Providers reword errors without notice; treat this
/// as a best-effort match.
const ENTITLEMENT_MISMATCH_MARKER: &str = "Requested entity was not found";

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("API key not configured")]
    MissingCredential,

    #[error("API key is invalid or not authorized: {0}")]
    InvalidCredential(String),

    #[error("Rate limit or quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Requested entity was not found: {0}")]
    EntitlementMismatch(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Could not decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Empty response from AI")]
    EmptyResponse,
}

/// One generation request as the rest of the crate sees it.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model: String,
    pub prompt: String,
    pub system_instruction: String,
    pub use_search: bool,
}

/// Normalized provider answer: free text plus any grounding chunks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResponse {
    pub text: String,
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundingChunk {
    /// Only web-typed chunks carry this; other retrieval kinds are ignored.
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebSource {
    pub title: Option<String>,
    pub uri: Option<String>,
}

#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: SystemInstruction<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Result<Self, ModelError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        let api_key = self.api_key.as_deref().ok_or(ModelError::MissingCredential)?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: &request.system_instruction,
                }],
            },
            tools: if request.use_search {
                vec![Tool {
                    google_search: GoogleSearch {},
                }]
            } else {
                Vec::new()
            },
        };

        debug!(
            model = %request.model,
            use_search = request.use_search,
            prompt_chars = request.prompt.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let raw = response.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            warn!("Model API returned {}: {}", status, raw);
            return Err(classify_api_error(status.as_u16(), &raw));
        }

        let payload: serde_json::Value = serde_json::from_str(&raw)?;
        let normalized = adapter::normalize(&payload)?;
        debug!(
            response_chars = normalized.text.len(),
            grounding_chunks = normalized.grounding_chunks.len(),
            "Model call succeeded"
        );
        Ok(normalized)
    }
}

fn classify_transport_error(e: reqwest::Error) -> ModelError {
    if e.is_timeout() {
        ModelError::Timeout
    } else {
        ModelError::Http(e)
    }
}

/// Maps a non-success provider response onto the error taxonomy.
pub fn classify_api_error(status: u16, body: &str) -> ModelError {
    let (message, provider_status) = match serde_json::from_str::<ProviderError>(body) {
        Ok(e) => (e.error.message, e.error.status),
        Err(_) => (body.to_string(), String::new()),
    };

    if is_entitlement_mismatch(status, &provider_status, &message) {
        return ModelError::EntitlementMismatch(message);
    }

    match (status, provider_status.as_str()) {
        (401 | 403, _) => ModelError::InvalidCredential(message),
        (400, _) if message.contains("API key not valid") || body.contains("API_KEY_INVALID") => {
            ModelError::InvalidCredential(message)
        }
        (429, _) | (_, "RESOURCE_EXHAUSTED") => ModelError::QuotaExceeded(message),
        (504, _) | (_, "DEADLINE_EXCEEDED") => ModelError::Timeout,
        _ => ModelError::Api { status, message },
    }
}

fn is_entitlement_mismatch(status: u16, provider_status: &str, message: &str) -> bool {
    message.contains(ENTITLEMENT_MISMATCH_MARKER) || (status == 404 && provider_status == "NOT_FOUND")
}
