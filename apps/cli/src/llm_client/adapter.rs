//! Normalizes provider payloads into [`ModelResponse`].
//!
//! This is the only place that knows which JSON shapes the provider (or a
//! proxy in front of it) may answer with. Everything downstream sees one type.

use serde_json::Value;

use super::{GroundingChunk, ModelError, ModelResponse, WebSource};

pub fn normalize(payload: &Value) -> Result<ModelResponse, ModelError> {
    let candidate = payload
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|c| c.first());

    let (text, chunks) = match candidate {
        Some(candidate) => (
            candidate_text(candidate),
            grounding_chunks(candidate),
        ),
        // Flattened SDK shape: `{ "text": ..., "groundingChunks": [...] }`
        None => (
            payload
                .get("text")
                .and_then(Value::as_str)
                .map(String::from),
            grounding_chunks(payload),
        ),
    };

    let text = text
        .filter(|t| !t.trim().is_empty())
        .ok_or(ModelError::EmptyResponse)?;

    Ok(ModelResponse {
        text,
        grounding_chunks: chunks,
    })
}

/// Concatenates the text parts of a candidate, skipping thought summaries.
fn candidate_text(candidate: &Value) -> Option<String> {
    let parts = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)?;

    let text: String = parts
        .iter()
        .filter(|p| !p.get("thought").and_then(Value::as_bool).unwrap_or(false))
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();

    Some(text)
}

fn grounding_chunks(container: &Value) -> Vec<GroundingChunk> {
    let metadata = field(container, "groundingMetadata", "grounding_metadata");
    let chunks = metadata
        .and_then(|m| field(m, "groundingChunks", "grounding_chunks"))
        .or_else(|| field(container, "groundingChunks", "grounding_chunks"))
        .and_then(Value::as_array);

    chunks
        .map(|chunks| {
            chunks
                .iter()
                .map(|chunk| GroundingChunk {
                    web: chunk.get("web").map(|web| WebSource {
                        title: web.get("title").and_then(Value::as_str).map(String::from),
                        uri: web.get("uri").and_then(Value::as_str).map(String::from),
                    }),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn field<'a>(value: &'a Value, camel: &str, snake: &str) -> Option<&'a Value> {
    value.get(camel).or_else(|| value.get(snake))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rest_shape_with_grounding() {
        let payload = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "```json\n{\"a\":"},
                        {"text": "1}\n```"}
                    ]
                },
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://stripe.com", "title": "stripe.com"}},
                        {"retrievedContext": {"uri": "gs://x"}}
                    ]
                }
            }]
        });

        let response = normalize(&payload).unwrap();
        assert_eq!(response.text, "```json\n{\"a\":1}\n```");
        assert_eq!(response.grounding_chunks.len(), 2);
        let web = response.grounding_chunks[0].web.as_ref().unwrap();
        assert_eq!(web.uri.as_deref(), Some("https://stripe.com"));
        assert!(response.grounding_chunks[1].web.is_none());
    }

    #[test]
    fn test_thought_parts_are_skipped() {
        let payload = json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "thinking about it", "thought": true},
                    {"text": "{}"}
                ]}
            }]
        });
        assert_eq!(normalize(&payload).unwrap().text, "{}");
    }

    #[test]
    fn test_snake_case_shape() {
        let payload = json!({
            "candidates": [{
                "content": {"parts": [{"text": "{}"}]},
                "grounding_metadata": {
                    "grounding_chunks": [{"web": {"uri": "https://a.example"}}]
                }
            }]
        });
        let response = normalize(&payload).unwrap();
        let web = response.grounding_chunks[0].web.as_ref().unwrap();
        assert!(web.title.is_none());
        assert_eq!(web.uri.as_deref(), Some("https://a.example"));
    }

    #[test]
    fn test_flattened_sdk_shape() {
        let payload = json!({
            "text": "{\"companyName\":\"Acme\"}",
            "groundingChunks": [{"web": {"uri": "https://acme.test", "title": "Acme"}}]
        });
        let response = normalize(&payload).unwrap();
        assert_eq!(response.text, "{\"companyName\":\"Acme\"}");
        assert_eq!(response.grounding_chunks.len(), 1);
    }

    #[test]
    fn test_no_grounding_metadata_is_empty() {
        let payload = json!({"candidates": [{"content": {"parts": [{"text": "hi"}]}}]});
        assert!(normalize(&payload).unwrap().grounding_chunks.is_empty());
    }

    #[test]
    fn test_missing_text_is_empty_response() {
        let blocked = json!({"candidates": [{"finishReason": "SAFETY"}]});
        assert!(matches!(normalize(&blocked), Err(ModelError::EmptyResponse)));

        let blank = json!({"candidates": [{"content": {"parts": [{"text": "  "}]}}]});
        assert!(matches!(normalize(&blank), Err(ModelError::EmptyResponse)));

        assert!(matches!(normalize(&json!({})), Err(ModelError::EmptyResponse)));
    }
}
