use serde::{Deserialize, Deserializer, Serialize};

/// A web reference the model cited while answering with search enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

/// Structured match report produced once per analysis request.
///
/// Field names follow the JSON schema the model is asked to emit, so the same
/// type is used to parse the model output and to print `--json` results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub company_name: String,
    /// Expected in 0..=100 but never clamped.
    #[serde(deserialize_with = "deserialize_score")]
    pub score: i64,
    pub missing_skills: Vec<String>,
    pub strengths: Vec<String>,
    /// Three bullets requested; the count is not enforced.
    pub quick_take: Vec<String>,
    /// Three bullets requested; the count is not enforced.
    pub pitch_highlights: Vec<String>,
    pub sample_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_sources: Option<Vec<GroundingSource>>,
}

/// Accepts `82` as well as `82.0`; models are not consistent about it.
fn deserialize_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    value
        .as_f64()
        .map(|f| f.trunc() as i64)
        .ok_or_else(|| serde::de::Error::custom("score is not a representable number"))
}
