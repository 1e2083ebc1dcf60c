//! Gemini `generateContent` client.
//!
//! Direct reqwest transport. The endpoint may answer with either of two
//! envelope shapes; both are modeled explicitly and tried in a fixed
//! priority order.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

use super::{GenerationRequest, TextGenerator};

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: SecretString,
    pub model: String,
    /// Endpoint base, overridable to route through a forwarding proxy.
    pub base_url: String,
}

/// Gemini-shaped `generateContent` HTTP client.
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

// ── Request wire types ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<ContentPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ContentPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct ContentPayload {
    parts: Vec<PartPayload>,
}

impl ContentPayload {
    fn text(text: &str) -> Self {
        Self {
            parts: vec![PartPayload {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct PartPayload {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

// ── Response wire types ─────────────────────────────────────────────

/// The known envelope shapes the endpoint may answer with. Variant order is
/// the extraction priority: a direct `contents` envelope wins over a
/// `candidates` one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseEnvelope {
    /// `{"contents":[{"parts":[{"text":...}]}]}`
    Direct { contents: Vec<RespContent> },
    /// `{"candidates":[{"content":{"parts":[{"text":...}]}}]}`
    Candidates { candidates: Vec<Candidate> },
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<RespContent>,
}

#[derive(Debug, Deserialize)]
struct RespContent {
    #[serde(default)]
    parts: Vec<RespPart>,
}

#[derive(Debug, Deserialize)]
struct RespPart {
    #[serde(default)]
    text: Option<String>,
}

impl ResponseEnvelope {
    /// Extract the text payload, per-variant.
    fn into_text(self) -> Option<String> {
        match self {
            Self::Direct { contents } => first_part_text(contents),
            Self::Candidates { candidates } => {
                first_part_text(candidates.into_iter().filter_map(|c| c.content).collect())
            }
        }
    }
}

fn first_part_text(contents: Vec<RespContent>) -> Option<String> {
    contents
        .into_iter()
        .flat_map(|c| c.parts)
        .find_map(|p| p.text)
}

/// Error envelope: `{"error":{"message":...}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![ContentPayload::text(&request.prompt)],
            system_instruction: request
                .system_instruction
                .as_deref()
                .map(ContentPayload::text),
            generation_config: request.response_schema.as_ref().map(|schema| {
                GenerationConfig {
                    response_mime_type: "application/json".to_string(),
                    response_schema: Some(schema.clone()),
                }
            }),
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::RequestFailed {
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::RequestFailed {
                reason: e.to_string(),
            })?;

        if !(200..300).contains(&status) {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(GenerationError::Status { status, message });
        }

        let envelope: ResponseEnvelope =
            serde_json::from_str(&text).map_err(|e| GenerationError::MalformedResponse {
                reason: format!("unrecognized response envelope: {e}"),
            })?;

        envelope
            .into_text()
            .filter(|t| !t.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_from_direct_envelope() {
        let json = r#"{"contents":[{"parts":[{"text":"hello"}]}]}"#;
        let envelope: ResponseEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.into_text().as_deref(), Some("hello"));
    }

    #[test]
    fn extracts_text_from_candidates_envelope() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"hello"}]}}]}"#;
        let envelope: ResponseEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.into_text().as_deref(), Some("hello"));
    }

    #[test]
    fn skips_textless_parts() {
        let json = r#"{"candidates":[{"content":{"parts":[{},{"text":"second"}]}}]}"#;
        let envelope: ResponseEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.into_text().as_deref(), Some("second"));
    }

    #[test]
    fn empty_candidates_yield_no_text() {
        let json = r#"{"candidates":[]}"#;
        let envelope: ResponseEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.into_text().is_none());
    }

    #[test]
    fn unknown_envelope_fails_to_parse() {
        let json = r#"{"something":"else"}"#;
        assert!(serde_json::from_str::<ResponseEnvelope>(json).is_err());
    }

    #[test]
    fn error_envelope_parses_message() {
        let json = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.error.message, "API key not valid");
    }

    #[test]
    fn request_body_wire_shape() {
        let body = GenerateContentRequest {
            contents: vec![ContentPayload::text("prompt")],
            system_instruction: Some(ContentPayload::text("persona")),
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: Some(serde_json::json!({"type": "OBJECT"})),
            }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "persona");
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }
}
