//! Text-generation backend for recipe synthesis.
//!
//! The production backend is a Gemini-shaped `generateContent` HTTP endpoint
//! reached through [`GeminiClient`]. The concrete transport (direct API or a
//! thin forwarding proxy) sits behind the [`TextGenerator`] trait.

mod gemini;

pub use gemini::{GeminiClient, GeminiConfig};

use async_trait::async_trait;

use crate::error::GenerationError;

/// One generation request: a prompt, an optional persona instruction, and an
/// optional JSON output-schema hint.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub response_schema: Option<serde_json::Value>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
            response_schema: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Constrain the response to a JSON object of the given schema.
    pub fn with_response_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// A text-generation endpoint.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Submit a prompt and return the raw text payload from the endpoint.
    ///
    /// One outbound call per invocation; no retries at this layer.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}
