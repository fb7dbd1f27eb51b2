//! Generation service clients.
//!
//! The engine talks to the service through the [`GenerationClient`] trait so
//! providers stay swappable and tests can substitute a mock. The shipped
//! implementation targets the Gemini `generateContent` endpoint with
//! structured JSON output pinned by the prompt's response schema.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::config::{Config, get_env_or_value};
use crate::error::GenerationError;
use crate::processor::ScriptRecord;
use crate::prompt::PromptPayload;

/// Trait for generation service clients.
#[async_trait::async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send one generation request and return the parsed script records.
    ///
    /// # Arguments
    /// * `prompt` - System instruction, user content and response schema
    ///
    /// # Returns
    /// * `Ok(Vec<ScriptRecord>)` - Records matching the response schema
    /// * `Err(GenerationError)` - Transport, API or schema failure
    async fn generate(&self, prompt: &PromptPayload) -> Result<Vec<ScriptRecord>, GenerationError>;
}

/// Gemini `generateContent` client.
#[derive(Debug)]
pub struct GeminiClient {
    api_key: String,
    api_url: String,
    client: HttpClient,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self::new_with_timeout(config, Duration::from_secs(config.request_timeout_secs))
    }

    pub fn new_with_timeout(config: &Config, timeout: Duration) -> Self {
        let builder = HttpClient::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(30));
        let builder = if config.proxy {
            builder
        } else {
            builder.no_proxy()
        };
        let client = builder.build().unwrap_or_else(|_| HttpClient::new());

        Self {
            api_key: get_env_or_value(&config.api_key),
            api_url: config.api_url.clone(),
            client,
        }
    }
}

#[async_trait::async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, prompt: &PromptPayload) -> Result<Vec<ScriptRecord>, GenerationError> {
        let request = GeminiRequest::from_prompt(prompt);

        let response = self
            .client
            .post(&self.api_url)
            .header("x-goog-api-key", self.api_key.clone())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(%status, "generation response received");

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(%status, message = %message, "generation request rejected");
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GeminiResponse = response.json().await?;
        let text = body.first_text().ok_or(GenerationError::EmptyResponse)?;

        // The structured-output text is itself a JSON document that must
        // match the response schema.
        let payload: GenerationPayload = serde_json::from_str(text)?;
        Ok(payload.books)
    }
}

/// Inner structured-output payload: the array field the schema requires.
#[derive(Debug, Deserialize)]
struct GenerationPayload {
    books: Vec<ScriptRecord>,
}

// Wire types for the generateContent REST API.

#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

impl GeminiRequest {
    fn from_prompt(prompt: &PromptPayload) -> Self {
        Self {
            system_instruction: GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.system_instruction.clone(),
                }],
            },
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.user_content.clone(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: prompt.response_schema.clone(),
            },
        }
    }
}

impl GeminiResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .parts
            .first()
            .map(|part| part.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::prompt::{GenerationRequest, build_prompt};

    #[test]
    fn test_request_wire_format() {
        let prompt = build_prompt(&GenerationRequest::new(
            "stars",
            Language::Russian,
            vec![],
        ));
        let request = GeminiRequest::from_prompt(&prompt);
        let json = serde_json::to_value(&request).unwrap();

        assert!(json["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Russian"));
        assert!(json["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("stars"));
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            json["generationConfig"]["responseSchema"]["required"][0],
            "books"
        );
    }

    #[test]
    fn test_response_text_extraction() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "{\"books\":[]}" } ] } }
            ]
        }"#;
        let response: GeminiResponse = serde_json::from_str(body).unwrap();
        let text = response.first_text().unwrap();
        let payload: GenerationPayload = serde_json::from_str(text).unwrap();
        assert!(payload.books.is_empty());
    }

    #[test]
    fn test_empty_candidates_yield_none() {
        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(response.first_text().is_none());
    }

    #[test]
    fn test_schema_mismatch_is_an_error() {
        let inner = r#"{"books":[{"title":"t"}]}"#;
        let parsed: Result<GenerationPayload, _> = serde_json::from_str(inner);
        assert!(parsed.is_err());
    }
}
