//! Google Gemini completion and embedding backends.
//!
//! Talks to the Generative Language API directly over HTTP. Authentication
//! uses the `key` query parameter. Calls are single-attempt: a failed
//! request surfaces as an error and the caller decides what a failure
//! means for its task.

use async_trait::async_trait;
use serde_json::Value;

use super::{CompletionBackend, LLMMessage, LlmError, MessageRole};

const PROVIDER: &str = "gemini";
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Gemini chat completion backend.
#[derive(Debug, Clone)]
pub struct GeminiCompletion {
    pub model: String,
    api_key: Option<String>,
    pub max_output_tokens: u32,
    pub temperature: Option<f64>,
}

impl GeminiCompletion {
    pub fn new(model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            model: model.into(),
            api_key,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: None,
        }
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn api_endpoint(&self) -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        )
    }

    fn generation_config(&self) -> Value {
        let mut config = serde_json::Map::new();
        config.insert(
            "maxOutputTokens".to_string(),
            serde_json::json!(self.max_output_tokens),
        );
        if let Some(temperature) = self.temperature {
            config.insert("temperature".to_string(), serde_json::json!(temperature));
        }
        Value::Object(config)
    }

    /// Convert chat messages to Gemini `contents` format.
    ///
    /// System messages are extracted into the `systemInstruction` parameter;
    /// assistant messages map to the `model` role.
    fn format_messages(messages: &[LLMMessage]) -> (Option<String>, Vec<Value>) {
        let mut system_parts: Vec<&str> = Vec::new();
        let mut contents: Vec<Value> = Vec::new();

        for msg in messages {
            match msg.role {
                MessageRole::System => system_parts.push(&msg.content),
                MessageRole::User | MessageRole::Assistant => {
                    let gemini_role = match msg.role {
                        MessageRole::Assistant => "model",
                        _ => "user",
                    };
                    contents.push(serde_json::json!({
                        "role": gemini_role,
                        "parts": [{ "text": msg.content }],
                    }));
                }
            }
        }

        let system = if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        };

        (system, contents)
    }

    fn build_request_body(&self, messages: &[LLMMessage]) -> Value {
        let (system, contents) = Self::format_messages(messages);

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": self.generation_config(),
        });

        if let Some(system_text) = system {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system_text }]
            });
        }

        body
    }

    fn parse_response(response: &Value) -> Result<String, LlmError> {
        let candidates = response
            .get("candidates")
            .and_then(|c| c.as_array())
            .ok_or_else(|| malformed("no candidates in response"))?;

        let candidate = candidates
            .first()
            .ok_or_else(|| malformed("empty candidates array"))?;

        let parts = candidate
            .get("content")
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| malformed("no content.parts in response"))?;

        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect();

        Ok(text)
    }
}

fn malformed(message: impl Into<String>) -> LlmError {
    LlmError::MalformedResponse {
        provider: PROVIDER.to_string(),
        message: message.into(),
    }
}

#[async_trait]
impl CompletionBackend for GeminiCompletion {
    fn model(&self) -> &str {
        &self.model
    }

    async fn acall(&self, messages: &[LLMMessage]) -> Result<String, LlmError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| LlmError::MissingApiKey {
            provider: PROVIDER.to_string(),
        })?;

        log::debug!(
            "GeminiCompletion.acall: model={}, messages={}",
            self.model,
            messages.len(),
        );

        let body = self.build_request_body(messages);
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let response = client
            .post(self.api_endpoint())
            .header("content-type", "application/json")
            .query(&[("key", api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
            let preview: String = response_text.chars().take(500).collect();
            malformed(format!("{} - Body: {}", e, preview))
        })?;

        if let Some(error) = response_json.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown API error")
                .to_string();
            return Err(LlmError::Api {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        if !status.is_success() {
            return Err(LlmError::Api {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                message: response_text.chars().take(500).collect(),
            });
        }

        Self::parse_response(&response_json)
    }
}

/// Gemini text embedding backend, used for semantic similarity scoring.
#[derive(Debug, Clone)]
pub struct GeminiEmbedding {
    pub model: String,
    api_key: String,
}

impl GeminiEmbedding {
    pub const DEFAULT_MODEL: &'static str = "text-embedding-004";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            model: Self::DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn api_endpoint(&self) -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:embedContent",
            self.model
        )
    }

    /// Embed a text into a dense vector.
    pub async fn embed(&self, text: &str) -> Result<Vec<f64>, LlmError> {
        let body = serde_json::json!({
            "content": { "parts": [{ "text": text }] }
        });

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let response = client
            .post(self.api_endpoint())
            .header("content-type", "application/json")
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_json: Value = response.json().await?;

        if let Some(error) = response_json.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown API error")
                .to_string();
            return Err(LlmError::Api {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let values = response_json
            .get("embedding")
            .and_then(|e| e.get("values"))
            .and_then(|v| v.as_array())
            .ok_or_else(|| malformed("no embedding.values in response"))?;

        Ok(values.iter().filter_map(Value::as_f64).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_endpoint() {
        let backend = GeminiCompletion::new("gemini-2.0-flash", Some("key".to_string()));
        assert_eq!(
            backend.api_endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_generation_config_defaults() {
        let backend = GeminiCompletion::new("gemini-2.0-flash", None);
        let config = backend.generation_config();
        assert_eq!(config["maxOutputTokens"], serde_json::json!(1024));
        assert!(config.get("temperature").is_none());

        let tuned = backend.with_temperature(0.2).with_max_output_tokens(256);
        let config = tuned.generation_config();
        assert_eq!(config["maxOutputTokens"], serde_json::json!(256));
        assert_eq!(config["temperature"], serde_json::json!(0.2));
    }

    #[test]
    fn test_format_messages_extracts_system() {
        let messages = [
            LLMMessage::system("You are a planner."),
            LLMMessage::user("Plan a trip."),
            LLMMessage::assistant("Sure."),
        ];
        let (system, contents) = GeminiCompletion::format_messages(&messages);

        assert_eq!(system.as_deref(), Some("You are a planner."));
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "Sure.");
    }

    #[test]
    fn test_build_request_body_with_system_instruction() {
        let backend = GeminiCompletion::new("gemini-2.0-flash", None);
        let body = backend.build_request_body(&[
            LLMMessage::system("Persona."),
            LLMMessage::user("Question?"),
        ]);

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Persona.");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Question?");
        assert!(body.get("generationConfig").is_some());
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let response = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello " }, { "text": "world" }] }
            }]
        });
        assert_eq!(GeminiCompletion::parse_response(&response).unwrap(), "Hello world");
    }

    #[test]
    fn test_parse_response_missing_candidates() {
        let response = serde_json::json!({ "promptFeedback": {} });
        let err = GeminiCompletion::parse_response(&response).unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_acall_without_key() {
        let backend = GeminiCompletion::new("gemini-2.0-flash", None);
        let err = backend.acall(&[LLMMessage::user("hi")]).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey { .. }));
    }

    #[test]
    fn test_embedding_endpoint() {
        let embedding = GeminiEmbedding::new("key");
        assert_eq!(
            embedding.api_endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/text-embedding-004:embedContent"
        );
    }
}
