//! Completion backends for role identities.
//!
//! Every role that talks to a language model does so through the
//! [`CompletionBackend`] trait. The production backend is
//! [`GeminiCompletion`]; [`ScriptedCompletion`] serves offline runs and
//! tests. Which backend a role gets is decided by [`resolver`] from the
//! environment snapshot.

pub mod gemini;
pub mod resolver;

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gemini::{GeminiCompletion, GeminiEmbedding};
pub use resolver::{resolve_identities, GEMINI_MODEL};

/// Message role in a chat exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// One chat message sent to a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LLMMessage {
    pub role: MessageRole,
    pub content: String,
}

impl LLMMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{provider} API key not set")]
    MissingApiKey { provider: String },

    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed {provider} response: {message}")]
    MalformedResponse { provider: String, message: String },

    #[error("synchronous call invoked inside an async runtime, use acall instead")]
    NestedRuntime,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A language model a role identity can call.
#[async_trait]
pub trait CompletionBackend: Send + Sync + std::fmt::Debug {
    /// Model identifier, for logging.
    fn model(&self) -> &str;

    /// Complete a chat exchange asynchronously.
    async fn acall(&self, messages: &[LLMMessage]) -> Result<String, LlmError>;

    /// Synchronous wrapper around [`CompletionBackend::acall`].
    ///
    /// Spins up a runtime, so it must not be called from async context.
    fn call(&self, messages: &[LLMMessage]) -> Result<String, LlmError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(LlmError::NestedRuntime);
        }
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.acall(messages))
    }
}

/// Backend that replays a fixed script of responses.
///
/// Useful for offline runs and tests. Responses are consumed in order;
/// once the script runs out the last response repeats. Received messages
/// are recorded for inspection.
#[derive(Debug)]
pub struct ScriptedCompletion {
    model: String,
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<Vec<LLMMessage>>>,
}

impl ScriptedCompletion {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            model: "scripted".to_string(),
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A backend that always returns the same text.
    pub fn always(response: impl Into<String>) -> Self {
        Self::new([response.into()])
    }

    /// Messages received so far, one entry per call.
    pub fn calls(&self) -> Vec<Vec<LLMMessage>> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedCompletion {
    fn model(&self) -> &str {
        &self.model
    }

    async fn acall(&self, messages: &[LLMMessage]) -> Result<String, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        let mut responses = self.responses.lock().map_err(|_| LlmError::MalformedResponse {
            provider: "scripted".to_string(),
            message: "response script poisoned".to_string(),
        })?;
        let response = if responses.len() > 1 {
            responses.pop_front().unwrap_or_default()
        } else {
            responses.front().cloned().unwrap_or_default()
        };
        Ok(response)
    }
}
