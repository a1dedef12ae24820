//! Language-model completion interface.
//!
//! Defines the [`CompletionModel`] trait the pipeline calls for both SQL
//! generation and answer narration. Concrete clients (OpenAI) live in the
//! `speedrun-query` app crate; tests substitute a scripted stub.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::models::PromptPair;

/// Role tag of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// A role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// One completion request: model, ordered messages, sampling temperature.
///
/// `temperature = None` leaves the provider default in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Build a system + user request from a prompt pair.
    pub fn from_prompt(model: &str, prompt: &PromptPair, temperature: Option<f32>) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: ChatRole::System,
                    content: prompt.system.clone(),
                },
                ChatMessage {
                    role: ChatRole::User,
                    content: prompt.user.clone(),
                },
            ],
            temperature,
        }
    }
}

/// A chat-completion backend.
///
/// # Example
///
/// ```rust
/// use anyhow::Result;
/// use async_trait::async_trait;
/// use speedrun_query_core::llm::{CompletionModel, CompletionRequest};
///
/// struct Echo;
///
/// #[async_trait]
/// impl CompletionModel for Echo {
///     fn name(&self) -> &str { "echo" }
///
///     async fn complete(&self, request: &CompletionRequest) -> Result<String> {
///         Ok(request.messages.last().map(|m| m.content.clone()).unwrap_or_default())
///     }
/// }
/// ```
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Backend identifier used in logs (e.g. `"openai"`).
    fn name(&self) -> &str;

    /// Issue one completion request and return the first choice's text.
    ///
    /// Transport, authentication, and malformed-response failures are
    /// returned as errors; implementations must not retry.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
