//! Chat-completion client for the OpenAI API.
//!
//! Implements [`CompletionModel`] against `POST {base_url}/chat/completions`.
//! One HTTP attempt per call: failures are returned to the pipeline,
//! which reports them as outcomes instead of retrying.
//!
//! | Response | Result |
//! |----------|--------|
//! | 2xx with `choices[0].message.content` | `Ok(content)` |
//! | 2xx without content | error (malformed response) |
//! | non-2xx | error with status and body |
//! | network / timeout | error |

use anyhow::{bail, Result};
use async_trait::async_trait;
use speedrun_query_core::llm::{CompletionModel, CompletionRequest};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::{Config, LlmConfig};

pub struct OpenAiChatModel {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiChatModel {
    /// Build the client from `[llm]` settings.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured or the HTTP client
    /// cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: completions_url(&config.base_url),
        })
    }
}

fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

#[async_trait]
impl CompletionModel for OpenAiChatModel {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(skip_all, fields(model = %request.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("OpenAI API error {}: {}", status, body_text);
        }

        let json: serde_json::Value = response.json().await?;
        let content = parse_chat_response(&json)?;
        debug!(chars = content.len(), "completion received");
        Ok(content)
    }
}

/// Extract `choices[0].message.content` from a chat-completions response.
fn parse_chat_response(json: &serde_json::Value) -> Result<String> {
    json.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response: missing choices[0].message.content"))
}

/// Create the [`CompletionModel`] named by `llm.provider`.
pub fn create_model(config: &Config) -> Result<Box<dyn CompletionModel>> {
    match config.llm.provider.as_str() {
        "openai" => Ok(Box::new(OpenAiChatModel::new(&config.llm)?)),
        other => bail!("Unknown llm provider: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_first_choice() {
        let body = json!({
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "SELECT 1" } },
                { "index": 1, "message": { "role": "assistant", "content": "SELECT 2" } }
            ]
        });
        assert_eq!(parse_chat_response(&body).unwrap(), "SELECT 1");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_chat_response(&json!({ "choices": [] })).is_err());
        assert!(parse_chat_response(&json!({ "error": { "message": "bad key" } })).is_err());
        assert!(parse_chat_response(&json!({ "choices": [{ "message": { "content": null } }] }))
            .is_err());
    }

    #[test]
    fn test_completions_url_trims_slash() {
        assert_eq!(
            completions_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            completions_url("http://localhost:8080/v1"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_create_model_reports_provider_name() {
        let cfg = crate::config::parse_config(
            "[db]\npath = \"x\"\n[llm]\napi_key = \"sk-test\"\n",
        )
        .unwrap();
        let model = create_model(&cfg).unwrap();
        assert_eq!(model.name(), "openai");
    }

    #[test]
    fn test_new_requires_api_key() {
        let cfg = LlmConfig {
            api_key: None,
            api_key_env: "SRQ_TEST_MISSING_OPENAI_KEY".to_string(),
            ..LlmConfig::default()
        };
        assert!(OpenAiChatModel::new(&cfg).is_err());
    }
}
