//! Chat-completions client for Groq's OpenAI-compatible API
//!
//! Non-streaming: one POST to `/chat/completions` per question.

use crate::errors::{QaError, Result};
use crate::llm::{ChatModel, LlmConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Groq chat client
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    api_key: String,
}

impl GroqClient {
    /// Create client reading the API key from the configured env var
    pub fn from_env(config: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            QaError::Config(format!(
                "{} is not set; export it or add it to .env",
                config.api_key_env
            ))
        })?;
        Self::with_config(config, api_key)
    }

    /// Create client with an explicit API key
    pub fn with_config(config: &LlmConfig, api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(QaError::Config("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(QaError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key,
        })
    }

    /// Get current model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, prompt_len = prompt.len(), "sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| QaError::LlmApi(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(QaError::LlmApi(format!("HTTP {}: {}", status, error_text)));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| QaError::LlmApi(format!("Failed to parse response: {}", e)))?;

        extract_answer(body)
    }
}

fn extract_answer(body: ChatResponse) -> Result<String> {
    body.choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .ok_or_else(|| QaError::LlmApi("Response contained no choices".to_string()))
}

/// Chat completions request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completions response (only the fields we read)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};

    fn client() -> GroqClient {
        GroqClient::with_config(&LlmConfig::default(), "test-key".to_string()).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = client();
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = LlmConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..Default::default()
        };
        let client = GroqClient::with_config(&config, "k".to_string()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = GroqClient::with_config(&LlmConfig::default(), "  ".to_string());
        assert!(matches!(result, Err(QaError::Config(_))));
    }

    #[test]
    fn test_missing_env_var() {
        let config = LlmConfig {
            api_key_env: "DOCQA_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        match GroqClient::from_env(&config) {
            Err(QaError::Config(msg)) => assert!(msg.contains("DOCQA_TEST_KEY_THAT_IS_NEVER_SET")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_request_serialization() {
        let client = client();
        let body = serde_json::to_value(client.request_body("What is 2+2?")).unwrap();
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "What is 2+2?");
        assert_eq!(body["temperature"], 0.0);
    }

    #[test]
    fn test_extract_answer() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":" Paris. "}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_answer(body).unwrap(), "Paris.");
    }

    #[test]
    fn test_extract_answer_no_choices() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(extract_answer(body), Err(QaError::LlmApi(_))));
    }
}
