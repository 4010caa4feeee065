use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use petpal_core::{LlmProvider, LlmRequest, LlmResponse};

/// OpenAI-compatible chat completions provider.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

pub(crate) fn build_messages(request: &LlmRequest) -> Vec<(&'static str, String)> {
    let mut messages = Vec::new();
    if !request.system_prompt.is_empty() {
        messages.push(("system", request.system_prompt.clone()));
    }
    if !request.user_prompt.is_empty() {
        messages.push(("user", request.user_prompt.clone()));
    }
    messages
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        let start = Instant::now();

        let body = ChatRequest {
            model: request.model.clone(),
            messages: build_messages(request)
                .into_iter()
                .map(|(role, content)| ChatMessage {
                    role: role.to_string(),
                    content: Some(content),
                })
                .collect(),
            max_tokens: Some(request.max_tokens),
            temperature: Some(request.temperature),
        };

        debug!(model = %request.model, "Sending request to OpenAI");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("OpenAI HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI returned {}: {}", status, error_body);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        // Only the first choice is used.
        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        let tokens_used = chat_response
            .usage
            .and_then(|u| u.total_tokens)
            .unwrap_or(0);

        Ok(LlmResponse {
            content,
            provider: "openai".to_string(),
            model: request.model.clone(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(system: &str, user: &str) -> LlmRequest {
        LlmRequest {
            model: "gpt-3.5-turbo".into(),
            system_prompt: system.into(),
            user_prompt: user.into(),
            max_tokens: 100,
            temperature: 0.7,
        }
    }

    #[test]
    fn empty_user_prompt_sends_system_only() {
        let msgs = build_messages(&request("be nice", ""));
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].0, "system");
    }

    #[test]
    fn system_then_user() {
        let msgs = build_messages(&request("be nice", "hi"));
        assert_eq!(msgs.iter().map(|m| m.0).collect::<Vec<_>>(), ["system", "user"]);
    }

    #[test]
    fn response_with_null_content_parses() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_error() {
        let provider = OpenAiProvider::new("sk-test").with_base_url("http://127.0.0.1:9/v1");
        assert!(provider.complete(&request("s", "u")).await.is_err());
    }
}
