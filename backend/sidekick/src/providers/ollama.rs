use std::time::Instant;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use petpal_config::defaults::DEFAULT_OLLAMA_BASE_URL;
use petpal_core::{LlmProvider, LlmRequest, LlmResponse};

use super::openai::build_messages;

/// Talks to a local Ollama daemon over `/api/chat`, non-streaming.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
}

impl OllamaProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
struct ChatBody {
    model: String,
    messages: Vec<Turn>,
    stream: bool,
    options: SamplingOptions,
}

#[derive(Debug, Serialize)]
struct SamplingOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Turn {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    message: Turn,
    #[serde(default)]
    eval_count: Option<u64>,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
}

/// Ollama model tags carry no vendor prefix, so `openai/gpt-x` becomes `gpt-x`.
fn local_model_name(model: &str) -> &str {
    model.rsplit('/').next().unwrap_or(model)
}

fn chat_body(request: &LlmRequest) -> ChatBody {
    ChatBody {
        model: local_model_name(&request.model).to_string(),
        messages: build_messages(request)
            .into_iter()
            .map(|(role, content)| Turn {
                role: role.to_string(),
                content,
            })
            .collect(),
        stream: false,
        options: SamplingOptions {
            temperature: request.temperature,
            num_predict: request.max_tokens,
        },
    }
}

fn into_response(reply: ChatReply, model: String, latency_ms: u64) -> LlmResponse {
    LlmResponse {
        content: reply.message.content,
        provider: "ollama".to_string(),
        model,
        tokens_used: reply.eval_count.unwrap_or(0) + reply.prompt_eval_count.unwrap_or(0),
        latency_ms,
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        let start = Instant::now();
        let body = chat_body(request);
        debug!(model = %body.model, turns = body.messages.len(), "Ollama chat request");

        let response = self
            .client
            .post(self.chat_url())
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Ollama unreachable at {}", self.base_url))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("Ollama returned {status}: {detail}");
        }

        let reply: ChatReply = response
            .json()
            .await
            .context("Failed to parse Ollama chat reply")?;

        Ok(into_response(
            reply,
            body.model,
            start.elapsed().as_millis() as u64,
        ))
    }
}
