use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::Frame;

/// Trait for text-generation backends used by the assistant.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "openai", "ollama").
    fn name(&self) -> &str;

    /// Send a completion request and return the response text.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse>;
}

/// Request to an LLM provider. One system message, one user message.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}

/// Where inference runs on the classification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Delegate {
    Cpu,
    #[default]
    Gpu,
}

/// Options sent along with every classification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierOptions {
    pub model_asset_path: String,
    pub delegate: Delegate,
    pub max_results: u32,
    pub score_threshold: f32,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            model_asset_path: "/models/pet_mood_classifier.tflite".to_string(),
            delegate: Delegate::Gpu,
            max_results: 1,
            score_threshold: 0.3,
        }
    }
}

/// One ranked category from the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub category_name: String,
    pub score: f32,
}

/// Trait for image-classification backends behind the mood detector.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    fn name(&self) -> &str;

    /// Acquire the model session. Called once before the first `classify`.
    async fn initialize(&self) -> Result<()>;

    /// Classify a frame, returning categories ranked by score.
    async fn classify(&self, frame: &Frame, options: &ClassifierOptions)
        -> Result<Vec<Classification>>;
}
