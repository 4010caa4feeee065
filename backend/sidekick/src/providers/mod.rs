pub mod mock;
pub mod ollama;
pub mod openai;

use std::sync::Arc;

use tracing::{info, warn};

use petpal_config::{LlmConfig, LlmProviderKind};
use petpal_core::LlmProvider;

pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Build the provider named in config. Credentials are taken from `config`
/// only; nothing here reads the environment.
pub fn from_config(config: &LlmConfig) -> Arc<dyn LlmProvider> {
    match config.provider.unwrap_or(LlmProviderKind::Mock) {
        LlmProviderKind::OpenAi => {
            let api_key = config.api_key.clone().unwrap_or_default();
            if api_key.is_empty() {
                warn!("OpenAI provider has no API key; replies will fall back");
            }
            let mut provider = OpenAiProvider::new(api_key);
            if let Some(url) = &config.base_url {
                provider = provider.with_base_url(url);
            }
            info!("Using OpenAI provider");
            Arc::new(provider)
        }
        LlmProviderKind::Ollama => {
            let mut provider = OllamaProvider::new();
            if let Some(url) = &config.base_url {
                provider = provider.with_base_url(url);
            }
            info!("Using Ollama provider");
            Arc::new(provider)
        }
        LlmProviderKind::Mock => {
            let mut provider = MockProvider::new("mock");
            if let Some(reply) = &config.mock_response {
                provider = provider.with_response(reply);
            }
            info!("Using mock provider");
            Arc::new(provider)
        }
    }
}
