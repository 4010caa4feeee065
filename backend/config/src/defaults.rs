//! Config defaults: fills every unset field after loading.

use petpal_core::{ClassifierOptions, PetProfile};

use crate::schema::{
    ClassifierConfig, ClassifierMode, LlmConfig, LlmProviderKind, LoggingConfig, PetPalConfig,
    SidekickConfig,
};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

/// Background suggestion cadence: every 30 minutes.
pub const DEFAULT_SUGGESTION_INTERVAL_SECS: u64 = 30 * 60;

/// Mood detection cadence while the camera is on.
pub const DEFAULT_DETECTION_INTERVAL_SECS: u64 = 5;

/// Confidence above which the task catalog is filtered by mood.
pub const DEFAULT_MOOD_CONFIDENCE_THRESHOLD: f32 = 0.7;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_LOG_DIR: &str = "logs";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: PetPalConfig) -> PetPalConfig {
    let config = apply_pet_defaults(config);
    let config = apply_llm_defaults(config);
    let config = apply_classifier_defaults(config);
    let config = apply_sidekick_defaults(config);
    apply_logging_defaults(config)
}

fn apply_pet_defaults(mut config: PetPalConfig) -> PetPalConfig {
    config.pet.get_or_insert_with(PetProfile::default);
    config
}

/// Without an API key the OpenAI provider can only fail, so an unconfigured
/// install starts on the mock provider instead.
fn apply_llm_defaults(mut config: PetPalConfig) -> PetPalConfig {
    let llm = config.llm.get_or_insert_with(LlmConfig::default);
    let has_key = llm.api_key.as_deref().is_some_and(|k| !k.is_empty());
    let provider = *llm.provider.get_or_insert(if has_key {
        LlmProviderKind::OpenAi
    } else {
        LlmProviderKind::Mock
    });
    if llm.base_url.is_none() {
        llm.base_url = match provider {
            LlmProviderKind::OpenAi => Some(DEFAULT_OPENAI_BASE_URL.to_string()),
            LlmProviderKind::Ollama => Some(DEFAULT_OLLAMA_BASE_URL.to_string()),
            LlmProviderKind::Mock => None,
        };
    }
    if llm.model.is_none() {
        llm.model = Some(
            match provider {
                LlmProviderKind::Ollama => DEFAULT_OLLAMA_MODEL,
                LlmProviderKind::OpenAi | LlmProviderKind::Mock => DEFAULT_MODEL,
            }
            .to_string(),
        );
    }
    config
}

fn apply_classifier_defaults(mut config: PetPalConfig) -> PetPalConfig {
    let classifier = config.classifier.get_or_insert_with(ClassifierConfig::default);
    if classifier.mode.is_none() {
        classifier.mode = Some(if classifier.endpoint.is_some() {
            ClassifierMode::Live
        } else {
            ClassifierMode::Stub
        });
    }
    let base = ClassifierOptions::default();
    classifier
        .model_asset_path
        .get_or_insert(base.model_asset_path);
    classifier.delegate.get_or_insert(base.delegate);
    classifier.max_results.get_or_insert(base.max_results);
    classifier.score_threshold.get_or_insert(base.score_threshold);
    config
}

fn apply_sidekick_defaults(mut config: PetPalConfig) -> PetPalConfig {
    let sidekick = config.sidekick.get_or_insert_with(SidekickConfig::default);
    sidekick
        .suggestion_interval_secs
        .get_or_insert(DEFAULT_SUGGESTION_INTERVAL_SECS);
    sidekick
        .detection_interval_secs
        .get_or_insert(DEFAULT_DETECTION_INTERVAL_SECS);
    sidekick
        .mood_confidence_threshold
        .get_or_insert(DEFAULT_MOOD_CONFIDENCE_THRESHOLD);
    config
}

fn apply_logging_defaults(mut config: PetPalConfig) -> PetPalConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.dir.get_or_insert_with(|| DEFAULT_LOG_DIR.to_string());
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use petpal_core::Delegate;

    #[test]
    fn fills_classifier_options() {
        let cfg = apply_all_defaults(PetPalConfig::default());
        let classifier = cfg.classifier.unwrap();
        assert_eq!(classifier.mode, Some(ClassifierMode::Stub));
        assert_eq!(classifier.max_results, Some(1));
        assert_eq!(classifier.score_threshold, Some(0.3));
        assert_eq!(classifier.delegate, Some(Delegate::Gpu));
        assert_eq!(
            classifier.model_asset_path.as_deref(),
            Some("/models/pet_mood_classifier.tflite")
        );
    }

    #[test]
    fn endpoint_implies_live_mode() {
        let mut cfg = PetPalConfig::default();
        cfg.classifier = Some(ClassifierConfig {
            endpoint: Some("http://localhost:9000".into()),
            ..Default::default()
        });
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.classifier.unwrap().mode, Some(ClassifierMode::Live));
    }

    #[test]
    fn sidekick_cadence_defaults() {
        let cfg = apply_all_defaults(PetPalConfig::default());
        let sidekick = cfg.sidekick.unwrap();
        assert_eq!(sidekick.suggestion_interval_secs, Some(1800));
        assert_eq!(sidekick.detection_interval_secs, Some(5));
        assert_eq!(sidekick.mood_confidence_threshold, Some(0.7));
    }

    #[test]
    fn api_key_selects_openai() {
        let mut cfg = PetPalConfig::default();
        cfg.llm = Some(LlmConfig {
            api_key: Some("sk-test".into()),
            ..Default::default()
        });
        let llm = apply_all_defaults(cfg).llm.unwrap();
        assert_eq!(llm.provider, Some(LlmProviderKind::OpenAi));
        assert_eq!(llm.base_url.as_deref(), Some(DEFAULT_OPENAI_BASE_URL));
        assert_eq!(llm.model.as_deref(), Some(DEFAULT_MODEL));
    }

    #[test]
    fn no_key_falls_back_to_mock() {
        let llm = apply_all_defaults(PetPalConfig::default()).llm.unwrap();
        assert_eq!(llm.provider, Some(LlmProviderKind::Mock));
        assert!(llm.base_url.is_none());
    }

    #[test]
    fn ollama_gets_local_url_and_model() {
        let mut cfg = PetPalConfig::default();
        cfg.llm = Some(LlmConfig {
            provider: Some(LlmProviderKind::Ollama),
            ..Default::default()
        });
        let llm = apply_all_defaults(cfg).llm.unwrap();
        assert_eq!(llm.base_url.as_deref(), Some(DEFAULT_OLLAMA_BASE_URL));
        assert_eq!(llm.model.as_deref(), Some(DEFAULT_OLLAMA_MODEL));
    }

    #[test]
    fn does_not_override_user_values() {
        let mut cfg = PetPalConfig::default();
        cfg.sidekick = Some(SidekickConfig {
            suggestion_interval_secs: Some(60),
            ..Default::default()
        });
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.sidekick.unwrap().suggestion_interval_secs, Some(60));
    }
}
