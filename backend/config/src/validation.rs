//! Config validation: checks with user-friendly error messages.

use crate::schema::{ClassifierMode, LlmProviderKind, PetPalConfig};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &PetPalConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_pet(config, &mut report);
    validate_llm(config, &mut report);
    validate_classifier(config, &mut report);
    validate_sidekick(config, &mut report);
    report
}

fn validate_pet(config: &PetPalConfig, report: &mut ValidationReport) {
    let Some(pet) = &config.pet else { return };
    if pet.name.trim().is_empty() {
        report.error("pet.name", "Pet name cannot be empty");
    }
    if pet.species.trim().is_empty() {
        report.warn("pet.species", "Pet species is empty; prompts will read oddly");
    }
}

fn validate_llm(config: &PetPalConfig, report: &mut ValidationReport) {
    let Some(llm) = &config.llm else { return };
    if llm.provider == Some(LlmProviderKind::OpenAi)
        && llm.api_key.as_deref().map(str::is_empty).unwrap_or(true)
    {
        report.warn(
            "llm.apiKey",
            "No API key configured; every reply will be the fallback message",
        );
    }
    if let Some(url) = &llm.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            report.error("llm.baseUrl", format!("'{url}' is not an http(s) URL"));
        }
    }
}

fn validate_classifier(config: &PetPalConfig, report: &mut ValidationReport) {
    let Some(classifier) = &config.classifier else { return };
    if let Some(threshold) = classifier.score_threshold {
        if !(0.0..=1.0).contains(&threshold) {
            report.error("classifier.scoreThreshold", "scoreThreshold must be within [0, 1]");
        }
    }
    if classifier.max_results == Some(0) {
        report.error("classifier.maxResults", "maxResults must be >= 1");
    }
    if classifier.mode == Some(ClassifierMode::Live) && classifier.endpoint.is_none() {
        report.error(
            "classifier.endpoint",
            "Live mode needs an endpoint; use mode 'stub' for development",
        );
    }
}

fn validate_sidekick(config: &PetPalConfig, report: &mut ValidationReport) {
    let Some(sidekick) = &config.sidekick else { return };
    if sidekick.suggestion_interval_secs == Some(0) {
        report.error("sidekick.suggestionIntervalSecs", "Interval must be >= 1 second");
    }
    if sidekick.detection_interval_secs == Some(0) {
        report.error("sidekick.detectionIntervalSecs", "Interval must be >= 1 second");
    }
    if let Some(threshold) = sidekick.mood_confidence_threshold {
        if !(0.0..=1.0).contains(&threshold) {
            report.error(
                "sidekick.moodConfidenceThreshold",
                "moodConfidenceThreshold must be within [0, 1]",
            );
        }
    }
}
