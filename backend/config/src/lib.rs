//! `petpal-config`: PetPal+ runtime configuration.
//!
//! Provides:
//! - Typed config schema (pet, LLM, classifier, sidekick cadence, logging)
//! - YAML read/write
//! - `${ENV_VAR}` substitution so credentials stay out of the file
//! - Default value application
//! - Validation
//! - Redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{collect_referenced_vars, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_raw, write_config};
pub use redact::redact;
pub use schema::{
    ClassifierConfig, ClassifierMode, LlmConfig, LlmProviderKind, LoggingConfig, PetPalConfig,
    SidekickConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load, substitute env vars, apply defaults, and validate.
///
/// This is the main entry point for loading a config at runtime. Validation
/// warnings are logged; validation errors abort the load.
pub async fn load_and_prepare(path: &Path) -> Result<PetPalConfig> {
    let raw = load_raw(path).await?;
    prepare(raw, resolve_env_vars)
}

/// The pipeline behind [`load_and_prepare`], with the env resolver injected.
pub fn prepare(raw: Value, resolve: impl Fn(&Value) -> Result<Value>) -> Result<PetPalConfig> {
    let value = resolve(&raw).context("Failed to resolve env vars in config")?;

    let config: PetPalConfig =
        serde_json::from_value(value).context("Failed to deserialize config")?;

    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        bail!("{} config error(s); first: {}", report.errors.len(), report.errors[0]);
    }

    Ok(config)
}
