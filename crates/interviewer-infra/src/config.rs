//! Configuration loader.
//!
//! Reads `interviewer.toml` into [`InterviewerConfig`] and resolves the two
//! API keys from the environment variables the file names. Unlike policy
//! values, nothing required here has a fallback: any gap is a
//! [`ConfigError`] and the process stops before an interview starts.

use std::path::Path;

use secrecy::SecretString;

use interviewer_types::config::InterviewerConfig;
use interviewer_types::error::ConfigError;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "interviewer.toml";

/// Validated configuration plus the secrets it points at.
pub struct LoadedConfig {
    pub config: InterviewerConfig,
    pub oracle_api_key: SecretString,
    pub form_api_key: SecretString,
}

/// Load and validate configuration, reading secrets from the process environment.
pub async fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    load_config_with(path, |name| std::env::var(name).ok()).await
}

/// Like [`load_config`], with a caller-supplied secret lookup.
pub async fn load_config_with<F>(path: &Path, lookup: F) -> Result<LoadedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let config = parse_config(&content)?;
    validate(&config)?;

    let oracle_api_key = resolve_secret(&config.oracle.api_key_env, &lookup)?;
    let form_api_key = resolve_secret(&config.form.api_key_env, &lookup)?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(LoadedConfig {
        config,
        oracle_api_key,
        form_api_key,
    })
}

/// Parse TOML text into a config. Does not validate.
pub fn parse_config(content: &str) -> Result<InterviewerConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))
}

/// Check that every value the pipeline cannot run without is present.
pub fn validate(config: &InterviewerConfig) -> Result<(), ConfigError> {
    let form = &config.form;
    let required = [
        ("form.form_id", &form.form_id),
        ("form.operator_name", &form.operator_name),
        ("form.case_assigned_to_field", &form.case_assigned_to_field),
        ("form.referral_received_by_field", &form.referral_received_by_field),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::Missing(name.to_string()));
        }
    }

    if form.field_mapping.is_empty() {
        return Err(ConfigError::Missing("form.field_mapping".to_string()));
    }
    if form.case_assigned_to_field == form.referral_received_by_field {
        return Err(ConfigError::Invalid(
            "form.case_assigned_to_field and form.referral_received_by_field must differ".to_string(),
        ));
    }
    for override_id in [&form.case_assigned_to_field, &form.referral_received_by_field] {
        if let Some(key) = form.field_mapping.key_for(override_id.trim()) {
            return Err(ConfigError::Invalid(format!(
                "form.field_mapping.{key} targets operator field {override_id}"
            )));
        }
    }
    if config.oracle.chat_model.trim().is_empty() || config.oracle.extraction_model.trim().is_empty() {
        return Err(ConfigError::Invalid("oracle model names must not be empty".to_string()));
    }
    if config.oracle.timeout_secs == 0 || form.timeout_secs == 0 {
        return Err(ConfigError::Invalid("timeouts must be at least one second".to_string()));
    }
    if config.interview.idle_timeout_secs == 0 || config.interview.sweep_interval_secs == 0 {
        return Err(ConfigError::Invalid(
            "interview.idle_timeout_secs and interview.sweep_interval_secs must be at least one second"
                .to_string(),
        ));
    }
    Ok(())
}

fn resolve_secret<F>(var: &str, lookup: &F) -> Result<SecretString, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => Ok(SecretString::from(value)),
        _ => Err(ConfigError::Missing(format!("environment variable {var}"))),
    }
}
