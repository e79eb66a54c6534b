//! Configuration types for the interviewer.
//!
//! `InterviewerConfig` mirrors `interviewer.toml`. Policy values (models,
//! thresholds, timeouts) have defaults; the form section carries the values
//! that must be supplied before any session starts. Secrets are never part
//! of this file -- only the names of the environment variables holding them.

use serde::{Deserialize, Serialize};

use crate::llm::ProviderType;
use crate::submission::FieldMapping;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewerConfig {
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub interview: InterviewPolicy,
    #[serde(default)]
    pub form: FormConfig,
}

/// Language-model settings shared by the chat and extraction calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default)]
    pub provider: ProviderType,
    /// Model answering interview turns.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Higher-fidelity model used once, for extraction.
    #[serde(default = "default_extraction_model")]
    pub extraction_model: String,
    /// Override the provider's default endpoint.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Environment variable holding the oracle API key.
    #[serde(default = "default_oracle_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_extraction_max_tokens")]
    pub extraction_max_tokens: u32,
    /// Transport timeout for a single oracle call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_chat_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_extraction_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_oracle_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_extraction_max_tokens() -> u32 {
    2048
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::default(),
            chat_model: default_chat_model(),
            extraction_model: default_extraction_model(),
            base_url: None,
            api_key_env: default_oracle_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            extraction_max_tokens: default_extraction_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Interview behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewPolicy {
    /// Finalize is offered once the transcript holds more turns than this.
    #[serde(default = "default_min_turns")]
    pub min_turns: usize,
    /// Replaces the built-in interviewer persona when set.
    #[serde(default)]
    pub persona: Option<String>,
    /// Replaces the built-in opening message when set.
    #[serde(default)]
    pub greeting: Option<String>,
    /// Server sessions untouched for this long are discarded.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// How often the server looks for idle sessions.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_min_turns() -> usize {
    6
}

fn default_idle_timeout_secs() -> u64 {
    1800
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for InterviewPolicy {
    fn default() -> Self {
        Self {
            min_turns: default_min_turns(),
            persona: None,
            greeting: None,
            idle_timeout_secs: default_idle_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// The external form-collection API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub form_id: String,
    #[serde(default = "default_form_base_url")]
    pub base_url: String,
    /// Environment variable holding the form API key.
    #[serde(default = "default_form_key_env")]
    pub api_key_env: String,
    /// Constant written into the two operator fields of every submission.
    #[serde(default)]
    pub operator_name: String,
    /// Field id of "case assigned to".
    #[serde(default)]
    pub case_assigned_to_field: String,
    /// Field id of "referral received by".
    #[serde(default)]
    pub referral_received_by_field: String,
    #[serde(default)]
    pub field_mapping: FieldMapping,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_form_base_url() -> String {
    "https://api.jotform.com".to_string()
}

fn default_form_key_env() -> String {
    "JOTFORM_API_KEY".to_string()
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_id: String::new(),
            base_url: default_form_base_url(),
            api_key_env: default_form_key_env(),
            operator_name: String::new(),
            case_assigned_to_field: String::new(),
            referral_received_by_field: String::new(),
            field_mapping: FieldMapping::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
