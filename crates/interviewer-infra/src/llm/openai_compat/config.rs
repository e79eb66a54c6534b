//! Configuration for OpenAI-compatible providers.

use secrecy::SecretString;

/// Google's OpenAI-compatible endpoint, used when no base URL is configured.
pub const GEMINI_OPENAI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Everything needed to build an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Name reported by the provider, for logs.
    pub provider_name: String,
    /// Base URL of the chat completions API, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: SecretString,
}

impl OpenAiCompatConfig {
    /// Build a config, falling back to Google's endpoint without a base URL.
    pub fn resolve(base_url: Option<&str>, api_key: SecretString) -> Self {
        match base_url {
            Some(url) => Self {
                provider_name: provider_name_for(url).to_string(),
                base_url: url.to_string(),
                api_key,
            },
            None => Self {
                provider_name: "gemini".to_string(),
                base_url: GEMINI_OPENAI_BASE_URL.to_string(),
                api_key,
            },
        }
    }
}

fn provider_name_for(base_url: &str) -> &'static str {
    if base_url.contains("generativelanguage.googleapis.com") {
        "gemini"
    } else if base_url.contains("api.openai.com") {
        "openai"
    } else if base_url.contains("api.mistral.ai") {
        "mistral"
    } else {
        "openai_compatible"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults_to_gemini_endpoint() {
        let config = OpenAiCompatConfig::resolve(None, SecretString::from("k"));
        assert_eq!(config.provider_name, "gemini");
        assert_eq!(config.base_url, GEMINI_OPENAI_BASE_URL);
    }

    #[test]
    fn test_resolve_names_known_hosts() {
        let config = OpenAiCompatConfig::resolve(Some("https://api.openai.com/v1"), SecretString::from("k"));
        assert_eq!(config.provider_name, "openai");
        let config = OpenAiCompatConfig::resolve(Some("http://localhost:11434/v1"), SecretString::from("k"));
        assert_eq!(config.provider_name, "openai_compatible");
        assert_eq!(config.base_url, "http://localhost:11434/v1");
    }
}
