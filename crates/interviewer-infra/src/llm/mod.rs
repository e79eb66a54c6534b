//! Oracle provider implementations.
//!
//! Concrete [`LlmProvider`](interviewer_core::llm::provider::LlmProvider)
//! implementations plus [`create_provider`], which picks one from the
//! oracle configuration.

pub mod gemini;
pub mod openai_compat;

use std::time::Duration;

use secrecy::SecretString;

use interviewer_core::llm::box_provider::BoxLlmProvider;
use interviewer_types::config::OracleConfig;
use interviewer_types::llm::{CompletionRequest, LlmError, Message, ProviderType};

use self::gemini::GeminiProvider;
use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::OpenAiCompatConfig;

/// Build a [`BoxLlmProvider`] for the configured provider type.
///
/// The same provider serves the chat and the extraction model; the model
/// name travels on each request.
pub fn create_provider(config: &OracleConfig, api_key: SecretString) -> Result<BoxLlmProvider, LlmError> {
    match config.provider {
        ProviderType::Gemini => {
            let mut provider = GeminiProvider::new(api_key, Duration::from_secs(config.timeout_secs))?;
            if let Some(base_url) = config.base_url.as_deref() {
                provider = provider.with_base_url(base_url);
            }
            Ok(BoxLlmProvider::new(provider))
        }
        ProviderType::OpenAiCompatible => {
            let oai_config = OpenAiCompatConfig::resolve(config.base_url.as_deref(), api_key);
            Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai_config)))
        }
    }
}

/// Send a minimal request to verify the key and endpoint.
pub async fn test_provider_connection(provider: &BoxLlmProvider, model: &str) -> Result<(), LlmError> {
    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![Message::user("Hello")],
        system: None,
        max_tokens: 10,
        temperature: Some(0.0),
        json_output: false,
    };
    provider.complete(&request).await?;
    Ok(())
}
