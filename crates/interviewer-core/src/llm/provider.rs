//! LlmProvider trait definition.
//!
//! The oracle is treated as an opaque text-completion service: one request
//! in, one reply out. Implementations live in interviewer-infra.

use interviewer_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends (Gemini, OpenAI-compatible, ...).
///
/// Uses native async fn in traits (RPITIT). Wrap an implementation in
/// [`BoxLlmProvider`](super::box_provider::BoxLlmProvider) when the concrete
/// type is chosen at runtime.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
