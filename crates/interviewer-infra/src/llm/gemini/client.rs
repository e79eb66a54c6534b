//! GeminiProvider -- [`LlmProvider`] for the Gemini `generateContent` API.
//!
//! Sends `POST {base}/v1beta/models/{model}:generateContent` with the key in
//! the `x-goog-api-key` header. The key stays inside a [`SecretString`] and
//! is exposed only while building that header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use interviewer_core::llm::provider::LlmProvider;
use interviewer_types::llm::{CompletionRequest, CompletionResponse, LlmError, MessageRole, Usage};

use super::types::{GeminiContent, GeminiPart, GeminiRequest, GeminiResponse, GenerationConfig};

/// Google Gemini provider. Not `Debug`: it holds the API key.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl GeminiProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com";

    pub fn new(api_key: SecretString, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the base URL (proxies, local test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    fn to_gemini_request(&self, request: &CompletionRequest) -> GeminiRequest {
        let contents = request
            .messages
            .iter()
            .map(|m| GeminiContent {
                role: Some(
                    match m.role {
                        MessageRole::Assistant => "model",
                        MessageRole::User | MessageRole::System => "user",
                    }
                    .to_string(),
                ),
                parts: vec![GeminiPart {
                    text: m.content.clone(),
                }],
            })
            .collect();

        GeminiRequest {
            system_instruction: request.system.as_ref().map(|s| GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: s.clone() }],
            }),
            contents,
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                response_mime_type: request
                    .json_output
                    .then(|| "application/json".to_string()),
            },
        }
    }

    fn into_completion(response: GeminiResponse, model: &str) -> Result<CompletionResponse, LlmError> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;
        let content = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        let usage = response.usage_metadata.unwrap_or_default();
        Ok(CompletionResponse {
            id: response.response_id.unwrap_or_default(),
            content,
            model: response.model_version.unwrap_or_else(|| model.to_string()),
            usage: Usage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            },
        })
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_gemini_request(request);
        let url = self.url(&request.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited {
                    retry_after_ms: None,
                },
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        Self::into_completion(gemini_resp, &request.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interviewer_types::llm::Message;

    use crate::llm::gemini::types::{GeminiCandidate, UsageMetadata};

    fn make_provider() -> GeminiProvider {
        GeminiProvider::new(SecretString::from("test-key-not-real"), Duration::from_secs(5)).unwrap()
    }

    fn request(json_output: bool) -> CompletionRequest {
        CompletionRequest {
            model: "gemini-1.5-flash".to_string(),
            messages: vec![
                Message::assistant("What should I call you?"),
                Message::user("Ama"),
            ],
            system: Some("Be kind.".to_string()),
            max_tokens: 512,
            temperature: Some(0.7),
            json_output,
        }
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(make_provider().name(), "gemini");
    }

    #[test]
    fn test_url_and_base_url_override() {
        let provider = make_provider();
        assert_eq!(
            provider.url("gemini-1.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        let provider = provider.with_base_url("http://localhost:9000/");
        assert_eq!(
            provider.url("m"),
            "http://localhost:9000/v1beta/models/m:generateContent"
        );
    }

    #[test]
    fn test_to_gemini_request_maps_roles() {
        let req = make_provider().to_gemini_request(&request(false));
        assert_eq!(req.contents.len(), 2);
        assert_eq!(req.contents[0].role.as_deref(), Some("model"));
        assert_eq!(req.contents[1].role.as_deref(), Some("user"));
        assert_eq!(req.system_instruction.unwrap().parts[0].text, "Be kind.");
        assert_eq!(req.generation_config.max_output_tokens, 512);
        assert!(req.generation_config.response_mime_type.is_none());
    }

    #[test]
    fn test_json_output_sets_mime_type() {
        let req = make_provider().to_gemini_request(&request(true));
        assert_eq!(
            req.generation_config.response_mime_type.as_deref(),
            Some("application/json")
        );
    }

    #[test]
    fn test_into_completion_joins_parts() {
        let resp = GeminiResponse {
            candidates: vec![GeminiCandidate {
                content: Some(GeminiContent {
                    role: Some("model".to_string()),
                    parts: vec![
                        GeminiPart {
                            text: "Thank you, ".to_string(),
                        },
                        GeminiPart {
                            text: "Ama.".to_string(),
                        },
                    ],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            usage_metadata: Some(UsageMetadata {
                prompt_token_count: 20,
                candidates_token_count: 5,
            }),
            model_version: None,
            response_id: Some("r1".to_string()),
        };

        let completion = GeminiProvider::into_completion(resp, "gemini-1.5-flash").unwrap();
        assert_eq!(completion.content, "Thank you, Ama.");
        assert_eq!(completion.model, "gemini-1.5-flash");
        assert_eq!(completion.id, "r1");
        assert_eq!(completion.usage.input_tokens, 20);
        assert_eq!(completion.usage.output_tokens, 5);
    }

    #[test]
    fn test_into_completion_without_candidates_is_empty_response() {
        let resp = GeminiResponse {
            candidates: Vec::new(),
            usage_metadata: None,
            model_version: None,
            response_id: None,
        };
        let err = GeminiProvider::into_completion(resp, "m").unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    mod against_local_server {
        use super::*;

        use std::sync::{Arc, Mutex};

        use axum::Router;
        use axum::extract::State;
        use axum::http::{HeaderMap, StatusCode, Uri};

        #[derive(Debug, Default)]
        struct Received {
            path: String,
            api_key: Option<String>,
            body: serde_json::Value,
        }

        type Shared = (Arc<Mutex<Received>>, u16, &'static str);

        async fn answer(
            State((received, status, body)): State<Shared>,
            uri: Uri,
            headers: HeaderMap,
            request_body: String,
        ) -> (StatusCode, &'static str) {
            let mut received = received.lock().unwrap();
            received.path = uri.path().to_string();
            received.api_key = headers
                .get("x-goog-api-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            received.body = serde_json::from_str(&request_body).unwrap_or_default();
            (StatusCode::from_u16(status).unwrap(), body)
        }

        /// Serve a fake Gemini endpoint answering every call with `status` and `body`.
        async fn oracle(status: u16, body: &'static str) -> (GeminiProvider, Arc<Mutex<Received>>) {
            let received = Arc::new(Mutex::new(Received::default()));
            let app = Router::new()
                .fallback(answer)
                .with_state((Arc::clone(&received), status, body));
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            (make_provider().with_base_url(format!("http://{addr}")), received)
        }

        #[tokio::test]
        async fn test_success_round_trip() {
            let (provider, received) = oracle(
                200,
                r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Thank you, Ama."}]},"finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":12,"candidatesTokenCount":4},"responseId":"r-9"}"#,
            )
            .await;

            let completion = provider.complete(&request(false)).await.unwrap();
            assert_eq!(completion.content, "Thank you, Ama.");
            assert_eq!(completion.id, "r-9");
            assert_eq!(completion.usage.input_tokens, 12);

            let received = received.lock().unwrap();
            assert_eq!(received.path, "/v1beta/models/gemini-1.5-flash:generateContent");
            assert_eq!(received.api_key.as_deref(), Some("test-key-not-real"));
            assert_eq!(received.body["contents"][0]["role"], "model");
            assert_eq!(received.body["contents"][1]["parts"][0]["text"], "Ama");
            assert_eq!(received.body["systemInstruction"]["parts"][0]["text"], "Be kind.");
        }

        #[tokio::test]
        async fn test_unauthorized_and_forbidden_are_auth_failures() {
            for status in [401, 403] {
                let (provider, _) = oracle(status, r#"{"error":{"message":"API key not valid"}}"#).await;
                let err = provider.complete(&request(false)).await.unwrap_err();
                assert!(matches!(err, LlmError::AuthenticationFailed), "status {status}: {err:?}");
            }
        }

        #[tokio::test]
        async fn test_too_many_requests_is_rate_limited() {
            let (provider, _) = oracle(429, "slow down").await;
            let err = provider.complete(&request(false)).await.unwrap_err();
            assert!(matches!(err, LlmError::RateLimited { retry_after_ms: None }));
        }

        #[tokio::test]
        async fn test_server_error_carries_status_and_body() {
            let (provider, _) = oracle(503, "model overloaded").await;
            let err = provider.complete(&request(false)).await.unwrap_err();
            match err {
                LlmError::Provider { message } => {
                    assert!(message.contains("503"), "{message}");
                    assert!(message.contains("model overloaded"), "{message}");
                }
                other => panic!("expected Provider error, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_no_candidates_is_empty_response() {
            let (provider, _) = oracle(200, r#"{"candidates":[]}"#).await;
            let err = provider.complete(&request(false)).await.unwrap_err();
            assert!(matches!(err, LlmError::EmptyResponse));
        }
    }
}
