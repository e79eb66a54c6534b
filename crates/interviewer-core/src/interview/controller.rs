//! Turn controller: one user message in, one assistant turn out.
//!
//! The oracle keeps no state between calls, so every turn replays the whole
//! transcript. Oracle failures are folded into a diagnostic turn so the
//! session always stays displayable.

use std::sync::Arc;

use tracing::{info, warn};

use interviewer_types::config::InterviewerConfig;
use interviewer_types::error::TurnError;
use interviewer_types::llm::CompletionRequest;
use interviewer_types::turn::Turn;

use crate::interview::prompt;
use crate::interview::session::{InterviewSession, SessionStatus};
use crate::llm::box_provider::BoxLlmProvider;

/// Per-turn request settings.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: String,
    pub persona: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl ChatSettings {
    pub fn from_config(config: &InterviewerConfig) -> Self {
        Self {
            model: config.oracle.chat_model.clone(),
            persona: prompt::persona(&config.interview).to_string(),
            temperature: config.oracle.temperature,
            max_tokens: config.oracle.max_tokens,
        }
    }
}

/// Drives the conversation for any number of sessions.
///
/// Holds no session state itself; each call borrows the session it works on.
pub struct TurnController {
    provider: Arc<BoxLlmProvider>,
    settings: ChatSettings,
}

impl TurnController {
    pub fn new(provider: Arc<BoxLlmProvider>, settings: ChatSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Append the user's message, ask the oracle, append its reply.
    ///
    /// On success the transcript grows by a user and an assistant turn. If
    /// the oracle call fails the assistant slot holds a diagnostic turn
    /// instead. Either way the returned turn is the one appended last.
    #[tracing::instrument(
        name = "submit_user_turn",
        skip(self, session, text),
        fields(session_id = %session.id(), turns = session.transcript().len())
    )]
    pub async fn submit_user_turn(
        &self,
        session: &mut InterviewSession,
        text: &str,
    ) -> Result<Turn, TurnError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TurnError::EmptyInput);
        }
        if session.status() != SessionStatus::Active {
            return Err(TurnError::SessionClosed);
        }

        session.push_turn(Turn::user(text));

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: session.transcript().to_messages(),
            system: Some(self.settings.persona.clone()),
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
            json_output: false,
        };

        let reply = match self.provider.complete(&request).await {
            Ok(response) => {
                info!(
                    provider = self.provider.name(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "Oracle replied"
                );
                Turn::assistant(response.content)
            }
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Oracle call failed");
                Turn::diagnostic(format!("An error occurred: {e}"))
            }
        };

        session.push_turn(reply.clone());
        Ok(reply)
    }
}
