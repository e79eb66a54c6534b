use thiserror::Error;

use crate::llm::LlmError;

/// Errors raised while loading process configuration.
///
/// All of them are fatal: the process stops before any interview starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to read config file '{path}': {message}")]
    Io { path: String, message: String },
}

/// Errors from submitting a turn.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("message text must not be empty")]
    EmptyInput,

    #[error("session is no longer accepting turns")]
    SessionClosed,
}

/// Errors from the form submission call.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("form API rejected submission: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("form API unreachable: {0}")]
    Transport(String),
}

/// Errors from the extraction/submission pipeline.
///
/// Every variant is terminal for the current attempt; the caller may retry
/// the whole finalize action.
#[derive(Debug, Error)]
pub enum FinalizeError {
    #[error("interview too short to finalize: {turns} turns, need more than {threshold}")]
    NotReady { turns: usize, threshold: usize },

    #[error("session already submitted")]
    AlreadySubmitted,

    #[error("extraction call failed: {0}")]
    Oracle(#[from] LlmError),

    #[error("extraction output is not a valid record: {0}")]
    MalformedOutput(String),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
