//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use interviewer_types::error::{FinalizeError, SubmissionError, TurnError};

#[derive(Debug)]
pub enum AppError {
    /// Turn submission errors.
    Turn(TurnError),
    /// Extraction/submission pipeline errors.
    Finalize(FinalizeError),
    /// No live session with this id.
    SessionNotFound,
    /// Malformed request.
    Validation(String),
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        AppError::Turn(e)
    }
}

impl From<FinalizeError> for AppError {
    fn from(e: FinalizeError) -> Self {
        AppError::Finalize(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Turn(TurnError::EmptyInput) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", self.message())
            }
            AppError::Turn(TurnError::SessionClosed) => {
                (StatusCode::CONFLICT, "SESSION_CLOSED", self.message())
            }
            AppError::Finalize(FinalizeError::NotReady { .. }) => {
                (StatusCode::CONFLICT, "NOT_READY", self.message())
            }
            AppError::Finalize(FinalizeError::AlreadySubmitted) => {
                (StatusCode::CONFLICT, "ALREADY_SUBMITTED", self.message())
            }
            AppError::Finalize(FinalizeError::Oracle(_)) => {
                (StatusCode::BAD_GATEWAY, "ORACLE_ERROR", self.message())
            }
            AppError::Finalize(FinalizeError::MalformedOutput(_)) => {
                (StatusCode::BAD_GATEWAY, "MALFORMED_EXTRACTION", self.message())
            }
            AppError::Finalize(FinalizeError::Submission(SubmissionError::Rejected { .. })) => {
                (StatusCode::BAD_GATEWAY, "SUBMISSION_REJECTED", self.message())
            }
            AppError::Finalize(FinalizeError::Submission(SubmissionError::Transport(_))) => {
                (StatusCode::BAD_GATEWAY, "FORM_UNREACHABLE", self.message())
            }
            AppError::SessionNotFound => {
                (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", self.message())
            }
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", self.message()),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Turn(e) => e.to_string(),
            AppError::Finalize(e) => e.to_string(),
            AppError::SessionNotFound => "Session not found".to_string(),
            AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
