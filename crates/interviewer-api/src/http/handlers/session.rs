//! Session lifecycle handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions                      - Start a session
//! - GET    /api/v1/sessions/{id}                 - Session view
//! - DELETE /api/v1/sessions/{id}                 - End a session
//! - POST   /api/v1/sessions/{id}/attachments     - Record an attachment name
//! - GET    /api/v1/sessions/{id}/transcript      - Export the raw transcript

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use interviewer_core::interview::session::{InterviewSession, SessionStatus};
use interviewer_types::turn::Transcript;

use super::resolve_session;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Session as returned by the API.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub turn_count: usize,
    pub ready_for_submission: bool,
    pub attachments: Vec<String>,
    pub transcript: Transcript,
}

impl SessionView {
    pub fn new(session: &InterviewSession, ready_for_submission: bool) -> Self {
        Self {
            id: session.id(),
            status: session.status(),
            started_at: session.started_at(),
            turn_count: session.transcript().len(),
            ready_for_submission,
            attachments: session.attachments().to_vec(),
            transcript: session.transcript().clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AttachmentRequest {
    pub file_name: String,
}

/// POST /api/v1/sessions - Start a session seeded with the greeting.
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (id, shared) = state.start_session();
    let session = shared.lock().await;
    let view = SessionView::new(&session, state.pipeline.is_ready(&session));

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(view, request_id, elapsed)
            .with_link("self", &format!("/api/v1/sessions/{id}"))
            .with_link("turns", &format!("/api/v1/sessions/{id}/turns")),
    ))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (sid, shared) = resolve_session(&state, &session_id)?;
    let session = shared.lock().await;
    let view = SessionView::new(&session, state.pipeline.is_ready(&session));

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(view, request_id, elapsed)
            .with_link("self", &format!("/api/v1/sessions/{sid}")),
    ))
}

/// DELETE /api/v1/sessions/{id} - Discard the session and its transcript.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = super::parse_uuid(&session_id)?;
    if !state.end_session(&sid) {
        return Err(AppError::SessionNotFound);
    }

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": true, "id": sid.to_string() }),
        request_id,
        elapsed,
    )))
}

/// POST /api/v1/sessions/{id}/attachments - Record a file name. Contents are never uploaded.
pub async fn add_attachment(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<AttachmentRequest>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (_, shared) = resolve_session(&state, &session_id)?;
    let mut session = shared.lock().await;
    if !session.record_attachment(&body.file_name) {
        return Err(AppError::Validation("file_name must not be empty".to_string()));
    }
    let view = SessionView::new(&session, state.pipeline.is_ready(&session));

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(view, request_id, elapsed)))
}

/// GET /api/v1/sessions/{id}/transcript - Raw transcript, for download instead of submission.
pub async fn export_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<Transcript>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (_, shared) = resolve_session(&state, &session_id)?;
    let transcript = shared.lock().await.transcript().clone();

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(transcript, request_id, elapsed)))
}
