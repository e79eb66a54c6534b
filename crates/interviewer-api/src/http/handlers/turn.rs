//! POST /api/v1/sessions/{id}/turns - Submit one user message.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use interviewer_types::turn::Turn;

use super::resolve_session;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    /// The assistant turn appended last; may be a diagnostic turn.
    pub reply: Turn,
    pub turn_count: usize,
    pub ready_for_submission: bool,
}

pub async fn submit_turn(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<TurnRequest>,
) -> Result<Json<ApiResponse<TurnResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (sid, shared) = resolve_session(&state, &session_id)?;
    let mut session = shared.lock().await;

    let reply = state.controller.submit_user_turn(&mut session, &body.text).await?;
    let response = TurnResponse {
        reply,
        turn_count: session.transcript().len(),
        ready_for_submission: state.pipeline.is_ready(&session),
    };

    let elapsed = start.elapsed().as_millis() as u64;
    let mut resp = ApiResponse::success(response, request_id, elapsed)
        .with_link("session", &format!("/api/v1/sessions/{sid}"));
    if resp.data.as_ref().is_some_and(|d| d.ready_for_submission) {
        resp = resp.with_link("finalize", &format!("/api/v1/sessions/{sid}/finalize"));
    }
    Ok(Json(resp))
}
