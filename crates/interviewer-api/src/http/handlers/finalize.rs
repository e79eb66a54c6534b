//! POST /api/v1/sessions/{id}/finalize - Extract the record and submit it.
//!
//! On success the session ends: it is marked finalized, removed from the
//! session map, and the receipt carries the submission link. On failure the
//! session is untouched and the call may be repeated.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use interviewer_types::submission::SubmissionReceipt;

use super::resolve_session;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

pub async fn finalize_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SubmissionReceipt>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (sid, shared) = resolve_session(&state, &session_id)?;
    let mut session = shared.lock().await;

    let receipt = state.pipeline.finalize(&session).await?;
    session.mark_finalized();
    drop(session);
    state.end_session(&sid);

    let elapsed = start.elapsed().as_millis() as u64;
    let mut resp = ApiResponse::success(receipt, request_id, elapsed);
    if let Some(url) = resp.data.as_ref().and_then(|r| r.url.clone()) {
        resp = resp.with_link("submission", &url);
    }
    Ok(Json(resp))
}
