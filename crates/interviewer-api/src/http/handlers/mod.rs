//! HTTP request handlers for the REST API.

pub mod finalize;
pub mod session;
pub mod turn;

use uuid::Uuid;

use crate::http::error::AppError;
use crate::state::{AppState, SharedSession};

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// Look up a live session by its path parameter.
pub(crate) fn resolve_session(state: &AppState, id: &str) -> Result<(Uuid, SharedSession), AppError> {
    let sid = parse_uuid(id)?;
    let session = state.session(&sid).ok_or(AppError::SessionNotFound)?;
    Ok((sid, session))
}
