//! REST API for the interviewer.
//!
//! Axum router at `/api/v1/` with envelope responses and CORS. No inbound
//! authentication: the server is meant to sit behind the deployment's own
//! gateway.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
