//! Shared domain types for the AI interviewer.
//!
//! This crate contains the types used across the workspace: conversation
//! turns and transcripts, the closed extraction record, form submission
//! payloads, LLM request/response shapes, configuration, and error enums.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod extraction;
pub mod llm;
pub mod submission;
pub mod turn;
