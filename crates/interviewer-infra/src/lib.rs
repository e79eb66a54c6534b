//! Adapters for the AI interviewer: oracle providers, the form API client,
//! and the configuration loader.

pub mod config;
pub mod form;
pub mod llm;
