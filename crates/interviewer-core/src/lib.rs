//! Interview logic and port definitions for the AI interviewer.
//!
//! This crate defines the "ports" the infrastructure layer implements
//! (`LlmProvider`, `FormSubmitter`) and the logic built on them: the
//! session context, turn controller, completion gate, extraction and the
//! finalize pipeline. It depends only on `interviewer-types` -- never on
//! `interviewer-infra` or any HTTP crate.

pub mod form;
pub mod interview;
pub mod llm;

#[cfg(test)]
pub(crate) mod testing;
