//! Form-collection API clients.

pub mod jotform;

pub use jotform::JotformSubmitter;
