//! Form submission port and payload assembly.
//!
//! The external form-collection API is reached through [`FormSubmitter`];
//! [`box_submitter::BoxFormSubmitter`] erases the concrete backend and
//! [`payload::build_payload`] turns an extraction record into the payload
//! that gets sent.

pub mod box_submitter;
pub mod payload;

use interviewer_types::error::SubmissionError;
use interviewer_types::submission::{SubmissionPayload, SubmissionReceipt};

/// Trait for form-collection backends.
///
/// Implementations perform exactly one outbound call per `submit` and never
/// retry. A 200/201 answer is a receipt; anything else is
/// [`SubmissionError::Rejected`] carrying the status and body verbatim.
pub trait FormSubmitter: Send + Sync {
    fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> impl std::future::Future<Output = Result<SubmissionReceipt, SubmissionError>> + Send;
}
