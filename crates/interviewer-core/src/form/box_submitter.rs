//! BoxFormSubmitter -- object-safe wrapper for [`FormSubmitter`].
//!
//! Same shape as [`BoxLlmProvider`](crate::llm::box_provider::BoxLlmProvider):
//! a boxed-future mirror trait, a blanket impl, and a wrapper that
//! implements the original trait again so it can stand in for any `F`.

use std::future::Future;
use std::pin::Pin;

use interviewer_types::error::SubmissionError;
use interviewer_types::submission::{SubmissionPayload, SubmissionReceipt};

use super::FormSubmitter;

/// Object-safe version of [`FormSubmitter`].
pub trait FormSubmitterDyn: Send + Sync {
    fn submit_boxed<'a>(
        &'a self,
        payload: &'a SubmissionPayload,
    ) -> Pin<Box<dyn Future<Output = Result<SubmissionReceipt, SubmissionError>> + Send + 'a>>;
}

impl<T: FormSubmitter> FormSubmitterDyn for T {
    fn submit_boxed<'a>(
        &'a self,
        payload: &'a SubmissionPayload,
    ) -> Pin<Box<dyn Future<Output = Result<SubmissionReceipt, SubmissionError>> + Send + 'a>> {
        Box::pin(self.submit(payload))
    }
}

/// Type-erased form submitter.
pub struct BoxFormSubmitter {
    inner: Box<dyn FormSubmitterDyn>,
}

impl BoxFormSubmitter {
    pub fn new<T: FormSubmitter + 'static>(submitter: T) -> Self {
        Self {
            inner: Box::new(submitter),
        }
    }
}

impl FormSubmitter for BoxFormSubmitter {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError> {
        self.inner.submit_boxed(payload).await
    }
}
