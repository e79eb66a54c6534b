//! Test doubles shared by the unit tests in this crate.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use interviewer_types::error::SubmissionError;
use interviewer_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};
use interviewer_types::submission::{SubmissionPayload, SubmissionReceipt};

use crate::form::FormSubmitter;
use crate::llm::provider::LlmProvider;

enum Outcome {
    Reply(String),
    Fail(String),
}

/// LLM provider that plays back a fixed list of outcomes and records requests.
pub struct ScriptedProvider {
    outcomes: Mutex<VecDeque<Outcome>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            outcomes: Mutex::new(replies.into_iter().map(|r| Outcome::Reply(r.into())).collect()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::from([Outcome::Fail(message.to_string())])),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the recorded requests; stays valid after the provider is boxed.
    pub fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let outcome = self.outcomes.lock().unwrap().pop_front();
        match outcome {
            Some(Outcome::Reply(content)) => Ok(CompletionResponse {
                id: "resp_test".to_string(),
                content,
                model: request.model.clone(),
                usage: Usage::default(),
            }),
            Some(Outcome::Fail(message)) => Err(LlmError::Provider { message }),
            None => Err(LlmError::EmptyResponse),
        }
    }
}

/// Form submitter that records payloads and answers with a fixed status.
pub struct RecordingSubmitter {
    status: u16,
    body: String,
    payloads: Arc<Mutex<Vec<SubmissionPayload>>>,
}

impl RecordingSubmitter {
    pub fn accepting() -> Self {
        Self::with_status(200, "")
    }

    pub fn with_status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn payloads(&self) -> Arc<Mutex<Vec<SubmissionPayload>>> {
        Arc::clone(&self.payloads)
    }
}

impl FormSubmitter for RecordingSubmitter {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError> {
        self.payloads.lock().unwrap().push(payload.clone());
        match self.status {
            200 | 201 => Ok(SubmissionReceipt {
                status: self.status,
                submission_id: Some("5550001".to_string()),
                url: Some("https://forms.example.test/submission/5550001".to_string()),
            }),
            status => Err(SubmissionError::Rejected {
                status,
                body: self.body.clone(),
            }),
        }
    }
}
