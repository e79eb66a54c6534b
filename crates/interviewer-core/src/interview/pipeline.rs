//! Finalize pipeline: gate, extract, map, submit.
//!
//! Runs once per successful interview. Every step is a hard stop on failure
//! and nothing is retried here; the caller keeps the session and may trigger
//! finalize again.

use std::sync::Arc;

use tracing::{info, warn};

use interviewer_types::config::InterviewerConfig;
use interviewer_types::error::FinalizeError;
use interviewer_types::extraction::ExtractionRecord;
use interviewer_types::submission::{FieldMapping, SubmissionReceipt};

use crate::form::FormSubmitter;
use crate::form::payload::{OperatorOverrides, build_payload};
use crate::interview::extraction::{ExtractionSettings, extract_record};
use crate::interview::gate::is_ready_for_submission;
use crate::interview::session::{InterviewSession, SessionStatus};
use crate::llm::box_provider::BoxLlmProvider;

#[derive(Debug, Clone)]
pub struct FinalizeSettings {
    pub extraction: ExtractionSettings,
    pub min_turns: usize,
    pub field_mapping: FieldMapping,
    pub overrides: OperatorOverrides,
}

impl FinalizeSettings {
    pub fn from_config(config: &InterviewerConfig) -> Self {
        Self {
            extraction: ExtractionSettings {
                model: config.oracle.extraction_model.clone(),
                max_tokens: config.oracle.extraction_max_tokens,
            },
            min_turns: config.interview.min_turns,
            field_mapping: config.form.field_mapping.clone(),
            overrides: OperatorOverrides::from_config(&config.form),
        }
    }
}

/// Turns a finished transcript into a form submission.
pub struct FinalizePipeline<F> {
    provider: Arc<BoxLlmProvider>,
    submitter: F,
    settings: FinalizeSettings,
}

impl<F: FormSubmitter> FinalizePipeline<F> {
    pub fn new(provider: Arc<BoxLlmProvider>, submitter: F, settings: FinalizeSettings) -> Self {
        Self {
            provider,
            submitter,
            settings,
        }
    }

    pub fn settings(&self) -> &FinalizeSettings {
        &self.settings
    }

    /// Whether the session may be finalized now.
    pub fn is_ready(&self, session: &InterviewSession) -> bool {
        session.status() == SessionStatus::Active
            && is_ready_for_submission(session.transcript(), self.settings.min_turns)
    }

    /// Run extraction alone, without submitting.
    pub async fn extract(&self, session: &InterviewSession) -> Result<ExtractionRecord, FinalizeError> {
        extract_record(
            &self.provider,
            &self.settings.extraction,
            session.transcript(),
            session.attachments(),
        )
        .await
    }

    /// Extract a record from the session and submit it.
    ///
    /// The session is only read. On success the caller marks it finalized;
    /// on any error it is left exactly as it was.
    #[tracing::instrument(
        name = "finalize",
        skip(self, session),
        fields(session_id = %session.id(), turns = session.transcript().len())
    )]
    pub async fn finalize(&self, session: &InterviewSession) -> Result<SubmissionReceipt, FinalizeError> {
        if session.status() == SessionStatus::Finalized {
            return Err(FinalizeError::AlreadySubmitted);
        }
        if !is_ready_for_submission(session.transcript(), self.settings.min_turns) {
            return Err(FinalizeError::NotReady {
                turns: session.transcript().len(),
                threshold: self.settings.min_turns,
            });
        }

        let record = self.extract(session).await?;
        let filled = record.iter().filter(|(_, v)| !v.is_empty()).count();
        info!(filled, total = record.len(), "Extraction complete");

        let payload = build_payload(&record, &self.settings.field_mapping, &self.settings.overrides);

        match self.submitter.submit(&payload).await {
            Ok(receipt) => {
                info!(
                    status = receipt.status,
                    submission_id = receipt.submission_id.as_deref().unwrap_or("-"),
                    fields = payload.len(),
                    "Submission accepted"
                );
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, "Submission failed");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interviewer_types::error::SubmissionError;
    use interviewer_types::extraction::ExtractionKey;
    use interviewer_types::turn::{Transcript, Turn};

    use crate::testing::{RecordingSubmitter, ScriptedProvider};

    const RECORD_JSON: &str = r#"{"respondent_name": "Ama", "location": "Accra", "referral_source": "radio"}"#;

    fn settings(min_turns: usize) -> FinalizeSettings {
        FinalizeSettings {
            extraction: ExtractionSettings {
                model: "extract-model".to_string(),
                max_tokens: 2048,
            },
            min_turns,
            field_mapping: FieldMapping::new()
                .with(ExtractionKey::RespondentName, "3")
                .with(ExtractionKey::Location, "7"),
            overrides: OperatorOverrides {
                operator_name: "Intake Desk".to_string(),
                case_assigned_to_field: "21".to_string(),
                referral_received_by_field: "22".to_string(),
            },
        }
    }

    fn long_session(turns: usize) -> InterviewSession {
        let transcript: Transcript = (0..turns)
            .map(|i| {
                if i % 2 == 0 {
                    Turn::assistant(format!("question {i}"))
                } else {
                    Turn::user(format!("answer {i}"))
                }
            })
            .collect();
        InterviewSession::with_transcript(transcript)
    }

    fn pipeline(provider: ScriptedProvider, submitter: RecordingSubmitter) -> FinalizePipeline<RecordingSubmitter> {
        FinalizePipeline::new(Arc::new(BoxLlmProvider::new(provider)), submitter, settings(6))
    }

    #[tokio::test]
    async fn test_finalize_submits_mapped_payload_with_overrides() {
        let submitter = RecordingSubmitter::accepting();
        let payloads = submitter.payloads();
        let pipeline = pipeline(ScriptedProvider::replying([RECORD_JSON]), submitter);
        let session = long_session(8);

        let receipt = pipeline.finalize(&session).await.unwrap();
        assert_eq!(receipt.status, 200);
        assert_eq!(receipt.submission_id.as_deref(), Some("5550001"));

        let payloads = payloads.lock().unwrap();
        assert_eq!(payloads.len(), 1);
        let payload = &payloads[0];
        assert_eq!(payload.get("3"), Some("Ama"));
        assert_eq!(payload.get("7"), Some("Accra"));
        assert_eq!(payload.get("21"), Some("Intake Desk"));
        assert_eq!(payload.get("22"), Some("Intake Desk"));
    }

    #[tokio::test]
    async fn test_fenced_extraction_output_accepted() {
        let submitter = RecordingSubmitter::accepting();
        let payloads = submitter.payloads();
        let fenced = format!("```json\n{RECORD_JSON}\n```");
        let pipeline = pipeline(ScriptedProvider::replying([fenced]), submitter);

        pipeline.finalize(&long_session(7)).await.unwrap();
        assert_eq!(payloads.lock().unwrap()[0].get("3"), Some("Ama"));
    }

    #[tokio::test]
    async fn test_rejected_submission_carries_body_and_keeps_session() {
        let submitter = RecordingSubmitter::with_status(422, "{\"message\":\"invalid field 7\"}");
        let pipeline = pipeline(ScriptedProvider::replying([RECORD_JSON]), submitter);
        let session = long_session(8);
        let before: Vec<String> = session.transcript().iter().map(Turn::to_line).collect();

        let err = pipeline.finalize(&session).await.unwrap_err();
        match err {
            FinalizeError::Submission(SubmissionError::Rejected { status, body }) => {
                assert_eq!(status, 422);
                assert!(body.contains("invalid field 7"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let after: Vec<String> = session.transcript().iter().map(Turn::to_line).collect();
        assert_eq!(before, after);
        assert_eq!(session.status(), SessionStatus::Active);
    }

    #[tokio::test]
    async fn test_malformed_output_stops_before_submission() {
        let submitter = RecordingSubmitter::accepting();
        let payloads = submitter.payloads();
        let pipeline = pipeline(ScriptedProvider::replying(["I could not find anything."]), submitter);

        let err = pipeline.finalize(&long_session(8)).await.unwrap_err();
        assert!(matches!(err, FinalizeError::MalformedOutput(_)));
        assert!(payloads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_not_ready_makes_no_calls() {
        let provider = ScriptedProvider::replying([RECORD_JSON]);
        let requests = provider.requests();
        let pipeline = pipeline(provider, RecordingSubmitter::accepting());
        let session = long_session(6);

        assert!(!pipeline.is_ready(&session));
        let err = pipeline.finalize(&session).await.unwrap_err();
        assert!(matches!(err, FinalizeError::NotReady { turns: 6, threshold: 6 }));
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_already_submitted() {
        let pipeline = pipeline(ScriptedProvider::replying([RECORD_JSON]), RecordingSubmitter::accepting());
        let mut session = long_session(8);
        session.mark_finalized();

        assert!(!pipeline.is_ready(&session));
        let err = pipeline.finalize(&session).await.unwrap_err();
        assert!(matches!(err, FinalizeError::AlreadySubmitted));
    }

    #[tokio::test]
    async fn test_oracle_failure_surfaces() {
        let pipeline = pipeline(ScriptedProvider::failing("quota exceeded"), RecordingSubmitter::accepting());
        let err = pipeline.finalize(&long_session(8)).await.unwrap_err();
        assert!(matches!(err, FinalizeError::Oracle(_)));
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = InterviewerConfig::default();
        config.form.operator_name = "Desk".to_string();
        config.interview.min_turns = 4;
        let s = FinalizeSettings::from_config(&config);
        assert_eq!(s.min_turns, 4);
        assert_eq!(s.extraction.model, "gemini-1.5-pro");
        assert_eq!(s.extraction.max_tokens, 2048);
        assert_eq!(s.overrides.operator_name, "Desk");
    }
}
