//! Session context for one interview.
//!
//! `InterviewSession` owns the transcript and everything else that lives only
//! as long as one respondent's visit. It is created on session start, passed
//! to each operation, and dropped on session end. Nothing in it is shared
//! between sessions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use interviewer_types::turn::{Transcript, Turn};

/// Lifecycle status of an interview session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Accepting turns.
    Active,
    /// Successfully submitted to the form API; no further turns.
    Finalized,
}

/// One respondent's interview.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    status: SessionStatus,
    transcript: Transcript,
    /// Names of files the respondent attached. Contents are never read.
    attachments: Vec<String>,
    last_activity: DateTime<Utc>,
}

impl InterviewSession {
    /// Start a session whose transcript opens with the assistant greeting.
    pub fn start(greeting: &str) -> Self {
        let mut transcript = Transcript::new();
        transcript.push(Turn::assistant(greeting));
        Self::with_transcript(transcript)
    }

    /// Start a session from an existing transcript.
    pub fn with_transcript(transcript: Transcript) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            started_at: now,
            status: SessionStatus::Active,
            transcript,
            attachments: Vec::new(),
            last_activity: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    /// When the transcript or attachments last changed.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// True when nothing has happened for longer than `timeout`.
    pub fn is_idle(&self, now: DateTime<Utc>, timeout: chrono::Duration) -> bool {
        now - self.last_activity > timeout
    }

    pub(crate) fn push_turn(&mut self, turn: Turn) {
        self.transcript.push(turn);
        self.last_activity = Utc::now();
    }

    /// Record the name of an attached file.
    ///
    /// Blank names are ignored; returns whether the name was stored.
    pub fn record_attachment(&mut self, file_name: &str) -> bool {
        let name = file_name.trim();
        if name.is_empty() {
            return false;
        }
        self.attachments.push(name.to_string());
        self.last_activity = Utc::now();
        true
    }

    /// Mark the session as submitted.
    pub fn mark_finalized(&mut self) {
        self.status = SessionStatus::Finalized;
    }
}
