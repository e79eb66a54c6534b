//! Conversation turns and the append-only transcript.
//!
//! A [`Transcript`] is the ordered history of one interview session. Order is
//! semantically significant: it is replayed verbatim to the oracle on every
//! turn, so the only mutation offered is [`Transcript::push`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::llm::{Message, MessageRole};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TurnRole::User),
            "assistant" => Ok(TurnRole::Assistant),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

impl From<TurnRole> for MessageRole {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => MessageRole::User,
            TurnRole::Assistant => MessageRole::Assistant,
        }
    }
}

/// One message exchanged between the user and the oracle.
///
/// Fields are private so a turn cannot be edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    role: TurnRole,
    text: String,
    /// Set on assistant-slot turns that carry a local error message
    /// instead of an oracle reply.
    #[serde(default)]
    diagnostic: bool,
    created_at: DateTime<Utc>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TurnRole::User, text.into(), false)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, text.into(), false)
    }

    /// An assistant-slot turn describing a failed oracle call.
    pub fn diagnostic(text: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, text.into(), true)
    }

    fn new(role: TurnRole, text: String, diagnostic: bool) -> Self {
        Self {
            role,
            text,
            diagnostic,
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_diagnostic(&self) -> bool {
        self.diagnostic
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// `role: text`, the line format used when flattening a transcript.
    pub fn to_line(&self) -> String {
        format!("{}: {}", self.role, self.text)
    }
}

/// Ordered, append-only sequence of turns for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn at the end of the conversation.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    /// The conversational context replayed to the oracle.
    ///
    /// Every turn goes out in order. Diagnostic turns keep the assistant
    /// slot so user and assistant messages still alternate.
    pub fn to_messages(&self) -> Vec<Message> {
        self.turns
            .iter()
            .map(|t| Message {
                role: t.role.into(),
                content: t.text.clone(),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

impl FromIterator<Turn> for Transcript {
    fn from_iter<I: IntoIterator<Item = Turn>>(iter: I) -> Self {
        Self {
            turns: iter.into_iter().collect(),
        }
    }
}
