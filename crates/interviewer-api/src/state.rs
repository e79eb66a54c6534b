//! Application state shared by the CLI and the REST API.
//!
//! Built once from the validated configuration. Everything in here is
//! read-only after startup except the live session map, which shrinks on
//! delete, on successful submission and when idle sessions are swept.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use interviewer_core::form::box_submitter::BoxFormSubmitter;
use interviewer_core::interview::controller::{ChatSettings, TurnController};
use interviewer_core::interview::pipeline::{FinalizePipeline, FinalizeSettings};
use interviewer_core::interview::prompt;
use interviewer_core::interview::session::InterviewSession;
use interviewer_core::llm::box_provider::BoxLlmProvider;
use interviewer_infra::config::load_config;
use interviewer_infra::form::JotformSubmitter;
use interviewer_infra::llm::create_provider;
use interviewer_types::config::InterviewerConfig;

/// A live session behind its own lock; one action at a time per session.
pub type SharedSession = Arc<Mutex<InterviewSession>>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<InterviewerConfig>,
    pub controller: Arc<TurnController>,
    pub pipeline: Arc<FinalizePipeline<BoxFormSubmitter>>,
    pub sessions: Arc<DashMap<Uuid, SharedSession>>,
}

impl AppState {
    /// Load configuration from `config_path` and build the adapters.
    pub async fn init(config_path: &Path) -> anyhow::Result<Self> {
        let loaded = load_config(config_path).await?;
        let config = loaded.config;

        let provider = create_provider(&config.oracle, loaded.oracle_api_key)?;
        let submitter = JotformSubmitter::new(
            config.form.base_url.clone(),
            config.form.form_id.clone(),
            loaded.form_api_key,
            Duration::from_secs(config.form.timeout_secs),
        )?;

        tracing::info!(
            provider = provider.name(),
            chat_model = %config.oracle.chat_model,
            extraction_model = %config.oracle.extraction_model,
            min_turns = config.interview.min_turns,
            "Application state initialized"
        );

        Ok(Self::from_parts(config, provider, BoxFormSubmitter::new(submitter)))
    }

    /// Assemble state from already-built adapters.
    pub fn from_parts(config: InterviewerConfig, provider: BoxLlmProvider, submitter: BoxFormSubmitter) -> Self {
        let provider = Arc::new(provider);
        let controller = TurnController::new(Arc::clone(&provider), ChatSettings::from_config(&config));
        let pipeline = FinalizePipeline::new(provider, submitter, FinalizeSettings::from_config(&config));

        Self {
            config: Arc::new(config),
            controller: Arc::new(controller),
            pipeline: Arc::new(pipeline),
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// Start a session seeded with the greeting and register it.
    pub fn start_session(&self) -> (Uuid, SharedSession) {
        let session = InterviewSession::start(prompt::greeting(&self.config.interview));
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(id, Arc::clone(&shared));
        tracing::info!(session_id = %id, "Session started");
        (id, shared)
    }

    pub fn session(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop a session and its transcript. Returns whether it existed.
    pub fn end_session(&self, id: &Uuid) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Session ended");
        }
        removed
    }

    /// Discard sessions idle for longer than `interview.idle_timeout_secs`.
    ///
    /// A session whose lock is held is mid-action and is never idle.
    /// Returns the number of sessions removed.
    pub fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let timeout = i64::try_from(self.config.interview.idle_timeout_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX);
        let before = self.sessions.len();
        self.sessions.retain(|id, shared| match shared.try_lock() {
            Ok(session) if session.is_idle(now, timeout) => {
                tracing::info!(session_id = %id, "Session expired");
                false
            }
            _ => true,
        });
        before.saturating_sub(self.sessions.len())
    }

    /// Run [`AppState::evict_idle`] every `interview.sweep_interval_secs`.
    pub fn spawn_session_sweeper(&self) -> JoinHandle<()> {
        let state = self.clone();
        let period = Duration::from_secs(self.config.interview.sweep_interval_secs.max(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = state.evict_idle(Utc::now());
                if removed > 0 {
                    tracing::debug!(removed, remaining = state.sessions.len(), "Idle sessions swept");
                }
            }
        })
    }
}
