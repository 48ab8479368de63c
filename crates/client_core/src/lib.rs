use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::Subject,
    protocol::{AddContextRequest, AskRequest, AskResponse},
};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::warn;

pub mod reveal;

/// Notice shown after the collaborator accepts a context update.
pub const CONTEXT_UPDATED_NOTICE: &str = "Context updated successfully!";
/// Notice shown when a context update is rejected or the collaborator is
/// unreachable.
pub const CONTEXT_FAILED_NOTICE: &str = "Failed to update context. Please try again.";
/// Rendered in place of an answer when the collaborator cannot be reached.
pub const ANSWER_UNAVAILABLE_TEXT: &str =
    "Sorry, I'm having trouble connecting to the pediatrician right now. Please try again later.";

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Failure classes for collaborator requests. Both are recovered inside the
/// controller and surface only as the transient notice or the apology text;
/// the enum exists for logging and classification.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("context update failed: {0:#}")]
    ContextUpdate(#[source] anyhow::Error),
    #[error("answer request failed: {0:#}")]
    AnswerRequest(#[source] anyhow::Error),
}

/// Remote answer service consumed over HTTP, behind a trait so tests can
/// substitute fakes.
#[async_trait]
pub trait AnswerService: Send + Sync {
    async fn add_context(&self, request: AddContextRequest) -> Result<()>;
    async fn ask(&self, request: AskRequest) -> Result<AskResponse>;
}

/// Production [`AnswerService`] speaking to the collaborator's REST
/// endpoints. Any non-2xx status or transport failure is reported as an
/// error; no distinction is made between the two.
pub struct HttpAnswerService {
    http: Client,
    base_url: String,
}

impl HttpAnswerService {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn add_context(&self, request: AddContextRequest) -> Result<()> {
        self.http
            .post(format!("{}/add_context", self.base_url))
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn ask(&self, request: AskRequest) -> Result<AskResponse> {
        let response = self
            .http
            .post(format!("{}/ask", self.base_url))
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

/// All mutable state for one caregiver session. Created empty, mutated only
/// through [`SessionController`] operations, discarded at session end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub question_text: String,
    pub answer_text: String,
    pub is_awaiting_answer: bool,
    pub is_revealing: bool,
    pub mia_context: String,
    pub luna_context: String,
    pub notice: String,
}

impl SessionState {
    pub fn subject_context(&self, subject: Subject) -> &str {
        match subject {
            Subject::Mia => &self.mia_context,
            Subject::Luna => &self.luna_context,
        }
    }

    fn subject_context_mut(&mut self, subject: Subject) -> &mut String {
        match subject {
            Subject::Mia => &mut self.mia_context,
            Subject::Luna => &mut self.luna_context,
        }
    }

    fn has_submittable_context(&self) -> bool {
        !self.mia_context.trim().is_empty() || !self.luna_context.trim().is_empty()
    }
}

/// Observable state-machine transitions, published to subscribers in the
/// order the controller applies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    NoticeChanged { notice: String },
    AnswerTextChanged { answer: String },
    PhaseChanged { awaiting: bool, revealing: bool },
}

/// Pacing for the transient notice and the character reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    pub reveal_delay: Duration,
    pub notice_ttl: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(10),
            notice_ttl: Duration::from_secs(3),
        }
    }
}

/// Owns the session state machine and issues collaborator requests.
///
/// Each submission kind runs `Idle -> Sending -> (Success -> Revealing ->
/// Settled) | (Failure -> Settled)`. The two kinds share one in-flight
/// guard, so a submission is silently rejected while another is pending.
/// Collaborator failures never escape: they settle the state machine with
/// the failure notice or the apology text.
pub struct SessionController {
    inner: Arc<Mutex<SessionState>>,
    service: Arc<dyn AnswerService>,
    events_tx: broadcast::Sender<SessionEvent>,
    timing: SessionTiming,
    notice_epoch: Arc<AtomicU64>,
}

impl SessionController {
    pub fn new(service: Arc<dyn AnswerService>) -> Self {
        Self::with_timing(service, SessionTiming::default())
    }

    pub fn with_timing(service: Arc<dyn AnswerService>, timing: SessionTiming) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(SessionState::default())),
            service,
            events_tx,
            timing,
            notice_epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    /// Snapshot of the current session state.
    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.clone()
    }

    pub async fn set_subject_context(&self, subject: Subject, text: String) {
        let mut state = self.inner.lock().await;
        *state.subject_context_mut(subject) = text;
    }

    pub async fn set_question_text(&self, text: String) {
        self.inner.lock().await.question_text = text;
    }

    /// Sends both subject contexts to the collaborator and reports the
    /// outcome through the transient notice. A no-op while another request
    /// is in flight or when both contexts are blank.
    pub async fn submit_context(&self) {
        let request = {
            let mut state = self.inner.lock().await;
            if state.is_awaiting_answer || !state.has_submittable_context() {
                return;
            }
            state.is_awaiting_answer = true;
            state.notice.clear();
            AddContextRequest {
                mia_context: state.mia_context.clone(),
                luna_context: state.luna_context.clone(),
            }
        };
        self.emit(SessionEvent::PhaseChanged { awaiting: true, revealing: false });
        self.emit(SessionEvent::NoticeChanged { notice: String::new() });

        let notice = match self.service.add_context(request).await {
            Ok(()) => CONTEXT_UPDATED_NOTICE,
            Err(err) => {
                let err = RequestError::ContextUpdate(err);
                warn!("{err}");
                CONTEXT_FAILED_NOTICE
            }
        };

        {
            let mut state = self.inner.lock().await;
            state.is_awaiting_answer = false;
            state.notice = notice.to_string();
        }
        self.emit(SessionEvent::PhaseChanged { awaiting: false, revealing: false });
        self.emit(SessionEvent::NoticeChanged { notice: notice.to_string() });
        self.schedule_notice_clear();
    }

    /// Asks the collaborator the current question and discloses the answer
    /// one character at a time. On failure the apology text is rendered in
    /// place of an answer and the reveal is skipped entirely. A no-op while
    /// another request is in flight or when the question is blank.
    pub async fn submit_question(&self) {
        let request = {
            let mut state = self.inner.lock().await;
            if state.is_awaiting_answer || state.question_text.trim().is_empty() {
                return;
            }
            state.is_awaiting_answer = true;
            state.answer_text.clear();
            AskRequest { question: state.question_text.clone() }
        };
        self.emit(SessionEvent::PhaseChanged { awaiting: true, revealing: false });
        self.emit(SessionEvent::AnswerTextChanged { answer: String::new() });

        match self.service.ask(request).await {
            Ok(AskResponse { answer }) => self.reveal_answer(&answer).await,
            Err(err) => {
                let err = RequestError::AnswerRequest(err);
                warn!("{err}");
                self.inner.lock().await.answer_text = ANSWER_UNAVAILABLE_TEXT.to_string();
                self.emit(SessionEvent::AnswerTextChanged {
                    answer: ANSWER_UNAVAILABLE_TEXT.to_string(),
                });
            }
        }

        {
            let mut state = self.inner.lock().await;
            state.is_awaiting_answer = false;
            state.is_revealing = false;
        }
        self.emit(SessionEvent::PhaseChanged { awaiting: false, revealing: false });
    }

    /// Walks every prefix of the already-received answer with a fixed delay
    /// between steps. Runs to completion once started; each published value
    /// is a strict prefix of the next.
    async fn reveal_answer(&self, answer: &str) {
        self.inner.lock().await.is_revealing = true;
        self.emit(SessionEvent::PhaseChanged { awaiting: true, revealing: true });

        for prefix in reveal::prefixes(answer) {
            tokio::time::sleep(self.timing.reveal_delay).await;
            self.inner.lock().await.answer_text = prefix.to_string();
            self.emit(SessionEvent::AnswerTextChanged { answer: prefix.to_string() });
        }
    }

    fn schedule_notice_clear(&self) {
        let epoch = self.notice_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let epochs = Arc::clone(&self.notice_epoch);
        let inner = Arc::clone(&self.inner);
        let events_tx = self.events_tx.clone();
        let ttl = self.timing.notice_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            // a newer notice owns the timer now
            if epochs.load(Ordering::SeqCst) != epoch {
                return;
            }
            inner.lock().await.notice.clear();
            let _ = events_tx.send(SessionEvent::NoticeChanged { notice: String::new() });
        });
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events_tx.send(event);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
