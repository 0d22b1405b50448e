use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{error, info};

use super::domain::{AssessmentOutcome, SessionId};
use super::question_bank::QuestionBank;
use super::repository::{
    AlertPublisher, OperatorAlert, SessionRepository, SessionRepositoryError,
};
use super::session::{AnswerProgress, AssessmentError, AssessmentSession};
use super::store::{ResponseRecord, ResponseStore, StoreError};
use super::view::SessionView;

/// Service hosting respondent sessions and persisting completed assessments.
pub struct AssessmentService<S, R, A> {
    bank: QuestionBank,
    store: Arc<S>,
    sessions: Arc<R>,
    alerts: Arc<A>,
}

impl<S, R, A> AssessmentService<S, R, A>
where
    S: ResponseStore + 'static,
    R: SessionRepository + 'static,
    A: AlertPublisher + 'static,
{
    pub fn new(store: Arc<S>, sessions: Arc<R>, alerts: Arc<A>) -> Self {
        Self::with_bank(QuestionBank::standard(), store, sessions, alerts)
    }

    pub fn with_bank(bank: QuestionBank, store: Arc<S>, sessions: Arc<R>, alerts: Arc<A>) -> Self {
        Self {
            bank,
            store,
            sessions,
            alerts,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Open a new session and greet the respondent.
    pub fn start(&self, now: NaiveDateTime) -> Result<SessionView, AssessmentServiceError> {
        let id = SessionId::generate();
        let session = AssessmentSession::begin(now);
        let view = SessionView::render(&id, &session, &self.bank);
        self.sessions.insert(id.clone(), session)?;
        info!(session_id = %id, "assessment session started");
        Ok(view)
    }

    pub fn view(&self, id: &SessionId) -> Result<SessionView, AssessmentServiceError> {
        let session = self.load(id)?;
        Ok(SessionView::render(id, &session, &self.bank))
    }

    /// Apply one answer. Only the call that completes the session persists its result.
    pub fn answer(
        &self,
        id: &SessionId,
        label: &str,
    ) -> Result<SessionView, AssessmentServiceError> {
        let (progress, session) = self
            .sessions
            .modify(id, |session| {
                session
                    .submit_answer(&self.bank, label)
                    .map(|progress| (progress, session.clone()))
            })?
            .ok_or_else(|| AssessmentServiceError::SessionNotFound(id.clone()))??;

        match progress {
            AnswerProgress::Advanced { next_index } => {
                info!(session_id = %id, step = next_index, "answer recorded");
            }
            AnswerProgress::Completed(outcome) => {
                info!(
                    session_id = %id,
                    total = outcome.total,
                    level = %outcome.level,
                    "assessment complete"
                );
                self.persist(id, &outcome);
            }
        }

        Ok(SessionView::render(id, &session, &self.bank))
    }

    /// Clear the session and greet again. Persisted records are untouched.
    pub fn restart(
        &self,
        id: &SessionId,
        now: NaiveDateTime,
    ) -> Result<SessionView, AssessmentServiceError> {
        let session = self
            .sessions
            .modify(id, |session| {
                session.restart();
                session.start(now);
                session.clone()
            })?
            .ok_or_else(|| AssessmentServiceError::SessionNotFound(id.clone()))?;
        info!(session_id = %id, "assessment session restarted");
        Ok(SessionView::render(id, &session, &self.bank))
    }

    pub fn responses(&self) -> Result<Vec<ResponseRecord>, AssessmentServiceError> {
        Ok(self.store.list_all()?)
    }

    fn load(&self, id: &SessionId) -> Result<AssessmentSession, AssessmentServiceError> {
        self.sessions
            .fetch(id)?
            .ok_or_else(|| AssessmentServiceError::SessionNotFound(id.clone()))
    }

    /// The respondent still sees the result when this fails; operators get the alert.
    fn persist(&self, id: &SessionId, outcome: &AssessmentOutcome) {
        match self.store.append(outcome.total, outcome.level) {
            Ok(record) => {
                info!(session_id = %id, record_id = record.id, "assessment persisted");
            }
            Err(err) => {
                error!(
                    session_id = %id,
                    total = outcome.total,
                    level = %outcome.level,
                    error = %err,
                    "failed to persist completed assessment"
                );
                if let Err(alert_err) = self.alerts.publish(persistence_alert(id, outcome, &err)) {
                    error!(session_id = %id, error = %alert_err, "operator alert dropped");
                }
            }
        }
    }
}

fn persistence_alert(id: &SessionId, outcome: &AssessmentOutcome, err: &StoreError) -> OperatorAlert {
    let mut details = BTreeMap::new();
    details.insert("score".to_string(), outcome.total.to_string());
    details.insert("level".to_string(), outcome.level.label().to_string());
    details.insert("error".to_string(), err.to_string());
    OperatorAlert {
        kind: PERSISTENCE_FAILURE.to_string(),
        session_id: id.clone(),
        details,
    }
}

pub const PERSISTENCE_FAILURE: &str = "persistence_failure";

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("session {0} not found")]
    SessionNotFound(SessionId),
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Sessions(#[from] SessionRepositoryError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
