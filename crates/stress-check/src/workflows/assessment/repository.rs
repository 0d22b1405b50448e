use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::SessionId;
use super::session::AssessmentSession;

/// Storage for in-flight sessions; the hosting layer decides their lifetime.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, id: SessionId, session: AssessmentSession) -> Result<(), SessionRepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<AssessmentSession>, SessionRepositoryError>;

    /// Run `apply` on the stored session with exclusive access, so concurrent
    /// answers to one session are applied one after another. `None` means the
    /// session is unknown.
    fn modify<T, F>(&self, id: &SessionId, apply: F) -> Result<Option<T>, SessionRepositoryError>
    where
        F: FnOnce(&mut AssessmentSession) -> T;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionRepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("session storage unavailable: {0}")]
    Unavailable(String),
}

/// Operator-facing channel for results that could not be persisted.
pub trait AlertPublisher: Send + Sync {
    fn publish(&self, alert: OperatorAlert) -> Result<(), AlertError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorAlert {
    pub kind: String,
    pub session_id: SessionId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}
