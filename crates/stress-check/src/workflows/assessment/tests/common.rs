use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::workflows::assessment::domain::{SessionId, StressLevel};
use crate::workflows::assessment::repository::{
    AlertError, AlertPublisher, OperatorAlert, SessionRepository, SessionRepositoryError,
};
use crate::workflows::assessment::session::AssessmentSession;
use crate::workflows::assessment::store::{
    format_timestamp, ResponseRecord, ResponseStore, StoreError,
};
use crate::workflows::assessment::{assessment_router, AssessmentService};

pub(super) const NEVER: &str = "কখনই না";
pub(super) const RARELY: &str = "অনেকাংশে না";
pub(super) const SOMETIMES: &str = "মাঝে মাঝে";
pub(super) const OFTEN: &str = "প্রায়শই";
pub(super) const VERY_OFTEN: &str = "ঘন ঘন";

pub(super) fn morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .expect("valid date")
        .and_hms_opt(9, 15, 0)
        .expect("valid time")
}

/// Six distress answers followed by four coping answers that all score 1.
pub(super) fn lowest_answers() -> Vec<&'static str> {
    let mut answers = vec![NEVER; 6];
    answers.extend([VERY_OFTEN; 4]);
    answers
}

/// Every answer scoring 5.
pub(super) fn highest_answers() -> Vec<&'static str> {
    let mut answers = vec![VERY_OFTEN; 6];
    answers.extend([NEVER; 4]);
    answers
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    records: Arc<Mutex<Vec<ResponseRecord>>>,
}

impl ResponseStore for MemoryStore {
    fn append(&self, score: u32, level: StressLevel) -> Result<ResponseRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let record = ResponseRecord {
            id: guard.len() as u64 + 1,
            timestamp: format_timestamp(morning()),
            score,
            level,
        };
        guard.push(record.clone());
        Ok(record)
    }

    fn list_all(&self) -> Result<Vec<ResponseRecord>, StoreError> {
        Ok(self.records.lock().expect("store mutex poisoned").clone())
    }
}

pub(super) struct FailingStore;

impl ResponseStore for FailingStore {
    fn append(&self, _score: u32, _level: StressLevel) -> Result<ResponseRecord, StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }

    fn list_all(&self) -> Result<Vec<ResponseRecord>, StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySessions {
    sessions: Arc<Mutex<HashMap<SessionId, AssessmentSession>>>,
}

impl MemorySessions {
    pub(super) fn get(&self, id: &SessionId) -> Option<AssessmentSession> {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .get(id)
            .cloned()
    }
}

impl SessionRepository for MemorySessions {
    fn insert(&self, id: SessionId, session: AssessmentSession) -> Result<(), SessionRepositoryError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(&id) {
            return Err(SessionRepositoryError::Conflict);
        }
        guard.insert(id, session);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<AssessmentSession>, SessionRepositoryError> {
        Ok(self.get(id))
    }

    fn modify<T, F>(&self, id: &SessionId, apply: F) -> Result<Option<T>, SessionRepositoryError>
    where
        F: FnOnce(&mut AssessmentSession) -> T,
    {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get_mut(id).map(apply))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAlerts {
    events: Arc<Mutex<Vec<OperatorAlert>>>,
}

impl MemoryAlerts {
    pub(super) fn events(&self) -> Vec<OperatorAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl AlertPublisher for MemoryAlerts {
    fn publish(&self, alert: OperatorAlert) -> Result<(), AlertError> {
        self.events.lock().expect("alert mutex poisoned").push(alert);
        Ok(())
    }
}

pub(super) type MemoryService = AssessmentService<MemoryStore, MemorySessions, MemoryAlerts>;

pub(super) fn build_service() -> (MemoryService, MemoryStore, MemorySessions, MemoryAlerts) {
    let store = MemoryStore::default();
    let sessions = MemorySessions::default();
    let alerts = MemoryAlerts::default();
    let service = AssessmentService::new(
        Arc::new(store.clone()),
        Arc::new(sessions.clone()),
        Arc::new(alerts.clone()),
    );
    (service, store, sessions, alerts)
}

pub(super) fn build_failing_service() -> (
    AssessmentService<FailingStore, MemorySessions, MemoryAlerts>,
    MemoryAlerts,
) {
    let alerts = MemoryAlerts::default();
    let service = AssessmentService::new(
        Arc::new(FailingStore),
        Arc::new(MemorySessions::default()),
        Arc::new(alerts.clone()),
    );
    (service, alerts)
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
