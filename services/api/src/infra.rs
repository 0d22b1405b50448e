use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use stress_check::workflows::assessment::{
    AlertError, AlertPublisher, AssessmentSession, OperatorAlert, ResponseRecord, ResponseStore,
    SessionId, SessionRepository, SessionRepositoryError, StoreError, StressLevel,
};
use stress_check::workflows::assessment::store::format_timestamp;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Sessions untouched for this long are dropped, finished or not.
pub(crate) const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

struct StoredSession {
    session: AssessmentSession,
    touched_at: Instant,
}

#[derive(Clone)]
pub(crate) struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<SessionId, StoredSession>>>,
    idle_timeout: Duration,
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::with_idle_timeout(SESSION_IDLE_TIMEOUT)
    }
}

impl InMemorySessionRepository {
    pub(crate) fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, StoredSession>>, SessionRepositoryError> {
        self.sessions
            .lock()
            .map_err(|_| SessionRepositoryError::Unavailable("session mutex poisoned".to_string()))
    }

    /// Drop sessions idle at `now`; returns how many were removed.
    pub(crate) fn evict_idle(&self, now: Instant) -> Result<usize, SessionRepositoryError> {
        let mut guard = self.lock()?;
        let before = guard.len();
        guard.retain(|_, stored| now.saturating_duration_since(stored.touched_at) < self.idle_timeout);
        let evicted = before - guard.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = guard.len(), "evicted idle sessions");
        }
        Ok(evicted)
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, id: SessionId, session: AssessmentSession) -> Result<(), SessionRepositoryError> {
        let now = Instant::now();
        self.evict_idle(now)?;
        let mut guard = self.lock()?;
        if guard.contains_key(&id) {
            return Err(SessionRepositoryError::Conflict);
        }
        guard.insert(
            id,
            StoredSession {
                session,
                touched_at: now,
            },
        );
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<AssessmentSession>, SessionRepositoryError> {
        let mut guard = self.lock()?;
        Ok(guard.get_mut(id).map(|stored| {
            stored.touched_at = Instant::now();
            stored.session.clone()
        }))
    }

    fn modify<T, F>(&self, id: &SessionId, apply: F) -> Result<Option<T>, SessionRepositoryError>
    where
        F: FnOnce(&mut AssessmentSession) -> T,
    {
        let mut guard = self.lock()?;
        Ok(guard.get_mut(id).map(|stored| {
            stored.touched_at = Instant::now();
            apply(&mut stored.session)
        }))
    }
}

/// Keeps operator alerts in memory and mirrors each one to the log.
#[derive(Default, Clone)]
pub(crate) struct LoggingAlertPublisher {
    events: Arc<Mutex<Vec<OperatorAlert>>>,
}

impl AlertPublisher for LoggingAlertPublisher {
    fn publish(&self, alert: OperatorAlert) -> Result<(), AlertError> {
        tracing::error!(
            kind = %alert.kind,
            session_id = %alert.session_id,
            details = ?alert.details,
            "operator alert"
        );
        let mut guard = self
            .events
            .lock()
            .map_err(|_| AlertError::Transport("alert mutex poisoned".to_string()))?;
        guard.push(alert);
        Ok(())
    }
}

impl LoggingAlertPublisher {
    #[cfg(test)]
    pub(crate) fn events(&self) -> Vec<OperatorAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

/// Volatile response table for the scripted demo.
#[derive(Default, Clone)]
pub(crate) struct InMemoryResponseStore {
    records: Arc<Mutex<Vec<ResponseRecord>>>,
}

impl ResponseStore for InMemoryResponseStore {
    fn append(&self, score: u32, level: StressLevel) -> Result<ResponseRecord, StoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("response mutex poisoned".to_string()))?;
        let record = ResponseRecord {
            id: guard.len() as u64 + 1,
            timestamp: format_timestamp(chrono::Local::now().naive_local()),
            score,
            level,
        };
        guard.push(record.clone());
        Ok(record)
    }

    fn list_all(&self) -> Result<Vec<ResponseRecord>, StoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("response mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn session_repository_rejects_duplicates_and_unknown_ids() {
        let repository = InMemorySessionRepository::default();
        let id = SessionId("abc".to_string());
        repository
            .insert(id.clone(), AssessmentSession::default())
            .expect("insert");
        assert!(matches!(
            repository.insert(id.clone(), AssessmentSession::default()),
            Err(SessionRepositoryError::Conflict)
        ));
        let missing = repository
            .modify(&SessionId("other".to_string()), |session| session.current_index())
            .expect("modify");
        assert!(missing.is_none());
        assert!(repository.fetch(&id).expect("fetch").is_some());
    }

    #[test]
    fn idle_sessions_are_evicted_and_recent_ones_kept() {
        let timeout = Duration::from_secs(60);
        let repository = InMemorySessionRepository::with_idle_timeout(timeout);
        let stale = SessionId("stale".to_string());
        let fresh = SessionId("fresh".to_string());
        repository
            .insert(stale.clone(), AssessmentSession::default())
            .expect("insert");
        repository
            .insert(fresh.clone(), AssessmentSession::default())
            .expect("insert");

        assert_eq!(repository.evict_idle(Instant::now()).expect("evict"), 0);

        let later = Instant::now() + timeout;
        repository.sessions.lock().expect("lock").get_mut(&fresh).expect("stored").touched_at =
            later;
        assert_eq!(repository.evict_idle(later).expect("evict"), 1);
        assert!(repository.fetch(&stale).expect("fetch").is_none());
        assert!(repository.fetch(&fresh).expect("fetch").is_some());
    }

    #[test]
    fn inserting_sweeps_sessions_past_the_idle_timeout() {
        let repository = InMemorySessionRepository::with_idle_timeout(Duration::ZERO);
        repository
            .insert(SessionId("first".to_string()), AssessmentSession::default())
            .expect("insert");
        repository
            .insert(SessionId("second".to_string()), AssessmentSession::default())
            .expect("insert");
        assert_eq!(repository.sessions.lock().expect("lock").len(), 1);
    }

    #[test]
    fn alert_publisher_retains_events() {
        let alerts = LoggingAlertPublisher::default();
        alerts
            .publish(OperatorAlert {
                kind: "persistence_failure".to_string(),
                session_id: SessionId("abc".to_string()),
                details: BTreeMap::new(),
            })
            .expect("publish");
        assert_eq!(alerts.events().len(), 1);
    }

    #[test]
    fn in_memory_store_numbers_records_from_one() {
        let store = InMemoryResponseStore::default();
        let first = store.append(10, StressLevel::Low).expect("append");
        let second = store.append(44, StressLevel::High).expect("append");
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(store.list_all().expect("list").len(), 2);
    }
}
