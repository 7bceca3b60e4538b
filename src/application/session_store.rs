// In-memory dashboard sessions: query history, in-flight flag and table state
use crate::domain::query::QueryHistory;
use crate::domain::table::{PaginationState, TableKind};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug)]
pub struct DashboardSession {
    pub history: QueryHistory,
    pub query_in_flight: bool,
    pub tables: HashMap<TableKind, PaginationState>,
    last_seen: Instant,
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self {
            history: QueryHistory::default(),
            query_in_flight: false,
            tables: HashMap::new(),
            last_seen: Instant::now(),
        }
    }
}

impl DashboardSession {
    pub fn table_state(&mut self, kind: TableKind) -> &mut PaginationState {
        self.tables.entry(kind).or_default()
    }
}

/// Sessions are created by the first state change and expire once idle for
/// longer than the TTL. The lock is never held across an await point.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, DashboardSession>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Run `f` against the session, creating it on first use. Idle sessions
    /// are swept first; one with a query in flight is always kept.
    pub fn with_session<R>(&self, session_id: &str, f: impl FnOnce(&mut DashboardSession) -> R) -> R {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let ttl = self.ttl;
        sessions.retain(|_, s| s.query_in_flight || now.duration_since(s.last_seen) < ttl);

        let session = sessions.entry(session_id.to_string()).or_default();
        session.last_seen = now;
        f(session)
    }

    /// Read-only lookup. Unknown or expired sessions are passed as `None` and
    /// nothing is inserted.
    pub fn read_session<R>(&self, session_id: &str, f: impl FnOnce(Option<&DashboardSession>) -> R) -> R {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let session = sessions
            .get(session_id)
            .filter(|s| s.query_in_flight || s.last_seen.elapsed() < self.ttl);
        f(session)
    }

    /// Drop the session and everything it holds. Returns whether it existed.
    pub fn end_session(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.remove(session_id).is_some()
    }

    #[cfg(test)]
    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::default();
        store.with_session("a", |s| s.table_state(TableKind::Orders).set_page(4));

        let page_a = store.with_session("a", |s| s.table_state(TableKind::Orders).page());
        let page_b = store.with_session("b", |s| s.table_state(TableKind::Orders).page());
        assert_eq!(page_a, 4);
        assert_eq!(page_b, 0);
    }

    #[test]
    fn test_reads_do_not_create_sessions() {
        let store = SessionStore::default();
        store.with_session("known", |s| s.query_in_flight = false);

        for i in 0..1_000 {
            let found = store.read_session(&format!("unknown-{}", i), |s| s.is_some());
            assert!(!found);
        }
        assert!(store.read_session("known", |s| s.is_some()));
        assert_eq!(store.session_count(), 1);
    }

    #[test]
    fn test_idle_sessions_expire() {
        let store = SessionStore::with_ttl(Duration::ZERO);
        store.with_session("idle", |s| s.table_state(TableKind::Orders).set_page(2));
        store.with_session("busy", |s| s.query_in_flight = true);

        store.with_session("fresh", |_| ());
        assert!(!store.read_session("idle", |s| s.is_some()));
        assert!(store.read_session("busy", |s| s.is_some()));
        assert_eq!(store.session_count(), 2);
    }

    #[test]
    fn test_end_session() {
        let store = SessionStore::default();
        store.with_session("a", |s| s.query_in_flight = false);

        assert!(store.end_session("a"));
        assert!(!store.end_session("a"));
        assert_eq!(store.session_count(), 0);
    }
}
