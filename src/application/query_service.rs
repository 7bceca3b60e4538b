// Query service - natural-language query submission and per-session history
use crate::application::analytics_repository::{AnalyticsRepository, RepositoryError};
use crate::application::session_store::SessionStore;
use crate::domain::notice::{Notice, NoticeKind};
use crate::domain::query::{QueryHistoryEntry, SUGGESTED_QUERIES};
use crate::domain::visualization::{resolve, RenderableOutcome};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query is empty")]
    EmptyQuery,

    #[error("a query is already being processed for this session")]
    InFlight,

    #[error("Failed to process query. Please try again.")]
    Failed(#[source] RepositoryError),
}

/// History entry as displayed: the stored result plus its resolved visualization.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntryView {
    pub query: String,
    pub query_interpretation: String,
    pub insights: Vec<String>,
    pub visualization: RenderableOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    pub submitted_at_ms: i64,
}

impl HistoryEntryView {
    fn from_entry(entry: &QueryHistoryEntry) -> Self {
        // Resolved on every read; chart points are never stored
        let visualization = resolve(&entry.result);
        let notice = NoticeKind::from_outcome(&visualization).map(Notice::from);

        Self {
            query: entry.query.clone(),
            query_interpretation: entry.result.query_interpretation.clone(),
            insights: entry.result.insights.clone(),
            visualization,
            notice,
            submitted_at_ms: entry.submitted_at_ms,
        }
    }
}

/// Clears the session's in-flight flag even if the submitting future is dropped.
struct InFlightGuard<'a> {
    sessions: &'a SessionStore,
    session_id: &'a str,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.sessions
            .with_session(self.session_id, |s| s.query_in_flight = false);
    }
}

#[derive(Clone)]
pub struct QueryService {
    repository: Arc<dyn AnalyticsRepository>,
    sessions: Arc<SessionStore>,
}

impl QueryService {
    pub fn new(repository: Arc<dyn AnalyticsRepository>, sessions: Arc<SessionStore>) -> Self {
        Self {
            repository,
            sessions,
        }
    }

    pub fn suggestions(&self) -> &'static [&'static str] {
        &SUGGESTED_QUERIES
    }

    /// Submit one query. On success the entry is appended to the session
    /// history; on failure the history is left untouched.
    pub async fn submit(&self, session_id: &str, query: &str) -> Result<HistoryEntryView, QueryError> {
        if query.trim().is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        let acquired = self.sessions.with_session(session_id, |s| {
            if s.query_in_flight {
                false
            } else {
                s.query_in_flight = true;
                true
            }
        });
        if !acquired {
            tracing::debug!("Rejecting query for session {}: request in flight", session_id);
            return Err(QueryError::InFlight);
        }
        let _guard = InFlightGuard {
            sessions: &self.sessions,
            session_id,
        };

        let result = match self.repository.run_query(query).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Query failed for session {}: {}", session_id, e);
                return Err(QueryError::Failed(e));
            }
        };

        let entry = QueryHistoryEntry::new(
            query.to_string(),
            result,
            chrono::Utc::now().timestamp_millis(),
        );
        let view = HistoryEntryView::from_entry(&entry);
        self.sessions.with_session(session_id, |s| s.history.push(entry));

        tracing::debug!(
            "Query for session {} resolved as {:?}",
            session_id,
            view.notice.as_ref().map(|n| n.code)
        );
        Ok(view)
    }

    /// History in display order (most recent first).
    pub fn history(&self, session_id: &str) -> Vec<HistoryEntryView> {
        self.sessions.read_session(session_id, |s| {
            s.map(|s| {
                s.history
                    .most_recent_first()
                    .map(HistoryEntryView::from_entry)
                    .collect()
            })
            .unwrap_or_default()
        })
    }

    pub fn is_in_flight(&self, session_id: &str) -> bool {
        self.sessions
            .read_session(session_id, |s| s.is_some_and(|s| s.query_in_flight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fake_repository::FakeRepository;
    use crate::domain::query::QueryResult;
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use tokio::sync::Notify;

    fn bar_result() -> QueryResult {
        let mut result = QueryResult::new(
            Some(json!({"labels": ["Super Premium Wireless Headphones"], "values": [42]})),
            "bar",
        );
        result.query_interpretation = "Analyzing products with ranking approach".into();
        result.insights = vec!["Top product: headphones".into()];
        result
    }

    fn service(repository: FakeRepository) -> QueryService {
        QueryService::new(Arc::new(repository), Arc::new(SessionStore::default()))
    }

    #[tokio::test]
    async fn test_submit_appends_history() {
        let service = service(FakeRepository {
            query_result: Some(bar_result()),
            ..FakeRepository::default()
        });

        let first = service.submit("s1", "top products").await.unwrap();
        assert!(first.notice.is_none());
        let RenderableOutcome::BarChart { points } = &first.visualization else {
            panic!("expected bar chart");
        };
        assert_eq!(points[0].label, "Super Premium W...");

        service.submit("s1", "top products again").await.unwrap();

        let history = service.history("s1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].query, "top products again");
        assert_eq!(history[1].query, "top products");
        assert_eq!(history[1].query_interpretation, "Analyzing products with ranking approach");
        assert!(service.history("s2").is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let service = service(FakeRepository {
            query_result: Some(bar_result()),
            ..FakeRepository::default()
        });

        assert!(matches!(service.submit("s1", "   \n").await, Err(QueryError::EmptyQuery)));
        assert!(service.history("s1").is_empty());
    }

    #[test]
    fn test_history_reads_do_not_grow_sessions() {
        let sessions = Arc::new(SessionStore::default());
        let service = QueryService::new(Arc::new(FakeRepository::default()), sessions.clone());

        for i in 0..10_000 {
            let session_id = format!("visitor-{}", i);
            assert!(service.history(&session_id).is_empty());
            assert!(!service.is_in_flight(&session_id));
        }
        assert_eq!(sessions.session_count(), 0);
    }

    #[test]
    fn test_suggestions() {
        let service = service(FakeRepository::default());
        let queries = service.suggestions();
        assert_eq!(queries.len(), 8);
        assert!(queries.iter().all(|q| !q.trim().is_empty()));
    }

    #[tokio::test]
    async fn test_failure_leaves_history_untouched() {
        let repository = FakeRepository {
            query_result: Some(bar_result()),
            ..FakeRepository::default()
        };
        repository.fail_queries.store(true, Ordering::SeqCst);
        let repository = Arc::new(repository);
        let service = QueryService::new(repository.clone(), Arc::new(SessionStore::default()));

        let err = service.submit("s1", "revenue trend").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to process query. Please try again.");
        assert!(service.history("s1").is_empty());
        assert!(!service.is_in_flight("s1"));

        // resubmission is allowed after a failure
        repository.fail_queries.store(false, Ordering::SeqCst);
        assert!(service.submit("s1", "revenue trend").await.is_ok());
        assert_eq!(service.history("s1").len(), 1);
    }

    #[tokio::test]
    async fn test_single_submission_in_flight() {
        let gate = Arc::new(Notify::new());
        let service = service(FakeRepository {
            query_result: Some(bar_result()),
            query_gate: Some(gate.clone()),
            ..FakeRepository::default()
        });

        let pending = {
            let service = service.clone();
            tokio::spawn(async move { service.submit("s1", "first").await })
        };
        while !service.is_in_flight("s1") {
            tokio::task::yield_now().await;
        }

        assert!(matches!(service.submit("s1", "second").await, Err(QueryError::InFlight)));

        gate.notify_one();
        assert!(pending.await.unwrap().is_ok());
        assert!(!service.is_in_flight("s1"));
        assert_eq!(service.history("s1").len(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_result_is_kept_with_notice() {
        let service = service(FakeRepository {
            query_result: Some(QueryResult::new(Some(json!({"points": [1, 2]})), "scatter")),
            ..FakeRepository::default()
        });

        let view = service.submit("s1", "scatter please").await.unwrap();
        assert_eq!(view.notice.unwrap().message, "Unsupported visualization type: scatter");
        assert_eq!(service.history("s1").len(), 1);
    }
}
