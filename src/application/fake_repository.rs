// In-memory repository used by the service tests
use crate::application::analytics_repository::{AnalyticsRepository, RepositoryError};
use crate::domain::dashboard::DashboardData;
use crate::domain::overview::Overview;
use crate::domain::query::QueryResult;
use crate::domain::table::{Record, RecordPage, TableKind};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
pub struct FakeRepository {
    pub overview: Option<Overview>,
    pub dashboard: Option<DashboardData>,
    pub records: Option<Vec<Record>>,
    pub query_result: Option<QueryResult>,
    pub fail_queries: AtomicBool,
    /// When set, `run_query` waits for a notification before answering.
    pub query_gate: Option<Arc<Notify>>,
    pub record_calls: Mutex<Vec<(TableKind, u32, u64)>>,
}

fn unavailable(endpoint: &str) -> RepositoryError {
    RepositoryError::Status {
        endpoint: endpoint.to_string(),
        status: 503,
    }
}

#[async_trait]
impl AnalyticsRepository for FakeRepository {
    async fn overview(&self) -> Result<Overview, RepositoryError> {
        self.overview.clone().ok_or_else(|| unavailable("/data/overview"))
    }

    async fn dashboard(&self) -> Result<DashboardData, RepositoryError> {
        self.dashboard
            .clone()
            .ok_or_else(|| unavailable("/analytics/dashboard"))
    }

    async fn records(
        &self,
        kind: TableKind,
        limit: u32,
        offset: u64,
    ) -> Result<RecordPage, RepositoryError> {
        self.record_calls.lock().unwrap().push((kind, limit, offset));

        let all = self
            .records
            .as_ref()
            .ok_or_else(|| unavailable("/data/records"))?;
        let data = all
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok(RecordPage {
            data,
            total: all.len() as u64,
        })
    }

    async fn run_query(&self, _query: &str) -> Result<QueryResult, RepositoryError> {
        if let Some(gate) = &self.query_gate {
            gate.notified().await;
        }

        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(unavailable("/analytics/query"));
        }

        self.query_result
            .clone()
            .ok_or_else(|| unavailable("/analytics/query"))
    }
}
