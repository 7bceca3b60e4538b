// Repository trait for the remote analytics API
use crate::domain::dashboard::DashboardData;
use crate::domain::overview::Overview;
use crate::domain::query::QueryResult;
use crate::domain::table::{RecordPage, TableKind};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },

    #[error("failed to decode {endpoint} response: {message}")]
    Decode { endpoint: String, message: String },
}

#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Headline totals (`GET /data/overview`)
    async fn overview(&self) -> Result<Overview, RepositoryError>;

    /// The four pre-aggregated dashboard sections (`GET /analytics/dashboard`)
    async fn dashboard(&self) -> Result<DashboardData, RepositoryError>;

    /// One page of raw records (`GET /data/{kind}?limit=&offset=`)
    async fn records(
        &self,
        kind: TableKind,
        limit: u32,
        offset: u64,
    ) -> Result<RecordPage, RepositoryError>;

    /// Natural-language query (`POST /analytics/query`)
    async fn run_query(&self, query: &str) -> Result<QueryResult, RepositoryError>;
}
