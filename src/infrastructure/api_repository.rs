// Analytics API repository implementation
use crate::application::analytics_repository::{AnalyticsRepository, RepositoryError};
use crate::domain::dashboard::DashboardData;
use crate::domain::overview::Overview;
use crate::domain::query::QueryResult;
use crate::domain::table::{RecordPage, TableKind};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ApiRepository {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

impl ApiRepository {
    pub fn new(base_url: String, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_url(&self, path: &str, params: &[(&str, String)]) -> String {
        let query: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();

        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query.join("&"))
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, RepositoryError> {
        let url = self.build_url(path, params);
        tracing::debug!("GET {}", url);

        let request = self.client.get(&url).header("Accept", "application/json");
        self.execute(path, request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, RepositoryError> {
        let response = request
            .send()
            .await
            .map_err(|e| RepositoryError::Transport {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(RepositoryError::Status {
                endpoint: endpoint.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RepositoryError::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
    }
}

pub fn records_path(kind: TableKind) -> String {
    format!("/data/{}", kind.as_str())
}

#[async_trait]
impl AnalyticsRepository for ApiRepository {
    async fn overview(&self) -> Result<Overview, RepositoryError> {
        self.get_json("/data/overview", &[]).await
    }

    async fn dashboard(&self) -> Result<DashboardData, RepositoryError> {
        self.get_json("/analytics/dashboard", &[]).await
    }

    async fn records(
        &self,
        kind: TableKind,
        limit: u32,
        offset: u64,
    ) -> Result<RecordPage, RepositoryError> {
        let params = [("limit", limit.to_string()), ("offset", offset.to_string())];
        self.get_json(&records_path(kind), &params).await
    }

    async fn run_query(&self, query: &str) -> Result<QueryResult, RepositoryError> {
        let path = "/analytics/query";
        let url = self.build_url(path, &[]);
        tracing::debug!("POST {}", url);

        let request = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(&QueryRequest { query });
        self.execute(path, request).await
    }
}
