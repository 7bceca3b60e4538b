// HTTP request handlers
use crate::application::query_service::HistoryEntryView;
use crate::application::table_service::TableUpdate;
use crate::domain::table::TableKind;
use crate::infrastructure::chunked_stream::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct QueryBody {
    pub query: String,
}

#[derive(Serialize)]
struct HistoryResponse {
    entries: Vec<HistoryEntryView>,
    /// Submission is disabled while this is set
    in_flight: bool,
}

#[derive(Serialize)]
struct Suggestions {
    queries: &'static [&'static str],
}

async fn respond<T: Serialize>(data: &T, headers: &HeaderMap) -> Response {
    match json_response(StatusCode::OK, data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

fn parse_kind(kind: &str) -> Result<TableKind, ApiError> {
    kind.parse().map_err(ApiError::UnknownTable)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Headline metric cards
pub async fn overview(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let view = state.dashboard_service.overview().await;
    respond(&view, &headers).await
}

/// All dashboard panels in one response
pub async fn dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let panels = state.dashboard_service.panels().await;
    respond(&panels, &headers).await
}

/// Progressive dashboard: skeleton, then each section as it resolves
pub async fn stream_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let rx = state.streaming_service.stream_dashboard();
    stream_from_receiver(rx, accepts_brotli(&headers)).await
}

pub async fn query_suggestions(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let body = Suggestions {
        queries: state.query_service.suggestions(),
    };
    respond(&body, &headers).await
}

pub async fn query_history(
    Path(session_id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let body = HistoryResponse {
        entries: state.query_service.history(&session_id),
        in_flight: state.query_service.is_in_flight(&session_id),
    };
    respond(&body, &headers).await
}

pub async fn submit_query(
    Path(session_id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(body): Json<QueryBody>,
) -> Result<Response, ApiError> {
    let entry = state.query_service.submit(&session_id, &body.query).await?;
    Ok(respond(&entry, &headers).await)
}

pub async fn table_view(
    Path((session_id, kind)): Path<(String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let kind = parse_kind(&kind)?;
    let view = state.table_service.view(&session_id, kind).await;
    Ok(respond(&view, &headers).await)
}

pub async fn update_table(
    Path((session_id, kind)): Path<(String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(update): Json<TableUpdate>,
) -> Result<Response, ApiError> {
    let kind = parse_kind(&kind)?;
    let view = state.table_service.update(&session_id, kind, update).await?;
    Ok(respond(&view, &headers).await)
}

/// Ends the dashboard session, dropping its history and table state
pub async fn end_session(
    Path(session_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> StatusCode {
    if state.sessions.end_session(&session_id) {
        tracing::debug!("Ended session {}", session_id);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
