// HTTP error mapping for handler failures
use crate::application::query_service::QueryError;
use crate::application::table_service::TableError;
use crate::domain::notice::{Notice, NoticeKind};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    UnknownTable(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<Notice>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownTable(_) => StatusCode::NOT_FOUND,
            ApiError::Query(QueryError::EmptyQuery) => StatusCode::BAD_REQUEST,
            ApiError::Query(QueryError::InFlight) => StatusCode::CONFLICT,
            ApiError::Query(QueryError::Failed(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Table(TableError::InvalidPageSize(_)) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Only the network failure is rendered as an inline notice
        let notice = match &self {
            ApiError::Query(e @ QueryError::Failed(_)) => {
                Some(Notice::from(NoticeKind::NetworkFailure(e.to_string())))
            }
            _ => None,
        };

        let body = ErrorBody {
            error: self.to_string(),
            notice,
        };
        (status, Json(body)).into_response()
    }
}
