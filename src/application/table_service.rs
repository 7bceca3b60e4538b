// Table service - paginated record tables with client-side search
use crate::application::analytics_repository::AnalyticsRepository;
use crate::application::session_store::SessionStore;
use crate::domain::notice::{Notice, NoticeKind};
use crate::domain::table::{table_title, DisplayRow, PaginationState, TableKind, PAGE_SIZES};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("page size {0} is not one of 5, 10, 25, 50")]
    InvalidPageSize(u32),
}

/// Requested state transitions. The page size is applied before the page so
/// that a combined update lands on the requested page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableUpdate {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub kind: TableKind,
    pub title: String,
    pub headers: [&'static str; 6],
    pub rows: Vec<DisplayRow>,
    /// Total reported by the API; unaffected by search.
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub page_sizes: [u32; 4],
    pub search_term: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Clone)]
pub struct TableService {
    repository: Arc<dyn AnalyticsRepository>,
    sessions: Arc<SessionStore>,
}

impl TableService {
    pub fn new(repository: Arc<dyn AnalyticsRepository>, sessions: Arc<SessionStore>) -> Self {
        Self {
            repository,
            sessions,
        }
    }

    /// Current page for the session's table state.
    pub async fn view(&self, session_id: &str, kind: TableKind) -> TableView {
        let state = self.sessions.read_session(session_id, |s| {
            s.and_then(|s| s.tables.get(&kind).cloned())
                .unwrap_or_default()
        });
        self.load(kind, &state).await
    }

    /// Apply state transitions, then load the resulting page.
    pub async fn update(
        &self,
        session_id: &str,
        kind: TableKind,
        update: TableUpdate,
    ) -> Result<TableView, TableError> {
        let state = self.sessions.with_session(session_id, |s| {
            let state = s.table_state(kind);
            if let Some(page_size) = update.page_size {
                state
                    .set_page_size(page_size)
                    .map_err(TableError::InvalidPageSize)?;
            }
            if let Some(page) = update.page {
                state.set_page(page);
            }
            if let Some(search) = update.search {
                state.set_search_term(search);
            }
            Ok(state.clone())
        })?;

        Ok(self.load(kind, &state).await)
    }

    /// Fetch `limit = page_size, offset = page * page_size` and filter the
    /// loaded rows by the search term.
    pub async fn load(&self, kind: TableKind, state: &PaginationState) -> TableView {
        tracing::debug!(
            "Loading {} page {} (size {})",
            kind.as_str(),
            state.page(),
            state.page_size()
        );

        let (rows, total, notice) = match self
            .repository
            .records(kind, state.limit(), state.offset())
            .await
        {
            Ok(page) => {
                let rows = state
                    .filter(kind, &page.data)
                    .into_iter()
                    .map(|r| kind.display_row(r))
                    .collect();
                (rows, page.total, None)
            }
            Err(e) => {
                tracing::warn!("Error fetching {} page: {}", kind.as_str(), e);
                (
                    Vec::new(),
                    0,
                    Some(Notice::from(NoticeKind::load_failure(kind.as_str()))),
                )
            }
        };

        TableView {
            kind,
            title: table_title(kind, total),
            headers: kind.headers(),
            rows,
            total,
            page: state.page(),
            page_size: state.page_size(),
            page_sizes: PAGE_SIZES,
            search_term: state.search_term().to_string(),
            notice,
        }
    }
}
