// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::query_service::QueryService;
use crate::application::session_store::SessionStore;
use crate::application::streaming_service::StreamingDashboardService;
use crate::application::table_service::TableService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub streaming_service: StreamingDashboardService,
    pub query_service: QueryService,
    pub table_service: TableService,
    pub sessions: Arc<SessionStore>,
}
