// Dashboard service - Use case for building the overview cards and analytics panels
use crate::application::analytics_repository::AnalyticsRepository;
use crate::domain::dashboard::{Panel, PanelId};
use crate::domain::notice::{Notice, NoticeKind};
use crate::domain::overview::MetricCard;
use crate::domain::visualization::RenderableOutcome;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct OverviewView {
    pub cards: Vec<MetricCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelView {
    pub id: PanelId,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<RenderableOutcome>,
    pub insights: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl From<Panel> for PanelView {
    fn from(panel: Panel) -> Self {
        Self {
            id: panel.id,
            title: panel.title,
            chart: Some(panel.chart),
            insights: panel.insights,
            notice: None,
        }
    }
}

impl PanelView {
    pub fn failed(id: PanelId) -> Self {
        Self {
            id,
            title: id.title(),
            chart: None,
            insights: Vec::new(),
            notice: Some(Notice::from(NoticeKind::load_failure("analytics"))),
        }
    }
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn AnalyticsRepository>,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn AnalyticsRepository>) -> Self {
        Self { repository }
    }

    pub async fn overview(&self) -> OverviewView {
        match self.repository.overview().await {
            Ok(overview) => OverviewView {
                cards: overview.cards(),
                notice: None,
            },
            Err(e) => {
                tracing::warn!("Error fetching overview: {}", e);
                OverviewView {
                    cards: Vec::new(),
                    notice: Some(Notice::from(NoticeKind::load_failure("overview"))),
                }
            }
        }
    }

    /// All four panels; a failed fetch yields a notice in every panel.
    pub async fn panels(&self) -> Vec<PanelView> {
        match self.repository.dashboard().await {
            Ok(data) => data.panels().into_iter().map(PanelView::from).collect(),
            Err(e) => {
                tracing::warn!("Error fetching dashboard panels: {}", e);
                PanelId::ALL.iter().map(|&id| PanelView::failed(id)).collect()
            }
        }
    }
}
