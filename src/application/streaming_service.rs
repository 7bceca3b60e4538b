// Streaming dashboard service - Progressive loading, one update per resolved slot
use crate::application::dashboard_service::{DashboardService, OverviewView, PanelView};
use crate::domain::dashboard::PanelId;
use serde::Serialize;
use std::time::Instant;
use tokio::sync::mpsc;

const OVERVIEW_SECTION: &str = "overview";

#[derive(Debug, Clone, Serialize)]
pub struct SectionSkeleton {
    pub id: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    Skeleton { sections: Vec<SectionSkeleton> },
    OverviewUpdate { overview: OverviewView },
    PanelUpdate { panel: PanelView },
    Complete { total_widgets: usize, duration_ms: i64 },
}

#[derive(Clone)]
pub struct StreamingDashboardService {
    dashboard: DashboardService,
    channel_capacity: usize,
}

impl StreamingDashboardService {
    pub fn new(dashboard: DashboardService, channel_capacity: usize) -> Self {
        Self {
            dashboard,
            channel_capacity: channel_capacity.max(1),
        }
    }

    pub fn stream_dashboard(&self) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let start_time = Instant::now();

        // 1. Skeleton goes out before any fetch starts; the channel is empty
        // and has capacity for it
        let skeleton = Self::build_skeleton();
        let total_widgets = skeleton.len();
        if let Err(e) = tx.try_send(StreamMessage::Skeleton { sections: skeleton }) {
            tracing::error!("Failed to queue dashboard skeleton: {}", e);
        }

        // 2. Overview cards and panels load independently; each owns its slot
        let overview_task = {
            let tx = tx.clone();
            let dashboard = self.dashboard.clone();
            tokio::spawn(async move {
                let overview = dashboard.overview().await;
                let _ = tx.send(StreamMessage::OverviewUpdate { overview }).await;
            })
        };

        let panels_task = {
            let tx = tx.clone();
            let dashboard = self.dashboard.clone();
            tokio::spawn(async move {
                for panel in dashboard.panels().await {
                    let _ = tx.send(StreamMessage::PanelUpdate { panel }).await;
                }
            })
        };

        // 3. Completion once every slot has been sent
        tokio::spawn(async move {
            for result in futures::future::join_all([overview_task, panels_task]).await {
                if let Err(e) = result {
                    tracing::error!("Dashboard stream task failed: {}", e);
                }
            }

            let duration_ms = start_time.elapsed().as_millis() as i64;
            tracing::debug!("Dashboard stream complete in {}ms", duration_ms);
            let _ = tx
                .send(StreamMessage::Complete {
                    total_widgets,
                    duration_ms,
                })
                .await;
        });

        rx
    }

    fn build_skeleton() -> Vec<SectionSkeleton> {
        let mut sections = vec![SectionSkeleton {
            id: OVERVIEW_SECTION,
            title: "Overview",
        }];
        sections.extend(PanelId::ALL.iter().map(|id| SectionSkeleton {
            id: id.as_str(),
            title: id.title(),
        }));
        sections
    }
}
