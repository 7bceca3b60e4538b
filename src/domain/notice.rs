// Inline notices - every recoverable failure is rendered in the panel it affects
use serde::Serialize;
use thiserror::Error;

use super::visualization::RenderableOutcome;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NoticeKind {
    #[error("No visualization data available for this query.")]
    EmptyData,
    #[error("Unable to render visualization. Data format may be incompatible.")]
    ShapeMismatch,
    #[error("Unsupported visualization type: {0}")]
    UnsupportedVisualizationType(String),
    #[error("{0}")]
    NetworkFailure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn severity(&self) -> Severity {
        match self {
            NoticeKind::EmptyData => Severity::Info,
            NoticeKind::UnsupportedVisualizationType(_) => Severity::Warning,
            NoticeKind::ShapeMismatch | NoticeKind::NetworkFailure(_) => Severity::Error,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            NoticeKind::EmptyData => "empty_data",
            NoticeKind::ShapeMismatch => "shape_mismatch",
            NoticeKind::UnsupportedVisualizationType(_) => "unsupported_visualization_type",
            NoticeKind::NetworkFailure(_) => "network_failure",
        }
    }

    /// Diagnostic carried by a resolved outcome, if it is not a chart.
    pub fn from_outcome(outcome: &RenderableOutcome) -> Option<Self> {
        match outcome {
            RenderableOutcome::EmptyNotice => Some(NoticeKind::EmptyData),
            RenderableOutcome::ShapeMismatchNotice => Some(NoticeKind::ShapeMismatch),
            RenderableOutcome::UnsupportedTypeNotice { visualization_type } => Some(
                NoticeKind::UnsupportedVisualizationType(visualization_type.clone()),
            ),
            _ => None,
        }
    }

    /// Scoped load error for one resource, e.g. `Error loading customers data`.
    pub fn load_failure(resource: &str) -> Self {
        NoticeKind::NetworkFailure(format!("Error loading {} data", resource))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl From<NoticeKind> for Notice {
    fn from(kind: NoticeKind) -> Self {
        Self {
            code: kind.code(),
            severity: kind.severity(),
            message: kind.to_string(),
        }
    }
}
