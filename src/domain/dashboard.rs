// Dashboard domain model - the four analytics panels
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::query::QueryResult;
use super::visualization::{bar_points, line_points, pie_slices, RenderableOutcome};

/// Top-products labels are cut at this length. Independent of the bar chart
/// threshold used when resolving query results.
pub const TOP_PRODUCT_LABEL_MAX_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelId {
    RevenueTrend,
    TopProducts,
    CategoryComparison,
    CustomerSegments,
}

impl PanelId {
    pub const ALL: [PanelId; 4] = [
        PanelId::RevenueTrend,
        PanelId::TopProducts,
        PanelId::CategoryComparison,
        PanelId::CustomerSegments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelId::RevenueTrend => "revenue_trend",
            PanelId::TopProducts => "top_products",
            PanelId::CategoryComparison => "category_comparison",
            PanelId::CustomerSegments => "customer_segments",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PanelId::RevenueTrend => "Revenue Trend Over Time",
            PanelId::TopProducts => "Top Products by Revenue",
            PanelId::CategoryComparison => "Category Performance",
            PanelId::CustomerSegments => "Customer Segments",
        }
    }
}

/// Raw dashboard response; each section is a query result without a query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub revenue_trend: Option<QueryResult>,
    #[serde(default)]
    pub top_products: Option<QueryResult>,
    #[serde(default)]
    pub category_comparison: Option<QueryResult>,
    #[serde(default)]
    pub customer_segments: Option<QueryResult>,
}

impl DashboardData {
    fn section(&self, id: PanelId) -> Option<&QueryResult> {
        match id {
            PanelId::RevenueTrend => self.revenue_trend.as_ref(),
            PanelId::TopProducts => self.top_products.as_ref(),
            PanelId::CategoryComparison => self.category_comparison.as_ref(),
            PanelId::CustomerSegments => self.customer_segments.as_ref(),
        }
    }

    /// Shape every panel in display order.
    pub fn panels(&self) -> Vec<Panel> {
        PanelId::ALL
            .iter()
            .map(|&id| Panel::from_section(id, self.section(id)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub id: PanelId,
    pub title: &'static str,
    pub chart: RenderableOutcome,
    pub insights: Vec<String>,
}

impl Panel {
    /// Missing sections or series produce an empty chart rather than an error.
    pub fn from_section(id: PanelId, section: Option<&QueryResult>) -> Self {
        let data = section.and_then(|s| s.data.as_ref());
        let chart = match id {
            PanelId::RevenueTrend => {
                let orders = data
                    .and_then(|d| d.get("orders"))
                    .and_then(Value::as_array)
                    .map(Vec::as_slice);
                RenderableOutcome::LineChart {
                    points: line_points(series(data, "labels"), series(data, "revenue"), orders),
                }
            }
            PanelId::TopProducts => RenderableOutcome::BarChart {
                points: bar_points(
                    series(data, "labels"),
                    series(data, "values"),
                    Some(TOP_PRODUCT_LABEL_MAX_CHARS),
                ),
            },
            PanelId::CategoryComparison => RenderableOutcome::BarChart {
                points: bar_points(series(data, "labels"), series(data, "revenue"), None),
            },
            PanelId::CustomerSegments => RenderableOutcome::PieChart {
                slices: pie_slices(series(data, "labels"), series(data, "values")),
            },
        };

        Self {
            id,
            title: id.title(),
            chart,
            insights: section.map(|s| s.insights.clone()).unwrap_or_default(),
        }
    }
}

fn series<'a>(data: Option<&'a Value>, key: &str) -> &'a [Value] {
    data.and_then(|d| d.get(key))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
