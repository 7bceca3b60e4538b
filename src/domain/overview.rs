// Overview domain models - headline metric cards
use serde::{Deserialize, Serialize};

use super::format::{grouped, grouped_fixed};

/// Totals reported by the overview endpoint. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Overview {
    #[serde(default)]
    pub customers: Option<f64>,
    #[serde(default)]
    pub products: Option<f64>,
    #[serde(default)]
    pub orders: Option<f64>,
    #[serde(default)]
    pub total_revenue: Option<f64>,
    #[serde(default)]
    pub avg_order_value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CardFormat {
    Count,
    Money,
    UnitPrice,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub id: &'static str,
    pub title: &'static str,
    pub value: String,
    pub color: &'static str,
}

impl MetricCard {
    fn new(id: &'static str, title: &'static str, color: &'static str, value: Option<f64>, format: CardFormat) -> Self {
        Self {
            id,
            title,
            value: format_card_value(value, format),
            color,
        }
    }
}

impl Overview {
    /// Build the five headline cards in display order.
    pub fn cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard::new("customers", "Total Customers", "#2196f3", self.customers, CardFormat::Count),
            MetricCard::new("products", "Total Products", "#4caf50", self.products, CardFormat::Count),
            MetricCard::new("orders", "Total Orders", "#ff9800", self.orders, CardFormat::Count),
            MetricCard::new("total_revenue", "Total Revenue", "#9c27b0", self.total_revenue, CardFormat::Money),
            MetricCard::new("avg_order_value", "Avg Order Value", "#f44336", self.avg_order_value, CardFormat::UnitPrice),
        ]
    }
}

fn format_card_value(value: Option<f64>, format: CardFormat) -> String {
    // Missing, zero and NaN all render as a plain zero
    let value = match value {
        Some(v) if v != 0.0 && !v.is_nan() => v,
        _ => return "0".to_string(),
    };

    match format {
        CardFormat::Count => grouped(value),
        CardFormat::Money => format!("${}", grouped_fixed(value, 2)),
        CardFormat::UnitPrice => format!("${:.2}", value),
    }
}
