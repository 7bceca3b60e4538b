// Visualization domain - resolves a query result into a renderable chart or notice
use serde::Serialize;
use serde_json::Value;

use super::format::{currency, grouped, grouped_or_nan, humanize_key, truncate_label};
use super::query::{key_count, Payload, QueryResult};

/// Bar chart labels longer than this are cut and suffixed with `...`.
pub const BAR_LABEL_MAX_CHARS: usize = 15;

/// Fixed cyclic palette for pie slices.
pub const PIE_PALETTE: [&str; 7] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884d8", "#82ca9d", "#ffc658",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub label: String,
    pub revenue: Option<f64>,
    pub orders: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub label: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: Option<f64>,
    pub percent: Option<i64>,
    pub percent_label: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCell {
    pub key: String,
    pub label: String,
    pub value: String,
}

/// Outcome of resolving one query result. Every input maps to exactly one variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderableOutcome {
    EmptyNotice,
    LineChart { points: Vec<LinePoint> },
    BarChart { points: Vec<BarPoint> },
    PieChart { slices: Vec<PieSlice> },
    MetricsGrid { cells: Vec<MetricCell> },
    UnsupportedTypeNotice {
        #[serde(rename = "type")]
        visualization_type: String,
    },
    ShapeMismatchNotice,
}

/// Resolve a query result into a chart description or a diagnostic notice.
///
/// The emptiness check runs before the tag is looked at, so an empty payload
/// with an unknown tag is still an `EmptyNotice`.
pub fn resolve(result: &QueryResult) -> RenderableOutcome {
    let data = match result.data.as_ref() {
        Some(data) if key_count(data) > 0 => data,
        _ => return RenderableOutcome::EmptyNotice,
    };

    let resolved = match result.visualization_type.as_str() {
        "line" => data.as_object().and_then(line_chart),
        "bar" => data.as_object().and_then(bar_chart),
        "pie" => data.as_object().and_then(pie_chart),
        "metrics" => data.as_object().and_then(metrics_grid),
        other => {
            return RenderableOutcome::UnsupportedTypeNotice {
                visualization_type: other.to_string(),
            };
        }
    };

    resolved.unwrap_or(RenderableOutcome::ShapeMismatchNotice)
}

fn line_chart(data: &Payload) -> Option<RenderableOutcome> {
    let labels = array_field(data, "labels")?;
    let revenue = array_field(data, "revenue")?;
    let orders = array_field(data, "orders").map(Vec::as_slice);

    Some(RenderableOutcome::LineChart {
        points: line_points(labels, revenue, orders),
    })
}

fn bar_chart(data: &Payload) -> Option<RenderableOutcome> {
    let labels = array_field(data, "labels")?;
    let values = array_field(data, "values")?;

    Some(RenderableOutcome::BarChart {
        points: bar_points(labels, values, Some(BAR_LABEL_MAX_CHARS)),
    })
}

fn pie_chart(data: &Payload) -> Option<RenderableOutcome> {
    let labels = array_field(data, "labels")?;
    let values = array_field(data, "values")?;

    Some(RenderableOutcome::PieChart {
        slices: pie_slices(labels, values),
    })
}

fn metrics_grid(data: &Payload) -> Option<RenderableOutcome> {
    let metrics = data.get("metrics")?.as_object()?;

    let cells = metrics
        .iter()
        .map(|(key, value)| MetricCell {
            key: key.clone(),
            label: humanize_key(key),
            value: metric_value(key, value),
        })
        .collect();

    Some(RenderableOutcome::MetricsGrid { cells })
}

/// Co-index labels with revenue and (optional) orders. Labels drive the length.
pub fn line_points(labels: &[Value], revenue: &[Value], orders: Option<&[Value]>) -> Vec<LinePoint> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| LinePoint {
            label: label_text(label),
            revenue: number_at(revenue, i),
            orders: orders.and_then(|o| number_at(o, i)),
        })
        .collect()
}

/// Co-index labels with values, truncating labels past `max_label_chars` when set.
pub fn bar_points(
    labels: &[Value],
    values: &[Value],
    max_label_chars: Option<usize>,
) -> Vec<BarPoint> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| BarPoint {
            label: match max_label_chars {
                Some(max) => truncate_label(&label_text(label), max),
                None => label_text(label),
            },
            value: number_at(values, i),
        })
        .collect()
}

/// Build pie slices; percentages are shares of the sum of all numeric values.
pub fn pie_slices(labels: &[Value], values: &[Value]) -> Vec<PieSlice> {
    let slice_values: Vec<Option<f64>> = (0..labels.len()).map(|i| number_at(values, i)).collect();
    let total: f64 = slice_values.iter().flatten().sum();

    labels
        .iter()
        .zip(slice_values)
        .enumerate()
        .map(|(i, (label, value))| {
            let percent = value
                .map(|v| (v / total * 100.0).round())
                .filter(|p| p.is_finite())
                .map(|p| p as i64);

            PieSlice {
                label: label_text(label),
                value,
                percent,
                percent_label: match percent {
                    Some(p) => format!("{}%", p),
                    None => "NaN%".to_string(),
                },
                color: palette_color(i),
            }
        })
        .collect()
}

pub fn palette_color(index: usize) -> &'static str {
    PIE_PALETTE[index % PIE_PALETTE.len()]
}

fn metric_value(key: &str, value: &Value) -> String {
    match value {
        Value::Number(n) => {
            let n = n.as_f64().unwrap_or(f64::NAN);
            if key.contains("revenue") {
                currency(n)
            } else {
                grouped(n)
            }
        }
        Value::String(s) => s.clone(),
        _ => grouped_or_nan(None),
    }
}

fn array_field<'a>(data: &'a Payload, key: &str) -> Option<&'a Vec<Value>> {
    data.get(key)?.as_array()
}

fn number_at(values: &[Value], index: usize) -> Option<f64> {
    values.get(index).and_then(Value::as_f64)
}

fn label_text(label: &Value) -> String {
    match label {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(data: Value, visualization_type: &str) -> QueryResult {
        QueryResult::new(Some(data), visualization_type)
    }

    #[test]
    fn test_line_without_orders() {
        let outcome = resolve(&result(
            json!({"labels": ["Jan", "Feb"], "revenue": [100, 200]}),
            "line",
        ));

        assert_eq!(
            outcome,
            RenderableOutcome::LineChart {
                points: vec![
                    LinePoint { label: "Jan".into(), revenue: Some(100.0), orders: None },
                    LinePoint { label: "Feb".into(), revenue: Some(200.0), orders: None },
                ]
            }
        );
    }

    #[test]
    fn test_line_with_short_orders_series() {
        let outcome = resolve(&result(
            json!({"labels": ["Jan", "Feb", "Mar"], "revenue": [1, 2], "orders": [5]}),
            "line",
        ));

        let RenderableOutcome::LineChart { points } = outcome else {
            panic!("expected line chart");
        };
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].orders, Some(5.0));
        assert_eq!(points[1].orders, None);
        assert_eq!(points[2].revenue, None);
    }

    #[test]
    fn test_bar_truncates_long_labels() {
        let outcome = resolve(&result(
            json!({"labels": ["Super Premium Wireless Headphones", "Mug"], "values": [10, 20]}),
            "bar",
        ));

        let RenderableOutcome::BarChart { points } = outcome else {
            panic!("expected bar chart");
        };
        assert_eq!(points[0].label, "Super Premium W...");
        assert_eq!(points[1].label, "Mug");
        assert_eq!(points[1].value, Some(20.0));
    }

    #[test]
    fn test_pie_even_split() {
        let outcome = resolve(&result(
            json!({"labels": ["Premium", "Basic"], "values": [50, 50]}),
            "pie",
        ));

        let RenderableOutcome::PieChart { slices } = outcome else {
            panic!("expected pie chart");
        };
        assert_eq!(slices.len(), 2);
        assert!(slices.iter().all(|s| s.percent_label == "50%"));
        assert_eq!(slices[0].color, "#0088FE");
        assert_eq!(slices[1].color, "#00C49F");
    }

    #[test]
    fn test_pie_keeps_long_labels_and_cycles_palette() {
        let labels: Vec<String> = (0..9).map(|i| format!("Segment number {}", i)).collect();
        let values: Vec<i32> = vec![1; 9];
        let outcome = resolve(&result(json!({"labels": labels, "values": values}), "pie"));

        let RenderableOutcome::PieChart { slices } = outcome else {
            panic!("expected pie chart");
        };
        assert_eq!(slices[0].label, "Segment number 0");
        assert_eq!(slices[7].color, PIE_PALETTE[0]);
        assert_eq!(slices[8].color, PIE_PALETTE[1]);
    }

    #[test]
    fn test_pie_malformed_value() {
        let outcome = resolve(&result(
            json!({"labels": ["A", "B"], "values": ["oops", 10]}),
            "pie",
        ));

        let RenderableOutcome::PieChart { slices } = outcome else {
            panic!("expected pie chart");
        };
        assert_eq!(slices[0].value, None);
        assert_eq!(slices[0].percent_label, "NaN%");
        assert_eq!(slices[1].percent_label, "100%");
    }

    #[test]
    fn test_metrics_labels_and_values() {
        let outcome = resolve(&result(
            json!({"metrics": {"total_revenue": 1234.5, "orders": 10}}),
            "metrics",
        ));

        assert_eq!(
            outcome,
            RenderableOutcome::MetricsGrid {
                cells: vec![
                    MetricCell {
                        key: "total_revenue".into(),
                        label: "Total Revenue".into(),
                        value: "$1,234.5".into(),
                    },
                    MetricCell {
                        key: "orders".into(),
                        label: "Orders".into(),
                        value: "10".into(),
                    },
                ]
            }
        );
    }

    #[test]
    fn test_metrics_non_numeric_values() {
        let outcome = resolve(&result(
            json!({"metrics": {"total_revenue": null, "name": "abc", "orders": [1]}}),
            "metrics",
        ));

        let RenderableOutcome::MetricsGrid { cells } = outcome else {
            panic!("expected metrics grid");
        };
        let values: Vec<&str> = cells.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, ["NaN", "abc", "NaN"]);
        assert_eq!(cells[0].label, "Total Revenue");
    }

    #[test]
    fn test_empty_data_precedes_dispatch() {
        for tag in ["line", "bar", "pie", "metrics", "scatter", ""] {
            assert_eq!(resolve(&result(json!({}), tag)), RenderableOutcome::EmptyNotice);
            assert_eq!(
                resolve(&QueryResult::new(None, tag)),
                RenderableOutcome::EmptyNotice
            );
        }
    }

    #[test]
    fn test_missing_required_field() {
        assert_eq!(
            resolve(&result(json!({"labels": ["Jan"]}), "line")),
            RenderableOutcome::ShapeMismatchNotice
        );
        assert_eq!(
            resolve(&result(json!({"labels": ["A"], "revenue": [1]}), "bar")),
            RenderableOutcome::ShapeMismatchNotice
        );
        assert_eq!(
            resolve(&result(json!({"values": [1]}), "pie")),
            RenderableOutcome::ShapeMismatchNotice
        );
        assert_eq!(
            resolve(&result(json!({"labels": ["A"]}), "metrics")),
            RenderableOutcome::ShapeMismatchNotice
        );
    }

    #[test]
    fn test_non_array_field_is_mismatch() {
        assert_eq!(
            resolve(&result(json!({"labels": "Jan", "revenue": [1]}), "line")),
            RenderableOutcome::ShapeMismatchNotice
        );
        assert_eq!(
            resolve(&result(json!(["not", "an", "object"]), "bar")),
            RenderableOutcome::ShapeMismatchNotice
        );
    }

    #[test]
    fn test_unknown_type() {
        let outcome = resolve(&result(json!({"labels": ["A"], "values": [1]}), "scatter"));
        assert_eq!(
            outcome,
            RenderableOutcome::UnsupportedTypeNotice {
                visualization_type: "scatter".into()
            }
        );
    }

    #[test]
    fn test_tag_match_is_literal() {
        let outcome = resolve(&result(json!({"labels": ["A"], "values": [1]}), "Bar"));
        assert!(matches!(outcome, RenderableOutcome::UnsupportedTypeNotice { .. }));
    }

    #[test]
    fn test_serialized_shape() {
        let outcome = RenderableOutcome::UnsupportedTypeNotice {
            visualization_type: "scatter".into(),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"kind": "unsupported_type_notice", "type": "scatter"})
        );
    }
}
