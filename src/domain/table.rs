// Table domain - record kinds, pagination/search state and display rows
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use super::format::grouped;

pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Customers,
    Products,
    Orders,
}

impl TableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Customers => "customers",
            TableKind::Products => "products",
            TableKind::Orders => "orders",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TableKind::Customers => "Customers",
            TableKind::Products => "Products",
            TableKind::Orders => "Orders",
        }
    }

    pub fn headers(&self) -> [&'static str; 6] {
        match self {
            TableKind::Customers => ["Customer", "Email", "Phone", "City", "Segment", "Lifetime Value"],
            TableKind::Products => ["Product", "Category", "Brand", "Price", "Stock", "Rating"],
            TableKind::Orders => ["Order ID", "Customer", "Date", "Status", "Total", "Channel"],
        }
    }

    /// Fields matched by the client-side search.
    pub fn search_fields(&self) -> &'static [&'static str] {
        match self {
            TableKind::Customers => &["first_name", "last_name", "email"],
            TableKind::Products => &["product_name", "brand", "category"],
            TableKind::Orders => &["order_id", "customer_id"],
        }
    }

    /// Case-insensitive substring match over the kind's search fields.
    /// An empty term matches every record.
    pub fn matches(&self, record: &Record, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }

        let needle = term.to_lowercase();
        self.search_fields().iter().any(|field| {
            record
                .get(*field)
                .and_then(Value::as_str)
                .is_some_and(|v| v.to_lowercase().contains(&needle))
        })
    }

    pub fn display_row(&self, record: &Record) -> DisplayRow {
        match self {
            TableKind::Customers => {
                let segment = text(record, "customer_segment");
                let tone = if segment == "Premium" { Tone::Primary } else { Tone::Default };
                DisplayRow {
                    cells: vec![
                        Cell::with_caption(
                            format!("{} {}", text(record, "first_name"), text(record, "last_name")),
                            text(record, "customer_id"),
                        ),
                        Cell::plain(text(record, "email")),
                        Cell::plain(text(record, "phone")),
                        Cell::plain(text(record, "city")),
                        Cell::chip(segment, tone),
                        Cell::plain(money(record, "lifetime_value")),
                    ],
                }
            }
            TableKind::Products => {
                let stock = record.get("stock_quantity").and_then(Value::as_f64);
                DisplayRow {
                    cells: vec![
                        Cell::with_caption(text(record, "product_name"), text(record, "product_id")),
                        Cell::plain(text(record, "category")),
                        Cell::plain(text(record, "brand")),
                        Cell::plain(money(record, "price")),
                        Cell::chip(text(record, "stock_quantity"), stock_tone(stock)),
                        Cell::with_caption(
                            format!("{}/5.0", text(record, "rating")),
                            format!("({} reviews)", text(record, "reviews_count")),
                        ),
                    ],
                }
            }
            TableKind::Orders => {
                let status = text(record, "order_status");
                DisplayRow {
                    cells: vec![
                        Cell::plain(text(record, "order_id")),
                        Cell::plain(text(record, "customer_id")),
                        Cell::plain(order_date(record)),
                        Cell::chip(status.clone(), status_tone(&status)),
                        Cell::plain(money(record, "total_amount")),
                        Cell::chip(text(record, "channel"), Tone::Outlined),
                    ],
                }
            }
        }
    }
}

impl FromStr for TableKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customers" => Ok(TableKind::Customers),
            "products" => Ok(TableKind::Products),
            "orders" => Ok(TableKind::Orders),
            other => Err(format!("unknown table: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Default,
    Primary,
    Success,
    Warning,
    Error,
    Info,
    Outlined,
}

/// Chip colour for an order (or account) status.
pub fn status_tone(status: &str) -> Tone {
    match status.to_lowercase().as_str() {
        "delivered" | "active" => Tone::Success,
        "pending" | "processing" => Tone::Warning,
        "cancelled" | "inactive" => Tone::Error,
        "shipped" => Tone::Info,
        _ => Tone::Default,
    }
}

pub fn stock_tone(stock: Option<f64>) -> Tone {
    match stock {
        Some(s) if s > 100.0 => Tone::Success,
        Some(s) if s > 10.0 => Tone::Warning,
        _ => Tone::Error,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
}

impl Cell {
    fn plain(text: String) -> Self {
        Self { text, caption: None, tone: None }
    }

    fn with_caption(text: String, caption: String) -> Self {
        Self { text, caption: Some(caption), tone: None }
    }

    fn chip(text: String, tone: Tone) -> Self {
        Self { text, caption: None, tone: Some(tone) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub cells: Vec<Cell>,
}

fn text(record: &Record, field: &str) -> String {
    match record.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn money(record: &Record, field: &str) -> String {
    match record.get(field).and_then(Value::as_f64) {
        Some(v) => format!("${:.2}", v),
        None => "$".to_string(),
    }
}

/// Date part of the order timestamp (`2024-03-05 14:22:01` -> `2024-03-05`).
fn order_date(record: &Record) -> String {
    let raw = text(record, "order_date");
    let parsed = chrono::NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f"));

    match parsed {
        Ok(dt) => dt.date().format("%Y-%m-%d").to_string(),
        Err(_) => raw,
    }
}

/// Allowed rows-per-page options.
pub const PAGE_SIZES: [u32; 4] = [5, 10, 25, 50];
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    page: u32,
    page_size: u32,
    search_term: String,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            search_term: String::new(),
        }
    }
}

impl PaginationState {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page;
    }

    /// Change the page size; the page index always returns to 0.
    /// Sizes outside `PAGE_SIZES` are rejected and leave the state unchanged.
    pub fn set_page_size(&mut self, page_size: u32) -> Result<(), u32> {
        if !PAGE_SIZES.contains(&page_size) {
            return Err(page_size);
        }
        self.page_size = page_size;
        self.page = 0;
        Ok(())
    }

    /// Search never resets the page and never triggers a fetch.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size)
    }

    /// Filter the currently loaded page.
    pub fn filter<'a>(&self, kind: TableKind, rows: &'a [Record]) -> Vec<&'a Record> {
        rows.iter()
            .filter(|r| kind.matches(r, &self.search_term))
            .collect()
    }
}

/// One fetched page as returned by the records endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub data: Vec<Record>,
    #[serde(default)]
    pub total: u64,
}

/// Header text, e.g. `Customers (1,000)`.
pub fn table_title(kind: TableKind, total: u64) -> String {
    format!("{} ({})", kind.title(), grouped(total as f64))
}
