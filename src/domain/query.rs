// Query domain models - natural-language query results and session history
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Loosely-typed payload whose expected shape depends on the visualization tag.
pub type Payload = Map<String, Value>;

/// Number of enumerable keys in a payload. Non-object values count the way a
/// JSON consumer enumerating them would (array indices, string characters).
pub fn key_count(data: &Value) -> usize {
    match data {
        Value::Null | Value::Bool(_) | Value::Number(_) => 0,
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub visualization_type: String,
    #[serde(default)]
    pub query_interpretation: String,
}

#[cfg(test)]
impl QueryResult {
    pub fn new(data: Option<Value>, visualization_type: &str) -> Self {
        Self {
            data,
            insights: Vec::new(),
            visualization_type: visualization_type.to_string(),
            query_interpretation: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryHistoryEntry {
    pub query: String,
    pub result: QueryResult,
    pub submitted_at_ms: i64,
}

impl QueryHistoryEntry {
    pub fn new(query: String, result: QueryResult, submitted_at_ms: i64) -> Self {
        Self {
            query,
            result,
            submitted_at_ms,
        }
    }
}

/// Append-only history, stored in insertion order.
#[derive(Debug, Clone, Default)]
pub struct QueryHistory {
    entries: Vec<QueryHistoryEntry>,
}

impl QueryHistory {
    pub fn push(&mut self, entry: QueryHistoryEntry) {
        self.entries.push(entry);
    }

    /// Entries in display order (most recent first).
    pub fn most_recent_first(&self) -> impl Iterator<Item = &QueryHistoryEntry> {
        self.entries.iter().rev()
    }
}

pub const SUGGESTED_QUERIES: [&str; 8] = [
    "Show me the revenue trend over the last year",
    "Which are the top 10 products by sales?",
    "How are different product categories performing?",
    "What's the distribution of customer segments?",
    "Compare sales between different product categories",
    "Show me monthly order trends",
    "Which customers are buying the most?",
    "What's the average order value trend?",
];
