use serde_json::Value;

use crate::domain::entities::row::{value_text, RowTarget};

pub const EMPTY_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Neutral,
    Positive,
    Negative,
}

/// What a column produces for one row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Value(Value),
    Text(String),
    Badge { label: String, tone: BadgeTone },
    Link { label: String, route: String },
    /// The column renderer panicked for this row.
    Failed,
}

impl CellContent {
    pub fn is_empty(&self) -> bool {
        match self {
            CellContent::Value(value) => is_empty_value(value),
            CellContent::Text(text) => text.trim().is_empty(),
            CellContent::Badge { label, .. } | CellContent::Link { label, .. } => {
                label.trim().is_empty()
            }
            CellContent::Failed => false,
        }
    }

    /// Where clicking the cell leads. Only non-empty link cells lead anywhere.
    pub fn link_target(&self) -> Option<RowTarget> {
        match self {
            CellContent::Link { route, .. } if !self.is_empty() => {
                Some(RowTarget::Route(route.clone()))
            }
            _ => None,
        }
    }

    pub fn display_text(&self) -> String {
        if self.is_empty() {
            return EMPTY_PLACEHOLDER.to_string();
        }
        match self {
            CellContent::Value(value) => value_text(value),
            CellContent::Text(text) => text.clone(),
            CellContent::Badge { label, .. } | CellContent::Link { label, .. } => label.clone(),
            CellContent::Failed => "!".to_string(),
        }
    }
}

impl From<Value> for CellContent {
    fn from(value: Value) -> Self {
        CellContent::Value(value)
    }
}

/// Only null, blank strings, empty arrays and empty objects are empty.
/// `0`, `false` and `"0"` are real values.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
