use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

/// One record of domain data as delivered by the backend.
pub type Row = Map<String, Value>;

/// Reads a cell out of a row. An exact key wins; otherwise the accessor is
/// treated as a dotted path into nested objects.
pub fn lookup<'a>(row: &'a Row, accessor: &str) -> Option<&'a Value> {
    if let Some(value) = row.get(accessor) {
        return Some(value);
    }
    if !accessor.contains('.') {
        return None;
    }

    let mut parts = accessor.split('.');
    let first = parts.next()?;
    let mut current = row.get(first)?;
    for part in parts {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Text form of a value as it should appear inside a cell or a URL.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Where activating a row leads.
#[derive(Clone)]
pub enum RowTarget {
    Route(String),
    Action(Arc<dyn Fn() + Send + Sync>),
}

impl RowTarget {
    pub fn route(&self) -> Option<&str> {
        match self {
            RowTarget::Route(route) => Some(route.as_str()),
            RowTarget::Action(_) => None,
        }
    }
}

impl fmt::Debug for RowTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowTarget::Route(route) => f.debug_tuple("Route").field(route).finish(),
            RowTarget::Action(_) => f.write_str("Action(..)"),
        }
    }
}

impl PartialEq for RowTarget {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RowTarget::Route(a), RowTarget::Route(b)) => a == b,
            (RowTarget::Action(a), RowTarget::Action(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

type TargetFn = Arc<dyn Fn(&Row) -> Option<RowTarget> + Send + Sync>;

/// Decides per row whether it is clickable and where it goes.
#[derive(Clone)]
pub struct RowRouter {
    resolve: TargetFn,
}

impl RowRouter {
    pub fn new(resolve: impl Fn(&Row) -> Option<RowTarget> + Send + Sync + 'static) -> Self {
        Self {
            resolve: Arc::new(resolve),
        }
    }

    /// Builds routes from a template such as `/vendors/{id}`. Rows missing any
    /// referenced field, or holding an empty value for it, get no route.
    pub fn from_template(template: impl Into<String>) -> Self {
        let template = template.into();
        Self::new(move |row| expand_route(&template, row).map(RowTarget::Route))
    }

    pub fn target_for(&self, row: &Row) -> Option<RowTarget> {
        (self.resolve)(row)
    }
}

impl fmt::Debug for RowRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RowRouter(..)")
    }
}

impl PartialEq for RowRouter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resolve, &other.resolve)
    }
}

pub fn expand_route(template: &str, row: &Row) -> Option<String> {
    let mut route = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        route.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}')?;
        let field = &after[..close];
        let text = value_text(lookup(row, field)?);
        if text.trim().is_empty() {
            return None;
        }
        route.push_str(&text);
        rest = &after[close + 1..];
    }
    route.push_str(rest);
    Some(route)
}
