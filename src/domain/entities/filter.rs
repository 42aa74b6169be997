use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    pub fn same(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterKind {
    Single { options: Vec<FilterOption> },
    Multi { options: Vec<FilterOption> },
    /// Yes / no / unset.
    Toggle,
    DateRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FilterKind,
}

impl FieldSpec {
    pub fn single(name: &str, label: &str, options: Vec<FilterOption>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FilterKind::Single { options },
        }
    }

    pub fn multi(name: &str, label: &str, options: Vec<FilterOption>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FilterKind::Multi { options },
        }
    }

    pub fn toggle(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FilterKind::Toggle,
        }
    }

    pub fn date_range(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FilterKind::DateRange,
        }
    }

    pub fn options(&self) -> &[FilterOption] {
        match &self.kind {
            FilterKind::Single { options } | FilterKind::Multi { options } => options,
            FilterKind::Toggle | FilterKind::DateRange => &[],
        }
    }

    /// The value a cleared field holds.
    pub fn empty_value(&self) -> FilterValue {
        match self.kind {
            FilterKind::Single { .. } => FilterValue::Single(None),
            FilterKind::Multi { .. } => FilterValue::Multi(Vec::new()),
            FilterKind::Toggle => FilterValue::Toggle(None),
            FilterKind::DateRange => FilterValue::DateRange(DateRange::default()),
        }
    }

    /// Declared options first, then server-provided ones not already present.
    pub fn with_server_options(&self, server: Option<&Vec<String>>) -> FieldSpec {
        let Some(server) = server else {
            return self.clone();
        };
        let merge = |declared: &[FilterOption]| {
            let mut merged = declared.to_vec();
            for value in server {
                if !merged.iter().any(|option| &option.value == value) {
                    merged.push(FilterOption::same(value.clone()));
                }
            }
            merged
        };
        let kind = match &self.kind {
            FilterKind::Single { options } => FilterKind::Single {
                options: merge(options),
            },
            FilterKind::Multi { options } => FilterKind::Multi {
                options: merge(options),
            },
            other => other.clone(),
        };
        FieldSpec {
            name: self.name.clone(),
            label: self.label.clone(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Single(Option<String>),
    Multi(Vec<String>),
    Toggle(Option<bool>),
    DateRange(DateRange),
}

impl FilterValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Single(value) => value.as_deref().map_or(true, |v| v.trim().is_empty()),
            FilterValue::Multi(values) => values.is_empty(),
            FilterValue::Toggle(value) => value.is_none(),
            FilterValue::DateRange(range) => range.is_empty(),
        }
    }
}

/// Submitted filter values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection(BTreeMap<String, FilterValue>);

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every declared field at its empty representation.
    pub fn cleared(fields: &[FieldSpec]) -> Self {
        Self(
            fields
                .iter()
                .map(|field| (field.name.clone(), field.empty_value()))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.0.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: FilterValue) {
        self.0.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: FilterValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.0.iter()
    }

    /// True when at least one field carries a value.
    pub fn is_active(&self) -> bool {
        self.0.values().any(|value| !value.is_empty())
    }
}

/// The filter panel's unsubmitted edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDraft {
    selection: FilterSelection,
}

impl FilterDraft {
    pub fn from_selection(selection: &FilterSelection) -> Self {
        Self {
            selection: selection.clone(),
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn set_single(&mut self, name: &str, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        self.selection.set(name, FilterValue::Single(value));
    }

    /// Checks or unchecks one option of a multi-select field, keeping the rest.
    pub fn toggle_multi(&mut self, name: &str, value: &str) {
        let mut values = match self.selection.get(name) {
            Some(FilterValue::Multi(values)) => values.clone(),
            _ => Vec::new(),
        };
        if let Some(pos) = values.iter().position(|v| v == value) {
            values.remove(pos);
        } else {
            values.push(value.to_string());
        }
        self.selection.set(name, FilterValue::Multi(values));
    }

    pub fn set_toggle(&mut self, name: &str, value: Option<bool>) {
        self.selection.set(name, FilterValue::Toggle(value));
    }

    pub fn set_date_start(&mut self, name: &str, start: Option<NaiveDate>) {
        let mut range = self.date_range(name);
        range.start = start;
        self.selection.set(name, FilterValue::DateRange(range));
    }

    pub fn set_date_end(&mut self, name: &str, end: Option<NaiveDate>) {
        let mut range = self.date_range(name);
        range.end = end;
        self.selection.set(name, FilterValue::DateRange(range));
    }

    fn date_range(&self, name: &str) -> DateRange {
        match self.selection.get(name) {
            Some(FilterValue::DateRange(range)) => *range,
            _ => DateRange::default(),
        }
    }

    pub fn can_apply(&self) -> bool {
        self.selection.is_active()
    }

    /// The complete draft, handed over in one piece.
    pub fn submit(&self) -> FilterSelection {
        self.selection.clone()
    }

    pub fn clear(&mut self, fields: &[FieldSpec]) {
        self.selection = FilterSelection::cleared(fields);
    }

    pub fn is_checked(&self, name: &str, value: &str) -> bool {
        match self.selection.get(name) {
            Some(FilterValue::Multi(values)) => values.iter().any(|v| v == value),
            Some(FilterValue::Single(Some(selected))) => selected == value,
            _ => false,
        }
    }
}
