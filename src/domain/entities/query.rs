use std::fmt;

use chrono::{NaiveDate, NaiveTime, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::domain::entities::filter::{FilterSelection, FilterValue};
use crate::domain::entities::pagination::PageSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query-string parameter names. Backends disagree (`limit` vs `page_size`),
/// so every name is configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParamStyle {
    pub page: String,
    pub limit: String,
    pub search: String,
    pub sort_order: String,
    /// Appended to a multi-select field's name; one pair per selected value.
    pub multi_suffix: String,
    pub start_date: String,
    pub end_date: String,
}

impl Default for QueryParamStyle {
    fn default() -> Self {
        Self {
            page: "page".to_string(),
            limit: "limit".to_string(),
            search: "search".to_string(),
            sort_order: "sort_order".to_string(),
            multi_suffix: "_query".to_string(),
            start_date: "start_date".to_string(),
            end_date: "end_date".to_string(),
        }
    }
}

/// Everything a backend needs to produce one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub rows_per_page: PageSize,
    pub search: String,
    pub filters: FilterSelection,
    pub sort_order: Option<SortOrder>,
}

impl ListQuery {
    pub fn new(rows_per_page: PageSize) -> Self {
        Self {
            page: 1,
            rows_per_page,
            search: String::new(),
            filters: FilterSelection::new(),
            sort_order: None,
        }
    }

    pub fn is_constrained(&self) -> bool {
        !self.search.trim().is_empty() || self.filters.is_active()
    }

    pub fn to_pairs(&self, style: &QueryParamStyle) -> Vec<(String, String)> {
        let mut pairs = vec![
            (style.page.clone(), self.page.max(1).to_string()),
            (style.limit.clone(), self.rows_per_page.to_string()),
        ];

        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push((style.search.clone(), search.to_string()));
        }

        for (name, value) in self.filters.iter() {
            match value {
                FilterValue::Single(Some(selected)) if !selected.trim().is_empty() => {
                    pairs.push((name.clone(), selected.clone()));
                }
                FilterValue::Multi(values) => {
                    let key = format!("{name}{}", style.multi_suffix);
                    pairs.extend(values.iter().map(|value| (key.clone(), value.clone())));
                }
                FilterValue::Toggle(Some(flag)) => {
                    pairs.push((name.clone(), flag.to_string()));
                }
                FilterValue::DateRange(range) => {
                    if let Some(start) = range.start {
                        pairs.push((style.start_date.clone(), date_param(start)));
                    }
                    if let Some(end) = range.end {
                        pairs.push((style.end_date.clone(), date_param(end)));
                    }
                }
                _ => {}
            }
        }

        if let Some(order) = self.sort_order {
            pairs.push((style.sort_order.clone(), order.to_string()));
        }

        pairs
    }
}

/// Dates travel as UTC midnight in RFC 3339 with millisecond precision.
pub fn date_param(date: NaiveDate) -> String {
    date.and_time(NaiveTime::default())
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
