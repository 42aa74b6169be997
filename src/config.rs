//! Grid configuration, read from `grid.toml`.
//!
//! Every section is optional; missing keys fall back to the defaults below, and a
//! missing file means a fully default grid.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entities::cell::{BadgeTone, CellContent};
use crate::domain::entities::column::Column;
use crate::domain::entities::filter::{FieldSpec, FilterOption};
use crate::domain::entities::pagination::PageSize;
use crate::domain::entities::query::{QueryParamStyle, SortOrder};
use crate::domain::entities::row::{expand_route, value_text, RowRouter};
use crate::infra::fixture::csv_source::{CsvPageSource, FixtureOptions};
use crate::infra::http::rest_source::{
    create_client, standard_endpoint, ResponseMap, RestPageSource,
};
use crate::usecase::ports::source::PageSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Window title.
    pub title: String,

    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,

    pub source: SourceConfig,
    pub grid: GridSection,
    pub columns: Vec<ColumnConfig>,
    pub filters: Vec<FilterConfig>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            title: "Admin Grid".to_string(),
            log_filter: "info".to_string(),
            source: SourceConfig::default(),
            grid: GridSection::default(),
            columns: Vec::new(),
            filters: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Rows from a local CSV file, paged in memory.
    #[default]
    Fixture,
    /// JSON list endpoint.
    Rest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,

    pub fixture_path: Option<PathBuf>,
    pub fixture_sort_column: Option<String>,
    pub fixture_date_column: Option<String>,
    /// Simulated latency for the fixture source.
    pub latency_ms: u64,

    pub base_url: String,
    pub path: String,
    /// Endpoint returning CSV text for the current parameters.
    pub export_path: Option<String>,

    pub timeout_secs: u64,
    pub params: QueryParamStyle,
    pub response: ResponseMap,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Fixture,
            fixture_path: None,
            fixture_sort_column: None,
            fixture_date_column: None,
            latency_ms: 0,
            base_url: String::new(),
            path: String::new(),
            export_path: None,
            timeout_secs: 15,
            params: QueryParamStyle::default(),
            response: ResponseMap::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSection {
    pub default_page_size: PageSize,
    pub default_sort: Option<SortOrder>,
    pub has_serial_number: bool,
    pub searchable: bool,
    pub has_filter_option: bool,
    pub download_csv: bool,
    pub show_total_count: bool,
    /// Quiet period after the last keystroke before a search is sent.
    pub debounce_ms: u64,
    /// Route template such as `/vendors/{id}`; rows missing a field get no target.
    pub row_route: Option<String>,
    pub illustration_text: String,
    pub illustration_image: Option<String>,
    pub no_data_text: String,
    pub no_data_image: Option<String>,
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            default_page_size: PageSize::Ten,
            default_sort: None,
            has_serial_number: true,
            searchable: true,
            has_filter_option: true,
            download_csv: false,
            show_total_count: false,
            debounce_ms: 500,
            row_route: None,
            illustration_text: "Nothing here yet".to_string(),
            illustration_image: None,
            no_data_text: "No data".to_string(),
            no_data_image: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColumnStyle {
    #[default]
    Plain,
    /// Status-like values shown as a colored pill.
    Badge,
    /// Arrays joined with commas.
    List,
    /// ISO dates shown as `18 Oct 2026`.
    Date,
    /// Clickable text leading to `route`, expanded per row.
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub header: String,
    pub accessor: String,
    #[serde(default)]
    pub kind: ColumnStyle,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub header_class: Option<String>,
    /// Route template for link columns, e.g. `/vendors/{id}`.
    #[serde(default)]
    pub route: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilterStyle {
    #[default]
    Single,
    Multi,
    Toggle,
    DateRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub kind: FilterStyle,
    #[serde(default)]
    pub options: Vec<String>,
}

/// A constructed page source plus the column names it discovered, if any.
pub struct BuiltSource {
    pub source: Arc<dyn PageSource>,
    pub discovered_columns: Vec<String>,
}

impl GridConfig {
    /// Reads `path`, or returns defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse toml")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.source.kind == SourceKind::Rest && self.source.base_url.trim().is_empty() {
            bail!("source.base_url is required for a rest source")
        }
        if self.source.timeout_secs == 0 {
            bail!("source.timeout_secs must be positive")
        }
        for column in &self.columns {
            let has_route = column
                .route
                .as_deref()
                .is_some_and(|route| !route.trim().is_empty());
            if column.kind == ColumnStyle::Link && !has_route {
                bail!("column {:?} is a link column without a route", column.header)
            }
        }
        let date_ranges = self
            .filters
            .iter()
            .filter(|filter| filter.kind == FilterStyle::DateRange)
            .count();
        if date_ranges > 1 {
            bail!("at most one date_range filter is supported, found {date_ranges}")
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.grid.debounce_ms)
    }

    /// Configured columns, or one plain column per discovered name when none
    /// are configured.
    pub fn columns(&self, discovered: &[String]) -> Vec<Column> {
        if self.columns.is_empty() {
            return discovered
                .iter()
                .map(|name| Column::plain(name.as_str(), name.as_str()))
                .collect();
        }
        self.columns.iter().map(ColumnConfig::to_column).collect()
    }

    pub fn filter_fields(&self) -> Vec<FieldSpec> {
        self.filters.iter().map(FilterConfig::to_field).collect()
    }

    pub fn row_router(&self) -> Option<RowRouter> {
        self.grid
            .row_route
            .as_deref()
            .filter(|template| !template.trim().is_empty())
            .map(RowRouter::from_template)
    }

    pub fn build_source(&self) -> Result<BuiltSource> {
        match self.source.kind {
            SourceKind::Fixture => {
                let Some(path) = &self.source.fixture_path else {
                    bail!("source.fixture_path is required for a fixture source")
                };
                let options = FixtureOptions {
                    sort_column: self.source.fixture_sort_column.clone(),
                    date_column: self.source.fixture_date_column.clone(),
                    option_columns: self
                        .filters
                        .iter()
                        .filter(|filter| {
                            matches!(filter.kind, FilterStyle::Single | FilterStyle::Multi)
                        })
                        .map(|filter| filter.name.clone())
                        .collect(),
                    latency: Duration::from_millis(self.source.latency_ms),
                };
                let source = CsvPageSource::load(path, options)?;
                let discovered_columns = source.columns().to_vec();
                Ok(BuiltSource {
                    source: Arc::new(source),
                    discovered_columns,
                })
            }
            SourceKind::Rest => {
                let client = create_client().context("failed to build http client")?;
                let list = standard_endpoint(
                    &self.source.base_url,
                    &self.source.path,
                    self.source.params.clone(),
                );
                let export = self.source.export_path.as_deref().map(|path| {
                    standard_endpoint(&self.source.base_url, path, self.source.params.clone())
                });
                tracing::info!(
                    base_url = %self.source.base_url,
                    path = %self.source.path,
                    "using rest source"
                );
                Ok(BuiltSource {
                    source: Arc::new(RestPageSource::new(
                        client,
                        list,
                        export,
                        self.source.response.clone(),
                    )),
                    discovered_columns: Vec::new(),
                })
            }
        }
    }
}

impl ColumnConfig {
    pub fn to_column(&self) -> Column {
        let accessor = Some(self.accessor.as_str());
        let column = match self.kind {
            ColumnStyle::Plain => Column::plain(self.header.as_str(), self.accessor.as_str()),
            ColumnStyle::Badge => Column::custom(self.header.as_str(), accessor, |value, _| {
                let label = value_text(value);
                CellContent::Badge {
                    tone: badge_tone(&label),
                    label,
                }
            }),
            ColumnStyle::List => Column::custom(self.header.as_str(), accessor, |value, _| {
                CellContent::Text(value_text(value))
            }),
            ColumnStyle::Date => Column::custom(self.header.as_str(), accessor, |value, _| {
                match value {
                    Value::String(text) => CellContent::Text(format_date(text)),
                    other => CellContent::Value(other.clone()),
                }
            }),
            ColumnStyle::Link => {
                let template = self.route.clone().unwrap_or_default();
                Column::custom(self.header.as_str(), accessor, move |value, row| {
                    let label = value_text(value);
                    match expand_route(&template, row) {
                        Some(route) => CellContent::Link { label, route },
                        None => CellContent::Text(label),
                    }
                })
            }
        };
        let column = match &self.header_class {
            Some(class) => column.with_header_class(class.as_str()),
            None => column,
        };
        if self.sortable {
            column.sortable()
        } else {
            column
        }
    }
}

impl FilterConfig {
    pub fn to_field(&self) -> FieldSpec {
        let options = || {
            self.options
                .iter()
                .map(|option| FilterOption::same(option.as_str()))
                .collect()
        };
        match self.kind {
            FilterStyle::Single => FieldSpec::single(&self.name, &self.label, options()),
            FilterStyle::Multi => FieldSpec::multi(&self.name, &self.label, options()),
            FilterStyle::Toggle => FieldSpec::toggle(&self.name, &self.label),
            FilterStyle::DateRange => FieldSpec::date_range(&self.name, &self.label),
        }
    }
}

pub fn badge_tone(label: &str) -> BadgeTone {
    match label.trim().to_ascii_lowercase().as_str() {
        "published" | "active" | "completed" | "successful" | "sent" | "approved" | "true" => {
            BadgeTone::Positive
        }
        "archived" | "inactive" | "failed" | "rejected" | "expired" | "false" => {
            BadgeTone::Negative
        }
        _ => BadgeTone::Neutral,
    }
}

/// `2026-10-18T09:30:00Z` or `2026-10-18` → `18 Oct 2026`. Anything else is kept.
pub fn format_date(text: &str) -> String {
    let trimmed = text.trim();
    let date = DateTime::parse_from_rfc3339(trimmed)
        .map(|moment| moment.date_naive())
        .ok()
        .or_else(|| {
            trimmed
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        });
    match date {
        Some(date) => date.format("%d %b %Y").to_string(),
        None => text.to_string(),
    }
}
