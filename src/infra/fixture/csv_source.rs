use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::domain::entities::filter::{DateRange, FilterValue};
use crate::domain::entities::query::{ListQuery, SortOrder};
use crate::domain::entities::row::{lookup, value_text, Row};
use crate::usecase::ports::source::{PageRequest, PageResponse, PageSource, SourceError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureOptions {
    /// Column ordered by the list's sort order.
    pub sort_column: Option<String>,
    /// Column holding `YYYY-MM-DD...` dates, matched against date-range filters.
    pub date_column: Option<String>,
    /// Columns whose distinct values are offered as filter options.
    pub option_columns: Vec<String>,
    /// Artificial delay per request.
    pub latency: Duration,
}

/// Serves pages out of rows held in memory, loaded from a CSV file.
#[derive(Debug, Clone)]
pub struct CsvPageSource {
    columns: Vec<String>,
    rows: Vec<Row>,
    options: FixtureOptions,
}

impl CsvPageSource {
    pub fn load(csv_path: &Path, options: FixtureOptions) -> Result<Self> {
        let mut reader = csv::Reader::from_path(csv_path)
            .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
        let headers = reader
            .headers()
            .with_context(|| format!("failed to read headers from csv: {}", csv_path.display()))?
            .clone();

        if headers.is_empty() {
            anyhow::bail!("csv header is required")
        }

        let columns: Vec<String> = headers.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.context("failed to parse csv record")?;
            let row: Row = columns
                .iter()
                .enumerate()
                .map(|(col_idx, name)| {
                    let value = record.get(col_idx).unwrap_or("");
                    (name.clone(), Value::String(value.to_string()))
                })
                .collect();
            rows.push(row);
        }

        tracing::info!(
            path = %csv_path.display(),
            rows = rows.len(),
            columns = columns.len(),
            "loaded csv fixture"
        );
        Ok(Self::from_rows(columns, rows, options))
    }

    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>, options: FixtureOptions) -> Self {
        Self {
            columns,
            rows,
            options,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn matching(&self, query: &ListQuery) -> Vec<&Row> {
        let needle = query.search.trim().to_lowercase();
        let mut matched: Vec<&Row> = self
            .rows
            .iter()
            .filter(|row| {
                needle.is_empty()
                    || row
                        .values()
                        .any(|value| value_text(value).to_lowercase().contains(&needle))
            })
            .filter(|row| {
                query
                    .filters
                    .iter()
                    .all(|(name, value)| self.row_matches(row, name, value))
            })
            .collect();

        if let (Some(column), Some(order)) = (&self.options.sort_column, query.sort_order) {
            matched.sort_by(|a, b| {
                let ordering = cell_text(a, column).cmp(&cell_text(b, column));
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        matched
    }

    fn row_matches(&self, row: &Row, name: &str, value: &FilterValue) -> bool {
        match value {
            FilterValue::Single(Some(selected)) => cell_text(row, name) == *selected,
            FilterValue::Single(None) => true,
            FilterValue::Multi(values) => {
                values.is_empty() || values.iter().any(|v| *v == cell_text(row, name))
            }
            FilterValue::Toggle(Some(flag)) => {
                cell_text(row, name).eq_ignore_ascii_case(&flag.to_string())
            }
            FilterValue::Toggle(None) => true,
            FilterValue::DateRange(range) => match &self.options.date_column {
                Some(column) if !range.is_empty() => date_in_range(&cell_text(row, column), range),
                _ => true,
            },
        }
    }

    fn filter_options(&self) -> BTreeMap<String, Vec<String>> {
        self.options
            .option_columns
            .iter()
            .map(|column| {
                let distinct: BTreeSet<String> = self
                    .rows
                    .iter()
                    .map(|row| cell_text(row, column))
                    .filter(|text| !text.trim().is_empty())
                    .collect();
                (column.clone(), distinct.into_iter().collect())
            })
            .collect()
    }

    async fn delay(&self, cancel: &CancellationToken) -> Result<(), SourceError> {
        if self.options.latency.is_zero() {
            return Ok(());
        }
        tokio::select! {
            _ = cancel.cancelled() => Err(SourceError::Cancelled),
            _ = tokio::time::sleep(self.options.latency) => Ok(()),
        }
    }
}

#[async_trait]
impl PageSource for CsvPageSource {
    async fn fetch_page(
        &self,
        request: &PageRequest,
        cancel: CancellationToken,
    ) -> Result<PageResponse, SourceError> {
        self.delay(&cancel).await?;

        let query = &request.query;
        let matched = self.matching(query);
        let page_size = query.rows_per_page.get() as usize;
        let total_count = matched.len();
        let total_pages = total_count.div_ceil(page_size) as u32;
        let offset = (query.page.max(1) as usize - 1) * page_size;

        Ok(PageResponse {
            rows: matched
                .into_iter()
                .skip(offset)
                .take(page_size)
                .cloned()
                .collect(),
            total_pages,
            current_page: Some(query.page.max(1)),
            total_count: Some(total_count as u64),
            filter_options: self.filter_options(),
        })
    }

    async fn export_csv(
        &self,
        request: &PageRequest,
        cancel: CancellationToken,
    ) -> Result<String, SourceError> {
        self.delay(&cancel).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&self.columns)
            .map_err(|err| SourceError::Export(err.to_string()))?;
        for row in self.matching(&request.query) {
            let record: Vec<String> = self
                .columns
                .iter()
                .map(|column| cell_text(row, column))
                .collect();
            writer
                .write_record(&record)
                .map_err(|err| SourceError::Export(err.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| SourceError::Export(err.to_string()))?;
        String::from_utf8(bytes).map_err(|err| SourceError::Export(err.to_string()))
    }
}

fn cell_text(row: &Row, column: &str) -> String {
    lookup(row, column).map(value_text).unwrap_or_default()
}

fn date_in_range(text: &str, range: &DateRange) -> bool {
    let Some(date) = text
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    else {
        return false;
    };
    range.start.map_or(true, |start| date >= start) && range.end.map_or(true, |end| date <= end)
}
