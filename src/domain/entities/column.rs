use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use crate::domain::entities::cell::CellContent;
use crate::domain::entities::row::{lookup, Row};

type RenderFn = Arc<dyn Fn(&Value, &Row) -> CellContent + Send + Sync>;

/// Custom cell renderer. Receives the accessor's value (or `null`) and the whole row.
#[derive(Clone)]
pub struct CellRenderer(RenderFn);

impl CellRenderer {
    pub fn new(render: impl Fn(&Value, &Row) -> CellContent + Send + Sync + 'static) -> Self {
        Self(Arc::new(render))
    }

    pub fn call(&self, value: &Value, row: &Row) -> CellContent {
        (self.0)(value, row)
    }
}

impl fmt::Debug for CellRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CellRenderer(..)")
    }
}

impl PartialEq for CellRenderer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    Text(String),
    /// Clicking the header flips the list's sort order.
    SortToggle(String),
}

impl Header {
    pub fn label(&self) -> &str {
        match self {
            Header::Text(label) | Header::SortToggle(label) => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    Plain {
        accessor: String,
    },
    Custom {
        accessor: Option<String>,
        render: CellRenderer,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: Header,
    pub kind: ColumnKind,
    pub header_class: Option<String>,
}

impl Column {
    pub fn plain(header: impl Into<String>, accessor: impl Into<String>) -> Self {
        Self {
            header: Header::Text(header.into()),
            kind: ColumnKind::Plain {
                accessor: accessor.into(),
            },
            header_class: None,
        }
    }

    pub fn custom(
        header: impl Into<String>,
        accessor: Option<&str>,
        render: impl Fn(&Value, &Row) -> CellContent + Send + Sync + 'static,
    ) -> Self {
        Self {
            header: Header::Text(header.into()),
            kind: ColumnKind::Custom {
                accessor: accessor.map(str::to_string),
                render: CellRenderer::new(render),
            },
            header_class: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.header = Header::SortToggle(self.header.label().to_string());
        self
    }

    pub fn with_header_class(mut self, class: impl Into<String>) -> Self {
        self.header_class = Some(class.into());
        self
    }

    pub fn accessor(&self) -> Option<&str> {
        match &self.kind {
            ColumnKind::Plain { accessor } => Some(accessor),
            ColumnKind::Custom { accessor, .. } => accessor.as_deref(),
        }
    }

    /// Computes the cell for `row`. A panicking renderer only spoils its own cell.
    pub fn cell(&self, row: &Row) -> CellContent {
        match &self.kind {
            ColumnKind::Plain { accessor } => {
                CellContent::Value(lookup(row, accessor).cloned().unwrap_or(Value::Null))
            }
            ColumnKind::Custom { accessor, render } => {
                let raw = accessor
                    .as_deref()
                    .and_then(|accessor| lookup(row, accessor))
                    .unwrap_or(&Value::Null);
                match catch_unwind(AssertUnwindSafe(|| render.call(raw, row))) {
                    Ok(content) => content,
                    Err(_) => {
                        tracing::warn!(
                            column = self.header.label(),
                            "cell renderer panicked; rendering failure marker"
                        );
                        CellContent::Failed
                    }
                }
            }
        }
    }
}
