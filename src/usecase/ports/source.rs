use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::domain::entities::query::ListQuery;
use crate::domain::entities::row::Row;

/// Monotonic id of an issued request. Only the newest one may touch visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub ticket: RequestTicket,
    pub query: ListQuery,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResponse {
    pub rows: Vec<Row>,
    pub total_pages: u32,
    /// Page the backend actually served, when it says so.
    pub current_page: Option<u32>,
    pub total_count: Option<u64>,
    /// Distinct values per filter field, offered by some endpoints.
    pub filter_options: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("csv export failed: {0}")]
    Export(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("request timed out after {0:?}")]
    TimedOut(Duration),

    #[error("{0} is not supported by this source")]
    Unsupported(&'static str),
}

/// The injected fetch. Implementations should return promptly with
/// `SourceError::Cancelled` once `cancel` fires.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(
        &self,
        request: &PageRequest,
        cancel: CancellationToken,
    ) -> Result<PageResponse, SourceError>;

    /// Raw CSV for every row matching `request`, ignoring pagination.
    async fn export_csv(
        &self,
        _request: &PageRequest,
        _cancel: CancellationToken,
    ) -> Result<String, SourceError> {
        Err(SourceError::Unsupported("csv export"))
    }
}
