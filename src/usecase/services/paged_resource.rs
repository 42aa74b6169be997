use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::domain::entities::filter::{FieldSpec, FilterSelection};
use crate::domain::entities::pagination::{PageSize, PaginationState};
use crate::domain::entities::query::{ListQuery, SortOrder};
use crate::domain::entities::row::Row;
use crate::usecase::ports::source::{
    PageRequest, PageResponse, PageSource, RequestTicket, SourceError,
};
use crate::usecase::services::list_controller::{
    IssuedRequest, ListViewController, LoadPhase, Settled,
};

/// Result of running one issued request.
#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: RequestTicket,
    pub result: Result<PageResponse, SourceError>,
}

/// Runs issued requests against the injected source, racing the request's
/// cancellation token and a timeout.
#[derive(Clone)]
pub struct PageFetcher {
    source: Arc<dyn PageSource>,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new(source: Arc<dyn PageSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    pub fn source(&self) -> Arc<dyn PageSource> {
        self.source.clone()
    }

    pub async fn fetch(&self, issued: IssuedRequest) -> FetchOutcome {
        let IssuedRequest { request, cancel } = issued;
        let ticket = request.ticket;
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(SourceError::Cancelled),
            fetched = tokio::time::timeout(
                self.timeout,
                self.source.fetch_page(&request, cancel.clone()),
            ) => match fetched {
                Ok(result) => result,
                Err(_) => Err(SourceError::TimedOut(self.timeout)),
            },
        };
        if let Err(err) = &result {
            if *err != SourceError::Cancelled {
                tracing::error!(ticket = ticket.0, error = %err, "page fetch failed");
            }
        }
        FetchOutcome { ticket, result }
    }

    pub async fn export_csv(&self, issued: IssuedRequest) -> Result<String, SourceError> {
        let IssuedRequest { request, cancel } = issued;
        tokio::select! {
            _ = cancel.cancelled() => Err(SourceError::Cancelled),
            exported = tokio::time::timeout(
                self.timeout,
                self.source.export_csv(&request, cancel.clone()),
            ) => exported.unwrap_or(Err(SourceError::TimedOut(self.timeout))),
        }
    }
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// What a list screen renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSnapshot {
    pub rows: Vec<Row>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: PaginationState,
    pub total_count: Option<u64>,
    pub query: ListQuery,
}

/// List parameters plus the rows last applied for them. Each parameter change
/// returns the request to run; `apply` takes the outcome back.
#[derive(Debug)]
pub struct PagedResource {
    controller: ListViewController,
    rows: Vec<Row>,
    total_count: Option<u64>,
    filter_options: BTreeMap<String, Vec<String>>,
}

impl PagedResource {
    pub fn new(
        rows_per_page: PageSize,
        sort_order: Option<SortOrder>,
        fields: Vec<FieldSpec>,
    ) -> Self {
        Self {
            controller: ListViewController::new(rows_per_page, sort_order, fields),
            rows: Vec::new(),
            total_count: None,
            filter_options: BTreeMap::new(),
        }
    }

    pub fn controller(&self) -> &ListViewController {
        &self.controller
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn snapshot(&self) -> ResourceSnapshot {
        ResourceSnapshot {
            rows: self.rows.clone(),
            loading: self.controller.is_loading(),
            error: match self.controller.phase() {
                LoadPhase::Errored(message) => Some(message.clone()),
                _ => None,
            },
            pagination: self.controller.pagination(),
            total_count: self.total_count,
            query: self.controller.query().clone(),
        }
    }

    /// Declared filter fields with server-offered options merged in.
    pub fn filter_fields(&self) -> Vec<FieldSpec> {
        self.controller
            .fields()
            .iter()
            .map(|field| field.with_server_options(self.filter_options.get(&field.name)))
            .collect()
    }

    pub fn refetch(&mut self) -> IssuedRequest {
        self.controller.refresh()
    }

    pub fn set_page(&mut self, page: u32) -> Option<IssuedRequest> {
        self.controller.set_page(page)
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: PageSize) -> Option<IssuedRequest> {
        self.controller.set_rows_per_page(rows_per_page)
    }

    pub fn set_search(&mut self, search: &str) -> Option<IssuedRequest> {
        self.controller.set_search(search)
    }

    pub fn apply_filters(&mut self, selection: FilterSelection) -> IssuedRequest {
        self.controller.apply_filters(selection)
    }

    pub fn clear_filters(&mut self) -> IssuedRequest {
        self.controller.clear_filters()
    }

    pub fn toggle_sort(&mut self) -> IssuedRequest {
        self.controller.toggle_sort()
    }

    pub fn abort(&mut self) {
        self.controller.abort();
    }

    /// Request for a CSV export of the current parameters. It carries its own
    /// token and does not disturb the in-flight page request.
    pub fn export_request(&self) -> IssuedRequest {
        IssuedRequest {
            request: PageRequest {
                ticket: RequestTicket(0),
                query: self.controller.query().clone(),
            },
            cancel: CancellationToken::new(),
        }
    }

    /// Applies a finished fetch. Returns the corrective request when the page
    /// had to be clamped.
    pub fn apply(&mut self, outcome: FetchOutcome) -> Option<IssuedRequest> {
        match self.controller.settle(outcome.ticket, outcome.result.as_ref()) {
            Settled::Loaded { corrective } => {
                if let Ok(response) = outcome.result {
                    self.rows = response.rows;
                    self.total_count = response.total_count;
                    if !response.filter_options.is_empty() {
                        self.filter_options = response.filter_options;
                    }
                }
                corrective
            }
            Settled::Errored(_) => {
                self.rows.clear();
                self.total_count = None;
                None
            }
            Settled::Stale | Settled::Aborted => None,
        }
    }
}
