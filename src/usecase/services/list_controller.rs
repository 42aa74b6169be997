use tokio_util::sync::CancellationToken;

use crate::domain::entities::filter::{FieldSpec, FilterSelection};
use crate::domain::entities::pagination::{PageSize, PaginationState};
use crate::domain::entities::query::{ListQuery, SortOrder};
use crate::usecase::ports::source::{PageRequest, PageResponse, RequestTicket, SourceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading(RequestTicket),
    Loaded,
    Errored(String),
}

/// A request the caller has to run. Its token is cancelled as soon as a newer
/// request is issued.
#[derive(Debug, Clone)]
#[must_use = "an issued request has to be fetched or the grid stays loading"]
pub struct IssuedRequest {
    pub request: PageRequest,
    pub cancel: CancellationToken,
}

impl IssuedRequest {
    pub fn ticket(&self) -> RequestTicket {
        self.request.ticket
    }
}

#[derive(Debug)]
pub enum Settled {
    /// Superseded by a newer request; nothing was applied.
    Stale,
    /// Applied. `corrective` is set when the current page no longer exists and
    /// must be re-fetched.
    Loaded { corrective: Option<IssuedRequest> },
    Errored(String),
    /// The latest request was cancelled without a replacement.
    Aborted,
}

/// Single owner of list parameters: page, size, search, filters, sort.
/// Every change hands back the request that reflects it.
#[derive(Debug)]
pub struct ListViewController {
    query: ListQuery,
    /// Query behind the rows on screen; `abort` falls back to it.
    shown: ListQuery,
    total_pages: Option<u32>,
    fields: Vec<FieldSpec>,
    phase: LoadPhase,
    issued: u64,
    in_flight: Option<CancellationToken>,
}

impl ListViewController {
    pub fn new(
        rows_per_page: PageSize,
        sort_order: Option<SortOrder>,
        fields: Vec<FieldSpec>,
    ) -> Self {
        let mut query = ListQuery::new(rows_per_page);
        query.sort_order = sort_order;
        Self {
            shown: query.clone(),
            query,
            total_pages: None,
            fields,
            phase: LoadPhase::Idle,
            issued: 0,
            in_flight: None,
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, LoadPhase::Loading(_))
    }

    pub fn pagination(&self) -> PaginationState {
        PaginationState {
            current_page: self.query.page,
            rows_per_page: self.query.rows_per_page,
            total_pages: self.total_pages,
        }
    }

    /// Request for the current parameters, e.g. on mount or after a mutation.
    pub fn refresh(&mut self) -> IssuedRequest {
        self.issue()
    }

    pub fn set_page(&mut self, page: u32) -> Option<IssuedRequest> {
        let Some(page) = self.pagination().accept_page(page) else {
            tracing::debug!(page, total = ?self.total_pages, "rejected out-of-range page");
            return None;
        };
        if page == self.query.page {
            return None;
        }
        self.query.page = page;
        Some(self.issue())
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: PageSize) -> Option<IssuedRequest> {
        if rows_per_page == self.query.rows_per_page {
            return None;
        }
        self.query.rows_per_page = rows_per_page;
        self.query.page = 1;
        Some(self.issue())
    }

    pub fn set_search(&mut self, search: &str) -> Option<IssuedRequest> {
        if search == self.query.search {
            return None;
        }
        self.query.search = search.to_string();
        self.query.page = 1;
        Some(self.issue())
    }

    /// Replaces the whole selection; nothing from the previous one survives.
    pub fn apply_filters(&mut self, selection: FilterSelection) -> IssuedRequest {
        self.query.filters = selection;
        self.query.page = 1;
        self.issue()
    }

    pub fn clear_filters(&mut self) -> IssuedRequest {
        let cleared = FilterSelection::cleared(&self.fields);
        self.apply_filters(cleared)
    }

    pub fn toggle_sort(&mut self) -> IssuedRequest {
        let next = self.query.sort_order.map_or(SortOrder::Asc, SortOrder::toggled);
        self.query.sort_order = Some(next);
        self.query.page = 1;
        self.issue()
    }

    /// Cancels whatever is in flight and goes back to idle. Parameters changed
    /// since the last settled response are rolled back with it.
    pub fn abort(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        if self.is_loading() && self.query != self.shown {
            tracing::debug!(
                from = self.query.page,
                to = self.shown.page,
                "rolling back unfetched parameters"
            );
            self.query = self.shown.clone();
        }
        self.phase = LoadPhase::Idle;
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Records the outcome of `ticket`. Anything but the newest ticket is dropped.
    pub fn settle(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<&PageResponse, &SourceError>,
    ) -> Settled {
        if !self.is_latest(ticket) || !matches!(self.phase, LoadPhase::Loading(_)) {
            tracing::debug!(ticket = ticket.0, latest = self.issued, "discarding stale response");
            return Settled::Stale;
        }
        self.in_flight = None;

        match outcome {
            Ok(response) => {
                self.total_pages = Some(response.total_pages);
                if let Some(served) = response.current_page.filter(|page| *page >= 1) {
                    self.query.page = served;
                }
                self.phase = LoadPhase::Loaded;
                self.shown = self.query.clone();

                let corrective = self.pagination().clamped_page().map(|page| {
                    tracing::warn!(
                        from = self.query.page,
                        to = page,
                        "current page beyond last page; clamping and re-fetching"
                    );
                    self.query.page = page;
                    self.issue()
                });
                Settled::Loaded { corrective }
            }
            Err(SourceError::Cancelled) => {
                self.phase = LoadPhase::Idle;
                Settled::Aborted
            }
            Err(err) => {
                let message = err.to_string();
                self.shown = self.query.clone();
                self.phase = LoadPhase::Errored(message.clone());
                Settled::Errored(message)
            }
        }
    }

    fn issue(&mut self) -> IssuedRequest {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }
        self.issued += 1;
        let ticket = RequestTicket(self.issued);
        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());
        self.phase = LoadPhase::Loading(ticket);
        tracing::debug!(ticket = ticket.0, page = self.query.page, "issuing page request");
        IssuedRequest {
            request: PageRequest {
                ticket,
                query: self.query.clone(),
            },
            cancel,
        }
    }
}
