use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::app::row_details;
use crate::config::{badge_tone, format_date, GridConfig, SourceKind};
use crate::domain::entities::cell::{is_empty_value, BadgeTone, CellContent, EMPTY_PLACEHOLDER};
use crate::domain::entities::column::{Column, Header};
use crate::domain::entities::filter::{
    DateRange, FieldSpec, FilterDraft, FilterOption, FilterSelection, FilterValue,
};
use crate::domain::entities::pagination::{
    page_items, serial_number, PageItem, PageSize, PaginationState,
};
use crate::domain::entities::query::{date_param, ListQuery, QueryParamStyle, SortOrder};
use crate::domain::entities::row::{expand_route, lookup, Row, RowRouter, RowTarget};
use crate::infra::fixture::csv_source::{CsvPageSource, FixtureOptions};
use crate::infra::http::rest_source::{decode_page, standard_endpoint, ResponseMap};
use crate::platform::desktop::dirs::{default_config_path, CONFIG_ENV};
use crate::ui::components::data_table::{
    shows_illustration, total_count_label, visible_total_count,
};
use crate::ui::components::filter_panel::{date_input_value, parse_date_input};
use crate::ui::components::grid::{build_grid_view, GridBody, SKELETON_ROWS};
use crate::ui::components::pager::{page_request, pager_view};
use crate::ui::styles::{row_style, table_container_style, table_header_cell_style};
use crate::usecase::ports::source::{
    PageRequest, PageResponse, PageSource, RequestTicket, SourceError,
};
use crate::usecase::services::list_controller::{ListViewController, LoadPhase, Settled};
use crate::usecase::services::paged_resource::{FetchOutcome, PageFetcher, PagedResource};

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("admin-grid-{prefix}-{nanos}"))
}

fn row(value: Value) -> Row {
    value
        .as_object()
        .cloned()
        .expect("row literal should be an object")
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn page_of(page: u32, total_pages: u32) -> PageResponse {
    PageResponse {
        rows: vec![row(json!({ "id": page, "page": page }))],
        total_pages,
        current_page: Some(page),
        total_count: Some(u64::from(total_pages) * 10),
        filter_options: BTreeMap::new(),
    }
}

fn loaded(total_pages: u32) -> PageResponse {
    PageResponse {
        total_pages,
        ..PageResponse::default()
    }
}

/// Controller that has seen one response reporting `total_pages`.
fn controller_with_pages(total_pages: u32) -> ListViewController {
    let mut controller = ListViewController::new(PageSize::Ten, None, Vec::new());
    let first = controller.refresh();
    let settled = controller.settle(first.ticket(), Ok(&loaded(total_pages)));
    assert!(matches!(settled, Settled::Loaded { corrective: None }));
    controller
}

/// In-memory source with per-page latency that honors cancellation.
struct ScriptedSource {
    total_pages: u32,
    delays: HashMap<u32, Duration>,
    calls: Mutex<Vec<ListQuery>>,
}

impl ScriptedSource {
    fn new(total_pages: u32) -> Self {
        Self {
            total_pages,
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn with_delay(mut self, page: u32, delay: Duration) -> Self {
        self.delays.insert(page, delay);
        self
    }

    fn calls(&self) -> Vec<ListQuery> {
        self.calls
            .lock()
            .expect("calls lock should not be poisoned")
            .clone()
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn fetch_page(
        &self,
        request: &PageRequest,
        cancel: CancellationToken,
    ) -> Result<PageResponse, SourceError> {
        self.calls
            .lock()
            .expect("calls lock should not be poisoned")
            .push(request.query.clone());
        let delay = self
            .delays
            .get(&request.query.page)
            .copied()
            .unwrap_or_default();
        tokio::select! {
            _ = cancel.cancelled() => return Err(SourceError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
        Ok(page_of(request.query.page, self.total_pages))
    }
}

fn write_vendor_csv(prefix: &str) -> (PathBuf, PathBuf) {
    let temp_dir = unique_test_dir(prefix);
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let csv_path = temp_dir.join("vendors.csv");
    let mut content = String::from("id,name,country,created_at\n");
    for id in 1..=12 {
        let country = if id % 2 == 0 { "Japan" } else { "India" };
        content.push_str(&format!(
            "{id},Vendor {id:02},{country},2024-01-{id:02}T08:00:00Z\n"
        ));
    }
    fs::write(&csv_path, content).expect("should write csv");
    (temp_dir, csv_path)
}

fn vendor_options() -> FixtureOptions {
    FixtureOptions {
        sort_column: Some("name".to_string()),
        date_column: Some("created_at".to_string()),
        option_columns: vec!["country".to_string()],
        latency: Duration::ZERO,
    }
}

fn request(query: ListQuery) -> PageRequest {
    PageRequest {
        ticket: RequestTicket(1),
        query,
    }
}

#[test]
fn rows_per_page_change_returns_to_first_page() {
    let mut controller = controller_with_pages(8);
    let moved = controller.set_page(3).expect("page 3 should be accepted");
    assert_eq!(moved.request.query.page, 3);

    let resized = controller
        .set_rows_per_page(PageSize::Fifty)
        .expect("size change should issue a request");

    assert_eq!(resized.request.query.page, 1);
    assert_eq!(resized.request.query.rows_per_page, PageSize::Fifty);
    assert_eq!(controller.pagination().current_page, 1);
}

#[test]
fn pager_size_change_then_first_page_issues_one_request() {
    let mut controller = controller_with_pages(8);
    let _ = controller.set_page(4).expect("page 4 should be accepted");

    let resized = controller.set_rows_per_page(PageSize::Twenty);
    let first_page = controller.set_page(1);

    assert!(resized.is_some());
    assert!(first_page.is_none(), "page 1 is already current after a resize");
}

#[test]
fn out_of_range_pages_are_rejected() {
    let mut controller = controller_with_pages(5);

    assert!(controller.set_page(0).is_none());
    assert!(controller.set_page(6).is_none());
    assert!(controller.set_page(1).is_none(), "unchanged page issues nothing");
    assert!(controller.set_page(5).is_some());

    assert_eq!(page_request(0, 5), None);
    assert_eq!(page_request(6, 5), None);
    assert_eq!(page_request(5, 5), Some(5));
}

#[test]
fn serial_number_continues_across_pages() {
    assert_eq!(serial_number(3, 20, 0), 41);
    assert_eq!(serial_number(1, 10, 9), 10);

    let state = PaginationState {
        current_page: 3,
        rows_per_page: PageSize::Twenty,
        total_pages: Some(5),
    };
    assert_eq!(state.serial_number(0), 41);
    assert_eq!(state.serial_number(19), 60);
}

#[test]
fn pager_renders_nothing_without_pages() {
    assert!(pager_view(1, 0).is_none());

    let view = pager_view(1, 4).expect("pager should render with pages");
    assert!(view.prev_disabled);
    assert!(!view.next_disabled);

    let last = pager_view(4, 4).expect("pager should render on last page");
    assert!(!last.prev_disabled);
    assert!(last.next_disabled);
}

#[test]
fn page_items_show_window_with_ellipses() {
    use PageItem::{Ellipsis, Page};

    assert_eq!(page_items(1, 10), vec![Page(1), Page(2), Page(3), Ellipsis, Page(10)]);
    assert_eq!(
        page_items(5, 10),
        vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
    );
    assert_eq!(page_items(10, 10), vec![Page(1), Ellipsis, Page(9), Page(10)]);
    assert_eq!(page_items(2, 3), vec![Page(1), Page(2), Page(3)]);
    assert_eq!(page_items(3, 4), vec![Page(1), Page(2), Page(3), Page(4)]);
    assert!(page_items(1, 0).is_empty());
}

#[test]
fn empty_rows_render_no_data_state() {
    let columns = vec![Column::plain("Name", "name")];
    let pagination = PaginationState::new(PageSize::Ten);

    let view = build_grid_view(&columns, &[], false, None, true, &pagination, None);

    assert_eq!(view.body, GridBody::Empty);
    assert_eq!(view.headers.len(), 2);
}

#[test]
fn loading_renders_skeleton_rows() {
    let columns = vec![Column::plain("Name", "name"), Column::plain("Country", "country")];
    let pagination = PaginationState::new(PageSize::Ten);
    let rows = vec![row(json!({ "name": "Acme" }))];

    let view = build_grid_view(&columns, &rows, true, None, true, &pagination, None);

    assert_eq!(
        view.body,
        GridBody::Skeleton {
            rows: SKELETON_ROWS,
            columns: 3,
        }
    );
    assert_eq!(SKELETON_ROWS, 20);
}

#[test]
fn fetch_error_renders_failure_state() {
    let columns = vec![Column::plain("Name", "name")];
    let pagination = PaginationState::new(PageSize::Ten);

    let view = build_grid_view(
        &columns,
        &[],
        false,
        Some("server answered 500: boom"),
        false,
        &pagination,
        None,
    );

    assert_eq!(
        view.body,
        GridBody::Failed("server answered 500: boom".to_string())
    );
}

#[test]
fn zero_survives_pass_through_renderer() {
    let column = Column::custom("Count", Some("count"), |value, _| {
        CellContent::Value(value.clone())
    });
    let zero = column.cell(&row(json!({ "count": 0 })));
    assert_eq!(zero.display_text(), "0");

    let plain = Column::plain("Flag", "flag");
    assert_eq!(plain.cell(&row(json!({ "flag": false }))).display_text(), "false");
    assert_eq!(plain.cell(&row(json!({ "flag": "0" }))).display_text(), "0");
    assert_eq!(plain.cell(&row(json!({}))).display_text(), EMPTY_PLACEHOLDER);
}

#[test]
fn emptiness_only_covers_missing_values() {
    for empty in [json!(null), json!(""), json!("   "), json!([]), json!({})] {
        assert!(is_empty_value(&empty), "{empty} should be empty");
    }
    for present in [json!(0), json!(false), json!("0"), json!([0]), json!({ "a": null })] {
        assert!(!is_empty_value(&present), "{present} should be a value");
    }
}

#[test]
fn panicking_renderer_only_fails_its_cell() {
    let columns = vec![
        Column::plain("Name", "name"),
        Column::custom("Broken", Some("name"), |_, _| panic!("renderer bug")),
    ];
    let pagination = PaginationState::new(PageSize::Ten);
    let rows = vec![row(json!({ "name": "Acme" }))];

    let view = build_grid_view(&columns, &rows, false, None, false, &pagination, None);

    let GridBody::Rows(grid_rows) = &view.body else {
        panic!("expected rows, got {:?}", view.body);
    };
    assert_eq!(grid_rows[0].cells[0], CellContent::Value(json!("Acme")));
    assert_eq!(grid_rows[0].cells[1], CellContent::Failed);
}

#[test]
fn rows_without_target_are_not_clickable() {
    let columns = vec![Column::plain("Name", "name")];
    let pagination = PaginationState {
        current_page: 3,
        rows_per_page: PageSize::Twenty,
        total_pages: Some(3),
    };
    let router = RowRouter::from_template("/vendors/{id}");
    let rows = vec![
        row(json!({ "id": 7, "name": "Acme" })),
        row(json!({ "name": "No id" })),
        row(json!({ "id": "  ", "name": "Blank id" })),
    ];

    let view = build_grid_view(&columns, &rows, false, None, true, &pagination, Some(&router));

    let GridBody::Rows(grid_rows) = &view.body else {
        panic!("expected rows, got {:?}", view.body);
    };
    assert_eq!(
        grid_rows[0].target,
        Some(RowTarget::Route("/vendors/7".to_string()))
    );
    assert_eq!(grid_rows[1].target, None);
    assert_eq!(grid_rows[2].target, None);
    assert_eq!(grid_rows[0].serial, Some(41));
    assert_eq!(grid_rows[2].serial, Some(43));
    assert_eq!(row_style(false), "");
    assert!(row_style(true).contains("cursor: pointer"));
}

#[test]
fn sort_toggle_header_is_marked() {
    let columns = vec![Column::plain("Created", "created_at").sortable()];
    let pagination = PaginationState::new(PageSize::Ten);

    let view = build_grid_view(&columns, &[], false, None, false, &pagination, None);

    assert!(view.headers[0].sort_toggle);
    assert_eq!(columns[0].header, Header::SortToggle("Created".to_string()));
}

#[test]
fn row_lookup_follows_dotted_paths() {
    let record = row(json!({
        "meta.id": "flat",
        "meta": { "id": "nested", "tags": ["a", "b"] }
    }));

    assert_eq!(lookup(&record, "meta.id"), Some(&json!("flat")));
    assert_eq!(lookup(&record, "meta.tags.1"), Some(&json!("b")));
    assert_eq!(lookup(&record, "meta.missing"), None);
    assert_eq!(
        expand_route("/items/{meta.tags.0}/edit", &record),
        Some("/items/a/edit".to_string())
    );
}

#[test]
fn apply_then_clear_issues_single_unfiltered_request() {
    let fields = vec![FieldSpec::multi(
        "dpr_country",
        "Country",
        vec![FilterOption::same("India")],
    )];
    let style = QueryParamStyle::default();
    let mut controller = ListViewController::new(PageSize::Ten, None, fields);

    let applied = controller.apply_filters(FilterSelection::new().with(
        "dpr_country",
        FilterValue::Multi(vec!["India".to_string()]),
    ));
    assert!(applied
        .request
        .query
        .to_pairs(&style)
        .contains(&("dpr_country_query".to_string(), "India".to_string())));

    let cleared = controller.clear_filters();

    assert!(applied.cancel.is_cancelled());
    assert!(!cleared.cancel.is_cancelled());
    assert_eq!(cleared.ticket(), RequestTicket(2));
    assert!(!controller.query().filters.is_active());
    assert_eq!(
        controller.query().filters.get("dpr_country"),
        Some(&FilterValue::Multi(Vec::new()))
    );
    assert_eq!(
        cleared.request.query.to_pairs(&style),
        pairs(&[("page", "1"), ("limit", "10")])
    );
}

#[test]
fn applying_filters_replaces_previous_selection() {
    let mut controller = controller_with_pages(6);
    let _ = controller.set_page(4).expect("page 4 should be accepted");
    let _ = controller.apply_filters(
        FilterSelection::new().with("status", FilterValue::Single(Some("draft".to_string()))),
    );

    let second = controller.apply_filters(
        FilterSelection::new().with("country", FilterValue::Multi(vec!["Japan".to_string()])),
    );

    assert_eq!(second.request.query.page, 1);
    assert_eq!(second.request.query.filters.get("status"), None);
    assert_eq!(
        second.request.query.filters.get("country"),
        Some(&FilterValue::Multi(vec!["Japan".to_string()]))
    );
}

#[test]
fn search_change_resets_page_and_ignores_repeats() {
    let mut controller = controller_with_pages(6);
    let _ = controller.set_page(3).expect("page 3 should be accepted");

    let searched = controller.set_search("acme").expect("search should issue a request");
    assert_eq!(searched.request.query.page, 1);
    assert!(controller.set_search("acme").is_none());
}

#[test]
fn sort_toggle_flips_order_and_resets_page() {
    let mut controller = controller_with_pages(6);
    let _ = controller.set_page(2).expect("page 2 should be accepted");

    let first = controller.toggle_sort();
    assert_eq!(first.request.query.sort_order, Some(SortOrder::Asc));
    assert_eq!(first.request.query.page, 1);

    let second = controller.toggle_sort();
    assert_eq!(second.request.query.sort_order, Some(SortOrder::Desc));
}

#[test]
fn shrinking_result_clamps_page_and_refetches() {
    let mut controller = controller_with_pages(5);
    let moved = controller.set_page(5).expect("page 5 should be accepted");

    let settled = controller.settle(moved.ticket(), Ok(&loaded(3)));

    let Settled::Loaded {
        corrective: Some(corrective),
    } = &settled
    else {
        panic!("expected a corrective request, got {settled:?}");
    };
    assert_eq!(corrective.request.query.page, 3);
    assert_eq!(controller.pagination().current_page, 3);
    assert!(controller.is_loading());
}

#[test]
fn empty_result_does_not_clamp_first_page() {
    let mut controller = ListViewController::new(PageSize::Ten, None, Vec::new());
    let first = controller.refresh();

    let settled = controller.settle(first.ticket(), Ok(&loaded(0)));

    assert!(matches!(settled, Settled::Loaded { corrective: None }));
    assert_eq!(controller.phase(), &LoadPhase::Loaded);
}

#[test]
fn server_reported_page_is_adopted() {
    let mut controller = controller_with_pages(9);
    let moved = controller.set_page(7).expect("page 7 should be accepted");
    let response = PageResponse {
        current_page: Some(6),
        ..loaded(9)
    };

    let settled = controller.settle(moved.ticket(), Ok(&response));

    assert!(matches!(settled, Settled::Loaded { corrective: None }));
    assert_eq!(controller.pagination().current_page, 6);
}

#[test]
fn abort_cancels_in_flight_request() {
    let mut controller = ListViewController::new(PageSize::Ten, None, Vec::new());
    let issued = controller.refresh();

    controller.abort();

    assert!(issued.cancel.is_cancelled());
    assert_eq!(controller.phase(), &LoadPhase::Idle);
    let settled = controller.settle(issued.ticket(), Err(&SourceError::Cancelled));
    assert!(matches!(settled, Settled::Stale));
}

#[test]
fn failed_fetch_moves_to_errored() {
    let mut controller = ListViewController::new(PageSize::Ten, None, Vec::new());
    let issued = controller.refresh();
    let error = SourceError::Status {
        status: 502,
        body: "bad gateway".to_string(),
    };

    let settled = controller.settle(issued.ticket(), Err(&error));

    assert!(matches!(settled, Settled::Errored(_)));
    assert_eq!(
        controller.phase(),
        &LoadPhase::Errored("server answered 502: bad gateway".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn rapid_page_changes_show_only_the_last_page() {
    let source = Arc::new(
        ScriptedSource::new(10)
            .with_delay(2, Duration::from_millis(300))
            .with_delay(5, Duration::from_millis(100)),
    );
    let fetcher = PageFetcher::new(source.clone(), Duration::from_secs(15));
    let mut resource = PagedResource::new(PageSize::Ten, None, Vec::new());
    let first = fetcher.fetch(resource.refetch()).await;
    assert!(resource.apply(first).is_none());

    let to_two = resource.set_page(2).expect("page 2 should be accepted");
    let to_five = resource.set_page(5).expect("page 5 should be accepted");
    assert!(to_two.cancel.is_cancelled());
    assert!(!to_five.cancel.is_cancelled());
    let stale_ticket = to_two.ticket();

    let (two, five) = tokio::join!(fetcher.fetch(to_two), fetcher.fetch(to_five));

    assert_eq!(two.result, Err(SourceError::Cancelled));
    assert!(resource.apply(five).is_none());
    assert!(resource.apply(two).is_none());

    let late = FetchOutcome {
        ticket: stale_ticket,
        result: Ok(page_of(2, 10)),
    };
    assert!(resource.apply(late).is_none());

    let snapshot = resource.snapshot();
    assert_eq!(snapshot.pagination.current_page, 5);
    assert_eq!(snapshot.rows, vec![row(json!({ "id": 5, "page": 5 }))]);
    assert!(!snapshot.loading);
    assert_eq!(source.calls().last().map(|query| query.page), Some(5));
}

#[tokio::test(start_paused = true)]
async fn slow_fetch_times_out_into_error() {
    let source = Arc::new(ScriptedSource::new(3).with_delay(1, Duration::from_secs(60)));
    let fetcher = PageFetcher::new(source, Duration::from_secs(15));
    let mut resource = PagedResource::new(PageSize::Ten, None, Vec::new());

    let outcome = fetcher.fetch(resource.refetch()).await;

    assert_eq!(
        outcome.result,
        Err(SourceError::TimedOut(Duration::from_secs(15)))
    );
    assert!(resource.apply(outcome).is_none());
    let snapshot = resource.snapshot();
    assert!(!snapshot.loading);
    assert!(snapshot.error.is_some());
    assert!(snapshot.rows.is_empty());
}

#[tokio::test]
async fn export_request_leaves_page_request_running() {
    let source = Arc::new(ScriptedSource::new(2));
    let fetcher = PageFetcher::new(source, Duration::from_secs(15));
    let mut resource = PagedResource::new(PageSize::Ten, None, Vec::new());
    let page = resource.refetch();

    let export = resource.export_request();
    assert!(!page.cancel.is_cancelled());

    let exported = fetcher.export_csv(export).await;
    assert_eq!(exported, Err(SourceError::Unsupported("csv export")));
    assert!(resource.apply(fetcher.fetch(page).await).is_none());
    assert_eq!(resource.rows().len(), 1);
}

#[test]
fn illustration_only_without_search_or_filters() {
    let mut resource = PagedResource::new(PageSize::Ten, None, Vec::new());
    let first = resource.refetch();
    assert!(resource
        .apply(FetchOutcome {
            ticket: first.ticket(),
            result: Ok(loaded(0)),
        })
        .is_none());
    assert!(shows_illustration(&resource.snapshot()));

    let searched = resource.set_search("nothing").expect("search should issue a request");
    assert!(resource
        .apply(FetchOutcome {
            ticket: searched.ticket(),
            result: Ok(loaded(0)),
        })
        .is_none());
    assert!(!shows_illustration(&resource.snapshot()));

    assert_eq!(total_count_label(42), "42 : Total Count");
}

#[test]
fn server_filter_options_merge_into_fields() {
    let fields = vec![FieldSpec::single(
        "country",
        "Country",
        vec![FilterOption::same("India")],
    )];
    let mut resource = PagedResource::new(PageSize::Ten, None, fields);
    let first = resource.refetch();
    let mut response = loaded(1);
    response.filter_options.insert(
        "country".to_string(),
        vec!["Japan".to_string(), "India".to_string()],
    );

    assert!(resource
        .apply(FetchOutcome {
            ticket: first.ticket(),
            result: Ok(response),
        })
        .is_none());

    let merged = resource.filter_fields();
    assert_eq!(
        merged[0].options(),
        &[FilterOption::same("India"), FilterOption::same("Japan")]
    );
}

#[test]
fn filter_draft_accumulates_and_clears() {
    let fields = vec![
        FieldSpec::multi("country", "Country", Vec::new()),
        FieldSpec::single("status", "Status", Vec::new()),
        FieldSpec::toggle("active", "Active"),
        FieldSpec::date_range("created", "Created"),
    ];
    let mut draft = FilterDraft::default();
    assert!(!draft.can_apply());

    draft.toggle_multi("country", "India");
    draft.toggle_multi("country", "Japan");
    draft.set_single("status", Some("published".to_string()));
    draft.toggle_multi("country", "India");

    let submitted = draft.submit();
    assert!(draft.can_apply());
    assert_eq!(
        submitted.get("country"),
        Some(&FilterValue::Multi(vec!["Japan".to_string()]))
    );
    assert_eq!(
        submitted.get("status"),
        Some(&FilterValue::Single(Some("published".to_string())))
    );

    draft.clear(&fields);
    assert!(!draft.can_apply());
    assert_eq!(draft.submit(), FilterSelection::cleared(&fields));
    assert_eq!(
        draft.selection().get("active"),
        Some(&FilterValue::Toggle(None))
    );
}

#[test]
fn query_pairs_follow_param_style() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 5).expect("valid date");
    let end = NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date");
    let mut query = ListQuery::new(PageSize::Twenty);
    query.page = 2;
    query.search = "  ".to_string();
    query.sort_order = Some(SortOrder::Desc);
    query.filters = FilterSelection::new()
        .with(
            "country",
            FilterValue::Multi(vec!["India".to_string(), "Japan".to_string()]),
        )
        .with(
            "created",
            FilterValue::DateRange(DateRange {
                start: Some(start),
                end: Some(end),
            }),
        )
        .with("is_active", FilterValue::Toggle(Some(false)))
        .with("status", FilterValue::Single(None));
    let style = QueryParamStyle {
        limit: "page_size".to_string(),
        ..QueryParamStyle::default()
    };

    assert_eq!(
        query.to_pairs(&style),
        pairs(&[
            ("page", "2"),
            ("page_size", "20"),
            ("country_query", "India"),
            ("country_query", "Japan"),
            ("start_date", "2024-01-05T00:00:00.000Z"),
            ("end_date", "2024-02-01T00:00:00.000Z"),
            ("is_active", "false"),
            ("sort_order", "desc"),
        ])
    );
    assert_eq!(date_param(start), "2024-01-05T00:00:00.000Z");
}

#[test]
fn standard_endpoint_appends_query() {
    let style = QueryParamStyle {
        limit: "page_size".to_string(),
        ..QueryParamStyle::default()
    };
    let endpoint = standard_endpoint("https://api.example.com/", "/v1/vendors", style);
    let mut query = ListQuery::new(PageSize::Twenty);
    query.page = 2;
    query.search = "acme".to_string();
    query.filters = FilterSelection::new().with(
        "dpr_country",
        FilterValue::Multi(vec!["India".to_string(), "Japan".to_string()]),
    );

    let url = endpoint(&query).expect("url should build");

    assert_eq!(
        url.as_str(),
        "https://api.example.com/v1/vendors?page=2&page_size=20&search=acme&dpr_country_query=India&dpr_country_query=Japan"
    );
}

#[test]
fn decode_page_reads_nested_pagination() {
    let body = json!({
        "data": [{ "id": 1 }, { "id": 2 }],
        "pagination": { "total_pages": 4, "current_page": 2 },
        "filter_options": { "country": ["India", "", "Japan"] }
    });

    let page = decode_page(&body, &ResponseMap::default(), &ListQuery::new(PageSize::Ten))
        .expect("body should decode");

    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.total_pages, 4);
    assert_eq!(page.current_page, Some(2));
    assert_eq!(page.total_count, None);
    assert_eq!(
        page.filter_options.get("country"),
        Some(&vec!["India".to_string(), "Japan".to_string()])
    );
}

#[test]
fn decode_page_derives_pages_from_count() {
    let body = json!({ "data": [], "total": 25 });

    let page = decode_page(&body, &ResponseMap::default(), &ListQuery::new(PageSize::Ten))
        .expect("body should decode");

    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_count, Some(25));
}

#[test]
fn decode_page_rejects_non_object_rows() {
    let body = json!({ "data": [1, 2] });

    let result = decode_page(&body, &ResponseMap::default(), &ListQuery::new(PageSize::Ten));

    assert!(matches!(result, Err(SourceError::Decode(_))));
}

#[tokio::test]
async fn csv_fixture_pages_and_counts() {
    let (temp_dir, csv_path) = write_vendor_csv("fixture-pages");
    let source = CsvPageSource::load(&csv_path, vendor_options()).expect("csv should load");
    let mut query = ListQuery::new(PageSize::Ten);
    query.page = 2;

    let page = source
        .fetch_page(&request(query), CancellationToken::new())
        .await
        .expect("fetch should succeed");

    assert_eq!(source.columns(), ["id", "name", "country", "created_at"]);
    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.total_count, Some(12));
    assert_eq!(page.current_page, Some(2));
    assert_eq!(
        page.filter_options.get("country"),
        Some(&vec!["India".to_string(), "Japan".to_string()])
    );

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[tokio::test]
async fn csv_fixture_applies_search_filters_and_sort() {
    let (temp_dir, csv_path) = write_vendor_csv("fixture-filters");
    let source = CsvPageSource::load(&csv_path, vendor_options()).expect("csv should load");

    let mut searched = ListQuery::new(PageSize::Ten);
    searched.search = "VENDOR 1".to_string();
    assert_eq!(source.matching(&searched).len(), 3);

    let mut by_country = ListQuery::new(PageSize::Ten);
    by_country.filters = FilterSelection::new().with(
        "country",
        FilterValue::Multi(vec!["India".to_string()]),
    );
    assert_eq!(source.matching(&by_country).len(), 6);

    let mut by_date = ListQuery::new(PageSize::Ten);
    by_date.filters = FilterSelection::new().with(
        "created",
        FilterValue::DateRange(DateRange {
            start: NaiveDate::from_ymd_opt(2024, 1, 3),
            end: NaiveDate::from_ymd_opt(2024, 1, 5),
        }),
    );
    assert_eq!(source.matching(&by_date).len(), 3);

    let mut sorted = ListQuery::new(PageSize::Ten);
    sorted.sort_order = Some(SortOrder::Desc);
    let page = source
        .fetch_page(&request(sorted), CancellationToken::new())
        .await
        .expect("fetch should succeed");
    assert_eq!(page.rows[0].get("name"), Some(&json!("Vendor 12")));

    let exported = source
        .export_csv(&request(by_country), CancellationToken::new())
        .await
        .expect("export should succeed");
    let lines: Vec<&str> = exported.lines().collect();
    assert_eq!(lines[0], "id,name,country,created_at");
    assert_eq!(lines.len(), 7);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn csv_fixture_requires_header() {
    let temp_dir = unique_test_dir("fixture-empty");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let csv_path = temp_dir.join("empty.csv");
    fs::write(&csv_path, "").expect("should write csv");

    let result = CsvPageSource::load(&csv_path, FixtureOptions::default());

    assert!(result.is_err());
    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn partial_config_uses_defaults() {
    let config = GridConfig::parse(
        r#"
        title = "Vendors"

        [source]
        kind = "rest"
        base_url = "https://api.example.com"
        path = "/vendors"

        [source.params]
        limit = "page_size"

        [grid]
        default_page_size = 20
        default_sort = "desc"
        row_route = "/vendors/{id}"

        [[columns]]
        header = "Status"
        accessor = "status"
        kind = "badge"
        sortable = true

        [[columns]]
        header = "Created"
        accessor = "created_at"
        kind = "date"

        [[filters]]
        name = "country"
        label = "Country"
        kind = "multi"
        options = ["India"]
        "#,
    )
    .expect("config should parse");

    assert_eq!(config.title, "Vendors");
    assert_eq!(config.source.kind, SourceKind::Rest);
    assert_eq!(config.source.params.limit, "page_size");
    assert_eq!(config.source.params.page, "page");
    assert_eq!(config.timeout(), Duration::from_secs(15));
    assert_eq!(config.debounce(), Duration::from_millis(500));
    assert_eq!(config.grid.default_page_size, PageSize::Twenty);
    assert_eq!(config.grid.default_sort, Some(SortOrder::Desc));
    assert!(config.grid.has_serial_number);

    let columns = config.columns(&[]);
    assert_eq!(columns[0].header, Header::SortToggle("Status".to_string()));
    assert_eq!(
        columns[0].cell(&row(json!({ "status": "published" }))),
        CellContent::Badge {
            label: "published".to_string(),
            tone: BadgeTone::Positive,
        }
    );
    assert_eq!(
        columns[1]
            .cell(&row(json!({ "created_at": "2026-10-18T09:30:00Z" })))
            .display_text(),
        "18 Oct 2026"
    );

    let fields = config.filter_fields();
    assert_eq!(
        fields[0],
        FieldSpec::multi("country", "Country", vec![FilterOption::same("India")])
    );

    let router = config.row_router().expect("router should be configured");
    assert_eq!(
        router.target_for(&row(json!({ "id": 3 }))),
        Some(RowTarget::Route("/vendors/3".to_string()))
    );
}

#[test]
fn invalid_config_is_rejected() {
    assert!(GridConfig::parse("[source]\nkind = \"rest\"\n").is_err());
    assert!(GridConfig::parse("[grid]\ndefault_page_size = 15\n").is_err());
    assert!(GridConfig::parse("[source]\ntimeout_secs = 0\n").is_err());
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let path = unique_test_dir("missing-config").join("grid.toml");

    let config = GridConfig::load(&path).expect("missing file should not fail");

    assert_eq!(config, GridConfig::default());
    assert_eq!(config.grid.default_page_size, PageSize::Ten);
}

#[test]
fn fixture_config_discovers_columns() {
    let (temp_dir, csv_path) = write_vendor_csv("fixture-config");
    let config = GridConfig::parse(&format!(
        "[source]\nkind = \"fixture\"\nfixture_path = {:?}\n",
        csv_path.display().to_string()
    ))
    .expect("config should parse");

    let built = config.build_source().expect("fixture source should build");
    let columns = config.columns(&built.discovered_columns);

    assert_eq!(columns.len(), 4);
    assert_eq!(columns[1], Column::plain("name", "name"));
    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn config_path_honors_env_override() {
    std::env::set_var(CONFIG_ENV, "/tmp/admin-grid-test/grid.toml");
    let path = default_config_path().expect("path should resolve");
    std::env::remove_var(CONFIG_ENV);

    assert_eq!(path, PathBuf::from("/tmp/admin-grid-test/grid.toml"));
}

#[test]
fn badge_and_date_helpers() {
    assert_eq!(badge_tone("Published"), BadgeTone::Positive);
    assert_eq!(badge_tone("archived"), BadgeTone::Negative);
    assert_eq!(badge_tone("draft"), BadgeTone::Neutral);

    assert_eq!(format_date("2024-03-09"), "09 Mar 2024");
    assert_eq!(format_date("not a date"), "not a date");

    let date = parse_date_input("2024-03-09");
    assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 9));
    assert_eq!(date_input_value(date), "2024-03-09");
    assert_eq!(parse_date_input(""), None);
}

#[test]
fn row_details_pretty_prints() {
    let details = row_details(&row(json!({ "id": 1 })));
    assert!(details.contains("\"id\": 1"));
}

#[test]
fn table_header_cell_style_is_sticky() {
    let style = table_header_cell_style();

    assert!(style.contains("position: sticky"));
    assert!(style.contains("top: 0"));
    assert!(style.contains("z-index"));
}

#[test]
fn table_container_style_allows_scroll() {
    let style = table_container_style();

    assert!(style.contains("overflow: auto"));
    assert!(style.contains("flex: 1"));
    assert!(style.contains("min-height: 0"));
}

#[test]
fn abort_restores_the_page_on_screen() {
    let mut resource = PagedResource::new(PageSize::Twenty, None, Vec::new());
    let first = resource.refetch();
    assert!(resource
        .apply(FetchOutcome {
            ticket: first.ticket(),
            result: Ok(page_of(1, 10)),
        })
        .is_none());

    let moved = resource.set_page(5).expect("page 5 should be accepted");
    resource.abort();
    assert!(moved.cancel.is_cancelled());
    assert!(resource
        .apply(FetchOutcome {
            ticket: moved.ticket(),
            result: Err(SourceError::Cancelled),
        })
        .is_none());

    let snapshot = resource.snapshot();
    assert!(!snapshot.loading);
    assert_eq!(snapshot.pagination.current_page, 1);
    assert_eq!(snapshot.pagination.serial_number(0), 1);
    assert_eq!(snapshot.rows, vec![row(json!({ "id": 1, "page": 1 }))]);
    assert_eq!(resource.export_request().request.query.page, 1);
}

#[test]
fn abort_drops_unfetched_search() {
    let mut controller = controller_with_pages(4);
    let _ = controller.set_search("acme").expect("search should issue a request");

    controller.abort();

    assert_eq!(controller.query().search, "");
    assert_eq!(controller.pagination().current_page, 1);
    assert_eq!(controller.phase(), &LoadPhase::Idle);
    assert!(controller.set_search("acme").is_some(), "search can be retried");
}

#[test]
fn link_column_routes_per_row() {
    let config = GridConfig::parse(
        r#"
        [[columns]]
        header = "Vendor"
        accessor = "name"
        kind = "link"
        route = "/vendors/{id}"
        header_class = "vendor-col"
        sortable = true
        "#,
    )
    .expect("config should parse");

    let columns = config.columns(&[]);
    assert_eq!(columns[0].header, Header::SortToggle("Vendor".to_string()));
    assert_eq!(columns[0].header_class.as_deref(), Some("vendor-col"));

    let linked = columns[0].cell(&row(json!({ "id": 7, "name": "Acme" })));
    assert_eq!(
        linked,
        CellContent::Link {
            label: "Acme".to_string(),
            route: "/vendors/7".to_string(),
        }
    );
    assert_eq!(
        linked.link_target(),
        Some(RowTarget::Route("/vendors/7".to_string()))
    );

    let unlinked = columns[0].cell(&row(json!({ "name": "No id" })));
    assert_eq!(unlinked, CellContent::Text("No id".to_string()));
    assert_eq!(unlinked.link_target(), None);

    let blank = CellContent::Link {
        label: "  ".to_string(),
        route: "/vendors/1".to_string(),
    };
    assert_eq!(blank.link_target(), None);

    let pagination = PaginationState::new(PageSize::Ten);
    let view = build_grid_view(&columns, &[], false, None, false, &pagination, None);
    assert_eq!(view.headers[0].class.as_deref(), Some("vendor-col"));
}

#[test]
fn link_columns_and_date_ranges_are_validated() {
    let routeless = GridConfig::parse(
        "[[columns]]\nheader = \"Vendor\"\naccessor = \"name\"\nkind = \"link\"\n",
    );
    assert!(routeless.is_err());

    let two_ranges = GridConfig::parse(
        r#"
        [[filters]]
        name = "created"
        label = "Created"
        kind = "date_range"

        [[filters]]
        name = "updated"
        label = "Updated"
        kind = "date_range"
        "#,
    );
    assert!(two_ranges.is_err());

    let one_range = GridConfig::parse(
        "[[filters]]\nname = \"created\"\nlabel = \"Created\"\nkind = \"date_range\"\n",
    );
    assert!(one_range.is_ok());
}

#[test]
fn action_targets_run_for_their_rows_only() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let action: Arc<dyn Fn() + Send + Sync> = Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let router = RowRouter::new(move |row| {
        row.get("editable")
            .and_then(Value::as_bool)
            .filter(|editable| *editable)
            .map(|_| RowTarget::Action(action.clone()))
    });
    let columns = vec![Column::plain("Name", "name")];
    let pagination = PaginationState::new(PageSize::Ten);
    let rows = vec![
        row(json!({ "name": "Acme", "editable": true })),
        row(json!({ "name": "Locked", "editable": false })),
        row(json!({ "name": "Plain" })),
    ];

    let view = build_grid_view(&columns, &rows, false, None, false, &pagination, Some(&router));

    let GridBody::Rows(grid_rows) = &view.body else {
        panic!("expected rows, got {:?}", view.body);
    };
    let Some(RowTarget::Action(run)) = &grid_rows[0].target else {
        panic!("expected an action, got {:?}", grid_rows[0].target);
    };
    run();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(grid_rows[1].target, None);
    assert_eq!(grid_rows[2].target, None);
}

#[test]
fn zero_total_count_is_hidden() {
    assert_eq!(visible_total_count(Some(0), true), None);
    assert_eq!(visible_total_count(Some(12), false), None);
    assert_eq!(visible_total_count(None, true), None);
    assert_eq!(
        visible_total_count(Some(12), true),
        Some("12 : Total Count".to_string())
    );
}
