use dioxus::prelude::*;

use crate::config::GridSection;
use crate::domain::entities::column::Column;
use crate::domain::entities::filter::{FieldSpec, FilterSelection};
use crate::domain::entities::pagination::PageSize;
use crate::domain::entities::row::{Row, RowRouter, RowTarget};
use crate::ui::components::filter_panel::FilterPanel;
use crate::ui::components::grid::{DataGrid, Illustration};
use crate::ui::components::pager::Pager;
use crate::ui::components::search_box::SearchBox;
use crate::ui::styles::{button_style, toolbar_style};
use crate::usecase::services::paged_resource::ResourceSnapshot;

/// The "nothing here yet" state: loaded, no rows, and nothing narrowing the list.
/// A search or filter that matches nothing shows the in-table empty state instead.
pub fn shows_illustration(snapshot: &ResourceSnapshot) -> bool {
    snapshot.rows.is_empty()
        && !snapshot.loading
        && snapshot.error.is_none()
        && snapshot.pagination.total_pages.is_some()
        && !snapshot.query.is_constrained()
}

pub fn total_count_label(count: u64) -> String {
    format!("{count} : Total Count")
}

/// The toolbar count, when enabled and there is something to count.
pub fn visible_total_count(total_count: Option<u64>, show_total_count: bool) -> Option<String> {
    total_count
        .filter(|count| show_total_count && *count > 0)
        .map(total_count_label)
}

#[component]
pub fn DataTable(
    columns: Vec<Column>,
    snapshot: ResourceSnapshot,
    filter_fields: Vec<FieldSpec>,
    grid: GridSection,
    #[props(!optional)] router: Option<RowRouter>,
    search: String,
    exporting: bool,
    on_page_change: EventHandler<u32>,
    on_rows_per_page_change: EventHandler<PageSize>,
    on_search_change: EventHandler<String>,
    on_apply_filters: EventHandler<FilterSelection>,
    on_clear_filters: EventHandler<()>,
    on_sort_toggle: EventHandler<()>,
    on_row_activate: EventHandler<(RowTarget, Row)>,
    on_download_csv: EventHandler<()>,
) -> Element {
    let illustration = shows_illustration(&snapshot);
    let total_label = visible_total_count(snapshot.total_count, grid.show_total_count);
    let total_pages = snapshot.pagination.total_pages.unwrap_or(0);

    rsx! {
        div { style: "{toolbar_style()}",
            if grid.searchable {
                SearchBox {
                    value: search.clone(),
                    placeholder: "Search",
                    on_change: move |value| on_search_change.call(value),
                }
            }
            if grid.has_filter_option && !filter_fields.is_empty() {
                FilterPanel {
                    fields: filter_fields.clone(),
                    selected: snapshot.query.filters.clone(),
                    on_apply: move |selection| on_apply_filters.call(selection),
                    on_clear: move |_| on_clear_filters.call(()),
                }
            }
            if grid.download_csv {
                button {
                    style: "{button_style()}",
                    disabled: exporting,
                    onclick: move |_| on_download_csv.call(()),
                    if exporting { "Exporting…" } else { "Download CSV" }
                }
            }
            if let Some(label) = total_label {
                span { style: "margin-left: auto; color: #555;", "{label}" }
            }
        }

        if illustration {
            Illustration {
                text: grid.illustration_text.clone(),
                image: grid.illustration_image.clone(),
            }
        } else {
            DataGrid {
                columns: columns.clone(),
                rows: snapshot.rows.clone(),
                loading: snapshot.loading,
                error: snapshot.error.clone(),
                has_serial_number: grid.has_serial_number,
                pagination: snapshot.pagination,
                router: router.clone(),
                sort_order: snapshot.query.sort_order,
                no_data_text: grid.no_data_text.clone(),
                no_data_image: grid.no_data_image.clone(),
                on_sort_toggle: move |_| on_sort_toggle.call(()),
                on_row_activate: move |activated| on_row_activate.call(activated),
            }
            Pager {
                current_page: snapshot.pagination.current_page,
                total_pages,
                rows_per_page: snapshot.pagination.rows_per_page,
                on_page_change: move |page| on_page_change.call(page),
                on_rows_per_page_change: move |size| on_rows_per_page_change.call(size),
            }
        }
    }
}
