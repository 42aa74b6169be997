use dioxus::prelude::*;

use crate::domain::entities::cell::CellContent;
use crate::domain::entities::column::{Column, Header};
use crate::domain::entities::pagination::PaginationState;
use crate::domain::entities::query::SortOrder;
use crate::domain::entities::row::{Row, RowRouter, RowTarget};
use crate::ui::styles::{
    badge_style, failed_cell_style, illustration_image_style, illustration_style, link_style,
    row_style, serial_cell_style, skeleton_bar_style, sortable_header_cell_style,
    table_cell_style, table_container_style, table_header_cell_style,
};

/// Placeholder rows shown while a page is loading.
pub const SKELETON_ROWS: usize = 20;

pub const SERIAL_HEADER: &str = "#";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub label: String,
    pub sort_toggle: bool,
    pub class: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub serial: Option<u64>,
    pub cells: Vec<CellContent>,
    pub target: Option<RowTarget>,
    pub source: Row,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridBody {
    Skeleton { rows: usize, columns: usize },
    Rows(Vec<GridRow>),
    /// Loaded, but nothing matched.
    Empty,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    pub headers: Vec<HeaderCell>,
    pub body: GridBody,
}

impl GridView {
    pub fn column_count(&self) -> usize {
        self.headers.len().max(1)
    }
}

pub fn build_grid_view(
    columns: &[Column],
    rows: &[Row],
    loading: bool,
    error: Option<&str>,
    has_serial_number: bool,
    pagination: &PaginationState,
    router: Option<&RowRouter>,
) -> GridView {
    let mut headers = Vec::with_capacity(columns.len() + 1);
    if has_serial_number {
        headers.push(HeaderCell {
            label: SERIAL_HEADER.to_string(),
            sort_toggle: false,
            class: None,
        });
    }
    headers.extend(columns.iter().map(|column| HeaderCell {
        label: column.header.label().to_string(),
        sort_toggle: matches!(column.header, Header::SortToggle(_)),
        class: column.header_class.clone(),
    }));

    let body = if loading {
        GridBody::Skeleton {
            rows: SKELETON_ROWS,
            columns: headers.len(),
        }
    } else if let Some(message) = error {
        GridBody::Failed(message.to_string())
    } else if rows.is_empty() {
        GridBody::Empty
    } else {
        GridBody::Rows(
            rows.iter()
                .enumerate()
                .map(|(row_idx, row)| GridRow {
                    serial: has_serial_number.then(|| pagination.serial_number(row_idx)),
                    cells: columns.iter().map(|column| column.cell(row)).collect(),
                    target: router.and_then(|router| router.target_for(row)),
                    source: row.clone(),
                })
                .collect(),
        )
    };

    GridView { headers, body }
}

pub fn sort_indicator(order: Option<SortOrder>) -> &'static str {
    match order {
        Some(SortOrder::Asc) => " ▲",
        Some(SortOrder::Desc) => " ▼",
        None => " ↕",
    }
}

fn render_cell(
    content: &CellContent,
    source: &Row,
    on_row_activate: EventHandler<(RowTarget, Row)>,
) -> Element {
    let text = content.display_text();
    if let Some(target) = content.link_target() {
        let source = source.clone();
        return rsx! {
            span {
                style: "{link_style()}",
                onclick: move |event: MouseEvent| {
                    event.stop_propagation();
                    on_row_activate.call((target.clone(), source.clone()));
                },
                "{text}"
            }
        };
    }
    match content {
        CellContent::Badge { tone, .. } if !content.is_empty() => rsx! {
            span { style: "{badge_style(*tone)}", "{text}" }
        },
        CellContent::Failed => rsx! {
            span { style: "{failed_cell_style()}", title: "cell could not be rendered", "{text}" }
        },
        _ => rsx! { "{text}" },
    }
}

#[component]
pub fn Illustration(text: String, #[props(!optional)] image: Option<String>) -> Element {
    rsx! {
        div { style: "{illustration_style()}",
            if let Some(src) = image {
                img { style: "{illustration_image_style()}", src: "{src}", alt: "" }
            }
            span { "{text}" }
        }
    }
}

#[component]
pub fn DataGrid(
    columns: Vec<Column>,
    rows: Vec<Row>,
    loading: bool,
    #[props(!optional)] error: Option<String>,
    has_serial_number: bool,
    pagination: PaginationState,
    #[props(!optional)] router: Option<RowRouter>,
    #[props(!optional)] sort_order: Option<SortOrder>,
    no_data_text: String,
    #[props(!optional)] no_data_image: Option<String>,
    on_sort_toggle: EventHandler<()>,
    on_row_activate: EventHandler<(RowTarget, Row)>,
) -> Element {
    let view = build_grid_view(
        &columns,
        &rows,
        loading,
        error.as_deref(),
        has_serial_number,
        &pagination,
        router.as_ref(),
    );
    let colspan = view.column_count();
    let sortable_style = sortable_header_cell_style();

    let body = match view.body {
        GridBody::Skeleton { rows, columns } => rsx! {
            for row_idx in 0..rows {
                tr { key: "skeleton-{row_idx}",
                    for col_idx in 0..columns {
                        td { key: "{col_idx}", style: "{table_cell_style()}",
                            div { style: "{skeleton_bar_style()}" }
                        }
                    }
                }
            }
        },
        GridBody::Failed(message) => rsx! {
            tr {
                td { colspan: colspan,
                    Illustration { text: message, image: None }
                }
            }
        },
        GridBody::Empty => rsx! {
            tr {
                td { colspan: colspan,
                    Illustration { text: no_data_text.clone(), image: no_data_image.clone() }
                }
            }
        },
        GridBody::Rows(grid_rows) => rsx! {
            {grid_rows.into_iter().enumerate().map(|(row_idx, grid_row)| {
                let GridRow { serial, cells, target, source } = grid_row;
                let clickable = target.is_some();
                let activated = source.clone();
                rsx!(
                    tr {
                        key: "{row_idx}",
                        style: "{row_style(clickable)}",
                        onclick: move |_| {
                            if let Some(target) = target.clone() {
                                on_row_activate.call((target, activated.clone()));
                            }
                        },
                        if let Some(serial) = serial {
                            td { style: "{serial_cell_style()}", "{serial}" }
                        }
                        for (col_idx, cell) in cells.iter().enumerate() {
                            td { key: "{col_idx}", style: "{table_cell_style()}",
                                {render_cell(cell, &source, on_row_activate)}
                            }
                        }
                    }
                )
            })}
        },
    };

    rsx! {
        div {
            style: "{table_container_style()}",
            table { style: "border-collapse: collapse; width: 100%; background: #fff;",
                thead {
                    tr {
                        for header in view.headers.iter().cloned() {
                            if header.sort_toggle {
                                th {
                                    style: "{sortable_style}",
                                    class: header.class.clone().unwrap_or_default(),
                                    onclick: move |_| on_sort_toggle.call(()),
                                    "{header.label}{sort_indicator(sort_order)}"
                                }
                            } else {
                                th {
                                    style: "{table_header_cell_style()}",
                                    class: header.class.clone().unwrap_or_default(),
                                    "{header.label}"
                                }
                            }
                        }
                    }
                }
                tbody { {body} }
            }
        }
    }
}
