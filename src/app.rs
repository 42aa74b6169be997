use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dioxus::prelude::*;
use rfd::FileDialog;

use crate::config::GridConfig;
use crate::domain::entities::column::Column;
use crate::domain::entities::filter::FilterSelection;
use crate::domain::entities::pagination::PageSize;
use crate::domain::entities::row::{Row, RowRouter, RowTarget};
use crate::ui::components::data_table::DataTable;
use crate::ui::state::list_state::ListState;
use crate::ui::styles::{
    button_style, detail_pane_style, root_container_style, status_line_style, toolbar_style,
};
use crate::usecase::services::list_controller::IssuedRequest;
use crate::usecase::services::paged_resource::PageFetcher;

/// Everything the list screen needs, built once before launch.
#[derive(Clone)]
pub struct GridContext {
    pub config: GridConfig,
    pub fetcher: PageFetcher,
    pub columns: Vec<Column>,
    pub router: Option<RowRouter>,
}

impl GridContext {
    pub fn from_config(config: GridConfig) -> Result<Self> {
        let built = config.build_source().context("failed to set up page source")?;
        let columns = config.columns(&built.discovered_columns);
        let router = config.row_router();
        let fetcher = PageFetcher::new(built.source, config.timeout());
        Ok(Self {
            config,
            fetcher,
            columns,
            router,
        })
    }
}

/// Why the app could not start; shown instead of the grid.
#[derive(Clone, Debug)]
pub struct StartupError(pub String);

#[component]
pub fn StartupFailure() -> Element {
    let StartupError(message) = use_context::<StartupError>();
    rsx! {
        div { style: "{root_container_style()}",
            p { "Unable to start: {message}" }
        }
    }
}

/// Runs `issued`, then any corrective request the outcome produces, applying each
/// outcome to the resource. Superseded outcomes are dropped by the resource.
pub async fn drive(mut state: ListState, fetcher: PageFetcher, issued: IssuedRequest) {
    let mut next = Some(issued);
    while let Some(issued) = next.take() {
        let outcome = fetcher.fetch(issued).await;
        next = state.resource.write().apply(outcome);
    }
}

fn run(state: ListState, fetcher: &PageFetcher, issued: Option<IssuedRequest>) {
    if let Some(issued) = issued {
        spawn(drive(state, fetcher.clone(), issued));
    }
}

pub fn save_csv(csv: &str, path: &Path) -> Result<()> {
    std::fs::write(path, csv).with_context(|| format!("failed to write csv: {}", path.display()))
}

fn pick_csv_path() -> Option<PathBuf> {
    FileDialog::new()
        .set_file_name("export.csv")
        .add_filter("CSV", &["csv"])
        .save_file()
}

pub fn row_details(row: &Row) -> String {
    serde_json::to_string_pretty(row).unwrap_or_else(|err| format!("unprintable row: {err}"))
}

#[component]
pub fn App() -> Element {
    let context = use_context::<GridContext>();
    let mut state = ListState::new(&context.config);
    let debounce = context.config.debounce();

    let fetcher = context.fetcher.clone();
    use_hook(move || {
        let issued = state.resource.write().refetch();
        run(state, &fetcher, Some(issued));
    });

    let snapshot = state.resource.read().snapshot();
    let filter_fields = state.resource.read().filter_fields();
    let status_is_error = snapshot.error.is_some();
    let status_text = snapshot.error.clone().unwrap_or_else(|| state.status.read().clone());
    let loading = snapshot.loading;
    let active_route = state.active_route.read().clone().unwrap_or_default();

    let fetcher_for_page = context.fetcher.clone();
    let fetcher_for_size = context.fetcher.clone();
    let fetcher_for_search = context.fetcher.clone();
    let fetcher_for_apply = context.fetcher.clone();
    let fetcher_for_clear = context.fetcher.clone();
    let fetcher_for_sort = context.fetcher.clone();
    let fetcher_for_refresh = context.fetcher.clone();
    let fetcher_for_export = context.fetcher.clone();

    rsx! {
        div { style: "{root_container_style()}",
            div { style: "{toolbar_style()}",
                h3 { style: "margin: 0;", "{context.config.title}" }
                button {
                    style: "{button_style()}",
                    onclick: move |_| {
                        let issued = state.resource.write().refetch();
                        state.status.set("Refreshing".to_string());
                        run(state, &fetcher_for_refresh, Some(issued));
                    },
                    "Refresh"
                }
                if loading {
                    button {
                        style: "{button_style()}",
                        onclick: move |_| {
                            state.resource.write().abort();
                            let search = state.resource.read().controller().query().search.clone();
                            let generation = *state.search_generation.peek() + 1;
                            state.search_generation.set(generation);
                            state.search_input.set(search);
                            state.status.set("Cancelled".to_string());
                        },
                        "Cancel"
                    }
                }
            }

            DataTable {
                columns: context.columns.clone(),
                snapshot,
                filter_fields,
                grid: context.config.grid.clone(),
                router: context.router.clone(),
                search: state.search_input.read().clone(),
                exporting: *state.exporting.read(),
                on_page_change: move |page: u32| {
                    let issued = state.resource.write().set_page(page);
                    run(state, &fetcher_for_page, issued);
                },
                on_rows_per_page_change: move |size: PageSize| {
                    let issued = state.resource.write().set_rows_per_page(size);
                    run(state, &fetcher_for_size, issued);
                },
                on_search_change: move |value: String| {
                    state.search_input.set(value.clone());
                    let generation = *state.search_generation.peek() + 1;
                    state.search_generation.set(generation);
                    let fetcher = fetcher_for_search.clone();
                    spawn(async move {
                        tokio::time::sleep(debounce).await;
                        if *state.search_generation.peek() != generation {
                            return;
                        }
                        let issued = state.resource.write().set_search(&value);
                        if let Some(issued) = issued {
                            drive(state, fetcher, issued).await;
                        }
                    });
                },
                on_apply_filters: move |selection: FilterSelection| {
                    let issued = state.resource.write().apply_filters(selection);
                    run(state, &fetcher_for_apply, Some(issued));
                },
                on_clear_filters: move |_| {
                    let issued = state.resource.write().clear_filters();
                    run(state, &fetcher_for_clear, Some(issued));
                },
                on_sort_toggle: move |_| {
                    let issued = state.resource.write().toggle_sort();
                    run(state, &fetcher_for_sort, Some(issued));
                },
                on_row_activate: move |(target, row): (RowTarget, Row)| {
                    match target {
                        RowTarget::Route(route) => {
                            tracing::info!(%route, "row activated");
                            state.status.set(format!("Opened {route}"));
                            state.active_route.set(Some(route));
                            state.selected_row.set(Some(row));
                        }
                        RowTarget::Action(action) => action(),
                    }
                },
                on_download_csv: move |_| {
                    let issued = state.resource.read().export_request();
                    let fetcher = fetcher_for_export.clone();
                    state.exporting.set(true);
                    spawn(async move {
                        match fetcher.export_csv(issued).await {
                            Ok(csv) => match pick_csv_path() {
                                Some(path) => match save_csv(&csv, &path) {
                                    Ok(()) => {
                                        tracing::info!(path = %path.display(), "csv exported");
                                        state.status.set(format!("Saved {}", path.display()));
                                    }
                                    Err(err) => {
                                        tracing::error!(error = %format!("{err:#}"), "csv export failed");
                                        state.status.set(format!("Export failed: {err:#}"));
                                    }
                                },
                                None => state.status.set("Export cancelled".to_string()),
                            },
                            Err(err) => {
                                tracing::error!(error = %err, "csv export failed");
                                state.status.set(format!("Export failed: {err}"));
                            }
                        }
                        state.exporting.set(false);
                    });
                },
            }

            if let Some(row) = state.selected_row.read().clone() {
                div { style: "{detail_pane_style()}",
                    div { style: "display: flex; justify-content: space-between; font-family: sans-serif;",
                        strong { "{active_route}" }
                        button {
                            style: "{button_style()}",
                            onclick: move |_| {
                                state.selected_row.set(None);
                                state.active_route.set(None);
                            },
                            "×"
                        }
                    }
                    "{row_details(&row)}"
                }
            }

            div { style: "{status_line_style(status_is_error)}", "{status_text}" }
        }
    }
}
