use dioxus::prelude::{use_signal, Signal};

use crate::config::GridConfig;
use crate::domain::entities::row::Row;
use crate::usecase::services::paged_resource::PagedResource;

/// Signals behind the list screen. `resource` is the only owner of list
/// parameters; the rest is screen chrome.
#[derive(Clone, Copy)]
pub struct ListState {
    pub resource: Signal<PagedResource>,
    /// Raw search box text, ahead of the debounced value in `resource`.
    pub search_input: Signal<String>,
    /// Bumped per keystroke; a debounced search only fires if it is still current.
    pub search_generation: Signal<u64>,
    pub exporting: Signal<bool>,
    pub selected_row: Signal<Option<Row>>,
    pub active_route: Signal<Option<String>>,
    pub status: Signal<String>,
}

impl ListState {
    pub fn new(config: &GridConfig) -> Self {
        let page_size = config.grid.default_page_size;
        let default_sort = config.grid.default_sort;
        let fields = config.filter_fields();
        Self {
            resource: use_signal(move || PagedResource::new(page_size, default_sort, fields)),
            search_input: use_signal(String::new),
            search_generation: use_signal(|| 0_u64),
            exporting: use_signal(|| false),
            selected_row: use_signal(|| None::<Row>),
            active_route: use_signal(|| None::<String>),
            status: use_signal(|| "Ready".to_string()),
        }
    }
}
