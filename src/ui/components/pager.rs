use dioxus::prelude::*;

use crate::domain::entities::pagination::{page_items, PageItem, PageSize};
use crate::ui::styles::{ellipsis_style, pager_button_style, pager_style};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerView {
    pub items: Vec<PageItem>,
    pub current_page: u32,
    pub total_pages: u32,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

/// `None` when there is nothing to page through.
pub fn pager_view(current_page: u32, total_pages: u32) -> Option<PagerView> {
    if total_pages == 0 {
        return None;
    }
    Some(PagerView {
        items: page_items(current_page, total_pages),
        current_page,
        total_pages,
        prev_disabled: current_page <= 1,
        next_disabled: current_page >= total_pages,
    })
}

/// Only pages in `1..=total_pages` are ever reported.
pub fn page_request(target: u32, total_pages: u32) -> Option<u32> {
    (1..=total_pages).contains(&target).then_some(target)
}

#[component]
pub fn Pager(
    current_page: u32,
    total_pages: u32,
    rows_per_page: PageSize,
    on_page_change: EventHandler<u32>,
    on_rows_per_page_change: EventHandler<PageSize>,
) -> Element {
    let Some(view) = pager_view(current_page, total_pages) else {
        return rsx! {};
    };
    let request = move |target: u32| {
        if let Some(page) = page_request(target, total_pages) {
            on_page_change.call(page);
        }
    };

    rsx! {
        div { style: "{pager_style()}",
            label { "Rows per page " }
            select {
                value: "{rows_per_page}",
                onchange: move |event| {
                    let Ok(size) = event.value().parse::<u32>() else {
                        return;
                    };
                    match PageSize::try_from(size) {
                        Ok(size) => {
                            on_rows_per_page_change.call(size);
                            on_page_change.call(1);
                        }
                        Err(err) => tracing::warn!(%err, "ignored page size"),
                    }
                },
                for size in PageSize::ALL {
                    option { value: "{size}", selected: size == rows_per_page, "{size}" }
                }
            }
            button {
                style: "{pager_button_style(false)}",
                disabled: view.prev_disabled,
                onclick: move |_| request(current_page.saturating_sub(1)),
                "‹"
            }
            for (idx, item) in view.items.iter().copied().enumerate() {
                {match item {
                    PageItem::Page(page) => rsx! {
                        button {
                            key: "page-{page}",
                            style: "{pager_button_style(page == view.current_page)}",
                            onclick: move |_| request(page),
                            "{page}"
                        }
                    },
                    PageItem::Ellipsis => rsx! {
                        span { key: "gap-{idx}", style: "{ellipsis_style()}", "…" }
                    },
                }}
            }
            button {
                style: "{pager_button_style(false)}",
                disabled: view.next_disabled,
                onclick: move |_| request(current_page + 1),
                "›"
            }
        }
    }
}
