use dioxus::prelude::*;

use crate::ui::styles::button_style;

/// Controlled search input. Every keystroke is reported as-is; debouncing is the
/// owner's business.
#[component]
pub fn SearchBox(value: String, placeholder: String, on_change: EventHandler<String>) -> Element {
    let has_value = !value.is_empty();

    rsx! {
        div { style: "display: inline-flex; align-items: center; gap: 4px;",
            input {
                style: "border: 1px solid #bbb; padding: 4px 8px; border-radius: 6px; min-width: 220px;",
                value: "{value}",
                placeholder: "{placeholder}",
                oninput: move |event| on_change.call(event.value()),
            }
            if has_value {
                button {
                    style: "{button_style()}",
                    title: "Clear search",
                    onclick: move |_| on_change.call(String::new()),
                    "×"
                }
            }
        }
    }
}
