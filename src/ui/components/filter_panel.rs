use chrono::NaiveDate;
use dioxus::prelude::*;

use crate::domain::entities::filter::{
    FieldSpec, FilterDraft, FilterKind, FilterSelection, FilterValue,
};
use crate::ui::styles::{button_style, filter_panel_style};

const ANY_VALUE: &str = "";

/// `<input type="date">` hands back `YYYY-MM-DD` or an empty string.
pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn date_input_value(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn toggle_input_value(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "true",
        Some(false) => "false",
        None => ANY_VALUE,
    }
}

fn parse_toggle_input(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[component]
fn FilterField(field: FieldSpec, mut draft: Signal<FilterDraft>) -> Element {
    let name = field.name.clone();
    let current = draft.read().selection().get(&name).cloned();

    let control = match &field.kind {
        FilterKind::Single { options } => {
            let selected = match current {
                Some(FilterValue::Single(Some(value))) => value,
                _ => ANY_VALUE.to_string(),
            };
            rsx! {
                select {
                    value: "{selected}",
                    onchange: move |event| {
                        draft.write().set_single(&name, Some(event.value()));
                    },
                    option { value: "{ANY_VALUE}", "All" }
                    for choice in options.iter().cloned() {
                        option {
                            value: "{choice.value}",
                            selected: choice.value == selected,
                            "{choice.label}"
                        }
                    }
                }
            }
        }
        FilterKind::Multi { options } => rsx! {
            div { style: "display: flex; flex-direction: column; gap: 4px;",
                for choice in options.iter().cloned() {
                    label {
                        style: "display: flex; align-items: center; gap: 8px; cursor: pointer;",
                        input {
                            r#type: "checkbox",
                            checked: draft.read().is_checked(&field.name, &choice.value),
                            onclick: {
                                let name = field.name.clone();
                                let value = choice.value.clone();
                                move |_| draft.write().toggle_multi(&name, &value)
                            },
                        }
                        "{choice.label}"
                    }
                }
            }
        },
        FilterKind::Toggle => {
            let selected = match current {
                Some(FilterValue::Toggle(value)) => toggle_input_value(value),
                _ => ANY_VALUE,
            };
            rsx! {
                select {
                    value: "{selected}",
                    onchange: move |event| {
                        draft.write().set_toggle(&name, parse_toggle_input(&event.value()));
                    },
                    option { value: "{ANY_VALUE}", "Any" }
                    option { value: "true", "Yes" }
                    option { value: "false", "No" }
                }
            }
        }
        FilterKind::DateRange => {
            let range = match current {
                Some(FilterValue::DateRange(range)) => range,
                _ => Default::default(),
            };
            let start_name = field.name.clone();
            let end_name = field.name.clone();
            rsx! {
                div { style: "display: flex; gap: 6px; align-items: center;",
                    input {
                        r#type: "date",
                        value: "{date_input_value(range.start)}",
                        onchange: move |event| {
                            draft.write().set_date_start(&start_name, parse_date_input(&event.value()));
                        },
                    }
                    span { "–" }
                    input {
                        r#type: "date",
                        value: "{date_input_value(range.end)}",
                        onchange: move |event| {
                            draft.write().set_date_end(&end_name, parse_date_input(&event.value()));
                        },
                    }
                }
            }
        }
    };

    rsx! {
        div { style: "display: flex; flex-direction: column; gap: 6px;",
            span { style: "font-weight: 600;", "{field.label}" }
            {control}
        }
    }
}

/// Drawer of filter controls. Edits stay in a local draft until Apply hands the
/// whole draft over at once.
#[component]
pub fn FilterPanel(
    fields: Vec<FieldSpec>,
    selected: FilterSelection,
    on_apply: EventHandler<FilterSelection>,
    on_clear: EventHandler<()>,
) -> Element {
    let mut open = use_signal(|| false);
    let mut draft = use_signal(|| FilterDraft::from_selection(&selected));
    let can_apply = draft.read().can_apply();
    let active = selected.is_active();
    let fields_for_clear = fields.clone();

    rsx! {
        button {
            style: "{button_style()}",
            onclick: move |_| {
                draft.set(FilterDraft::from_selection(&selected));
                open.set(true);
            },
            if active { "Filters •" } else { "Filters" }
        }
        if open() {
            div { style: "{filter_panel_style()}",
                div { style: "display: flex; justify-content: space-between; align-items: center;",
                    span { style: "font-weight: 600;", "Filters" }
                    button { style: "{button_style()}", onclick: move |_| open.set(false), "×" }
                }
                for field in fields.iter().cloned() {
                    FilterField { key: "{field.name}", field: field.clone(), draft }
                }
                div { style: "display: flex; gap: 8px; margin-top: auto;",
                    button {
                        style: "{button_style()}",
                        onclick: move |_| {
                            draft.write().clear(&fields_for_clear);
                            open.set(false);
                            on_clear.call(());
                        },
                        "Clear"
                    }
                    button {
                        style: "{button_style()}",
                        disabled: !can_apply,
                        onclick: move |_| {
                            let selection = draft.read().submit();
                            open.set(false);
                            on_apply.call(selection);
                        },
                        "Apply"
                    }
                }
            }
        }
    }
}
