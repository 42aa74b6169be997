use crate::domain::entities::cell::BadgeTone;

pub fn root_container_style() -> &'static str {
    "font-family: 'Noto Sans', sans-serif; padding: 12px; background: #fff; height: 100vh; display: flex; flex-direction: column; overflow: hidden; box-sizing: border-box;"
}

pub fn toolbar_style() -> &'static str {
    "display: flex; gap: 8px; align-items: center; margin-bottom: 12px; background: #fff; padding: 8px 0;"
}

pub fn table_container_style() -> &'static str {
    "flex: 1; min-height: 0; overflow: auto; border: 1px solid #bbb; border-radius: 6px;"
}

pub fn table_header_cell_style() -> &'static str {
    "border: 1px solid #bbb; padding: 6px; background: #f2f2f2; position: sticky; top: 0; z-index: 10; text-align: left; white-space: nowrap;"
}

pub fn sortable_header_cell_style() -> String {
    format!("{} cursor: pointer; user-select: none;", table_header_cell_style())
}

pub fn table_cell_style() -> &'static str {
    "border: 1px solid #bbb; padding: 6px;"
}

pub fn serial_cell_style() -> &'static str {
    "border: 1px solid #bbb; padding: 6px; text-align: center; color: #666; width: 48px;"
}

/// Only rows with a target get the pointer and hover tint.
pub fn row_style(clickable: bool) -> &'static str {
    if clickable {
        "cursor: pointer; background: #fff;"
    } else {
        ""
    }
}

pub fn skeleton_bar_style() -> &'static str {
    "height: 12px; border-radius: 4px; background: linear-gradient(90deg, #eee, #f6f6f6, #eee);"
}

pub fn badge_style(tone: BadgeTone) -> &'static str {
    match tone {
        BadgeTone::Positive => {
            "display: inline-block; padding: 2px 8px; border-radius: 999px; background: #e3f6e8; color: #1d7a3a;"
        }
        BadgeTone::Negative => {
            "display: inline-block; padding: 2px 8px; border-radius: 999px; background: #fde8e8; color: #b42318;"
        }
        BadgeTone::Neutral => {
            "display: inline-block; padding: 2px 8px; border-radius: 999px; background: #eef0f3; color: #444;"
        }
    }
}

pub fn link_style() -> &'static str {
    "color: #1a56db; text-decoration: underline;"
}

pub fn failed_cell_style() -> &'static str {
    "color: #b42318; font-weight: 600;"
}

pub fn illustration_style() -> &'static str {
    "display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 8px; padding: 48px 12px; color: #666;"
}

pub fn illustration_image_style() -> &'static str {
    "max-width: 180px; max-height: 180px;"
}

pub fn pager_style() -> &'static str {
    "display: flex; gap: 6px; align-items: center; justify-content: flex-end; margin-top: 12px;"
}

pub fn pager_button_style(active: bool) -> &'static str {
    if active {
        "border: 1px solid #1a56db; background: #1a56db; color: #fff; padding: 4px 10px; border-radius: 6px;"
    } else {
        "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;"
    }
}

pub fn ellipsis_style() -> &'static str {
    "padding: 4px 6px; color: #888; cursor: default;"
}

pub fn button_style() -> &'static str {
    "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;"
}

pub fn filter_panel_style() -> &'static str {
    "position: fixed; top: 0; right: 0; bottom: 0; width: 320px; background: #fff; border-left: 1px solid #bbb; box-shadow: -10px 0 24px rgba(0,0,0,0.15); z-index: 1100; padding: 16px; overflow-y: auto; display: flex; flex-direction: column; gap: 12px;"
}

pub fn status_line_style(is_error: bool) -> &'static str {
    if is_error {
        "margin-top: 8px; color: #b42318;"
    } else {
        "margin-top: 8px; color: #555;"
    }
}

pub fn detail_pane_style() -> &'static str {
    "margin-top: 12px; padding: 12px; border: 1px solid #bbb; border-radius: 6px; max-height: 200px; overflow: auto; font-family: monospace; white-space: pre-wrap;"
}
