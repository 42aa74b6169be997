use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported page size {0}; expected one of 10, 20, 50, 100")]
pub struct PageSizeError(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PageSize {
    Ten,
    Twenty,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Ten,
        PageSize::Twenty,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    pub fn get(self) -> u32 {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::Ten
    }
}

impl TryFrom<u32> for PageSize {
    type Error = PageSizeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or(PageSizeError(value))
    }
}

impl From<PageSize> for u32 {
    fn from(value: PageSize) -> Self {
        value.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Page bookkeeping. `total_pages` stays `None` until the first response arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub current_page: u32,
    pub rows_per_page: PageSize,
    pub total_pages: Option<u32>,
}

impl PaginationState {
    pub fn new(rows_per_page: PageSize) -> Self {
        Self {
            current_page: 1,
            rows_per_page,
            total_pages: None,
        }
    }

    /// Returns `target` when it names an existing page.
    pub fn accept_page(&self, target: u32) -> Option<u32> {
        if target < 1 {
            return None;
        }
        match self.total_pages {
            Some(total) if target > total => None,
            _ => Some(target),
        }
    }

    /// The page the state should move to when the current one no longer exists.
    pub fn clamped_page(&self) -> Option<u32> {
        let last = self.total_pages?.max(1);
        if self.current_page > last {
            Some(last)
        } else {
            None
        }
    }

    pub fn serial_number(&self, row_index: usize) -> u64 {
        serial_number(self.current_page, self.rows_per_page.get(), row_index)
    }
}

/// Absolute, page-independent row number shown in the `#` column.
pub fn serial_number(current_page: u32, rows_per_page: u32, row_index: usize) -> u64 {
    u64::from(current_page.saturating_sub(1)) * u64::from(rows_per_page) + row_index as u64 + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

const VISIBLE_PAGES: u32 = 3;

/// Compressed page strip: first and last page always, a window of up to three
/// pages around the current one, and ellipses over the gaps.
pub fn page_items(current_page: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages == 0 {
        return Vec::new();
    }

    let current_page = current_page.clamp(1, total_pages);
    let start = current_page.saturating_sub(VISIBLE_PAGES / 2).max(1);
    let end = (start + VISIBLE_PAGES - 1).min(total_pages);
    let mut items = Vec::new();

    if start > 1 {
        items.push(PageItem::Page(1));
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }

    items.extend((start..=end).map(PageItem::Page));

    if end < total_pages {
        if end < total_pages - 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(total_pages));
    }

    items
}
