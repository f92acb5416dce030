//! Pagination metadata and the page-control model used by list pages.

use serde::{Deserialize, Serialize};

/// Default number of rows per list page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum number of rows per list page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page controls are collapsed with ellipses beyond this many pages.
const MAX_UNCOLLAPSED_PAGES: u32 = 7;

/// Pages shown on each side of the current page when collapsed.
const SIBLINGS: u32 = 1;

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`.
pub fn clamp_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Clamp a requested page number to at least 1.
pub fn clamp_page(page: Option<u32>) -> u32 {
    page.unwrap_or(1).max(1)
}

/// Pagination block returned by the backend alongside list data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl PageInfo {
    /// Metadata for an unpaginated list of `total` rows.
    pub fn single(total: u64) -> Self {
        Self {
            page: 1,
            limit: total.min(u64::from(u32::MAX)) as u32,
            total,
            total_pages: 1,
        }
    }
}

/// Bare `page`/`limit` query for lists without other filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// One slot in the page control strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageItem {
    Page { number: u32, current: bool },
    Ellipsis,
}

/// Page control model: clamped current page plus the slots to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
    pub items: Vec<PageItem>,
}

impl Pagination {
    /// Build the control model.
    ///
    /// `total_pages` below 1 is treated as 1, and `current_page` is clamped
    /// into `[1, total_pages]`.
    pub fn new(current_page: i64, total_pages: u32) -> Self {
        let total_pages = total_pages.max(1);
        let current = current_page.clamp(1, i64::from(total_pages)) as u32;

        Self {
            current_page: current,
            total_pages,
            has_previous: current > 1,
            has_next: current < total_pages,
            items: page_items(current, total_pages),
        }
    }

    pub fn from_info(info: &PageInfo) -> Self {
        Self::new(i64::from(info.page), info.total_pages)
    }
}

fn page_items(current: u32, total: u32) -> Vec<PageItem> {
    let page = |number| PageItem::Page {
        number,
        current: number == current,
    };

    if total <= MAX_UNCOLLAPSED_PAGES {
        return (1..=total).map(page).collect();
    }

    let window_start = current.saturating_sub(SIBLINGS).max(2);
    let window_end = (current + SIBLINGS).min(total - 1);

    let mut items = vec![page(1)];
    if window_start > 2 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((window_start..=window_end).map(page));
    if window_end < total - 1 {
        items.push(PageItem::Ellipsis);
    }
    items.push(page(total));
    items
}
