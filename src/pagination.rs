//! Page-link windows for server-paginated listings.

use serde::Serialize;

use crate::domain::page::PageInfo;

/// Returns page numbers to render, with `None` marking an ellipsis.
///
/// `edge` pages are always shown at both ends and `around` pages on each side
/// of the current one.
fn page_window(
    total_pages: usize,
    current_page: usize,
    edge: usize,
    around: usize,
) -> Vec<Option<usize>> {
    if total_pages == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + edge).min(total_pages + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(around));
    let mid_end = (current_page + around + 1).min(total_pages + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(total_pages.saturating_sub(edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=total_pages).map(Some));

    pages
}

/// Items of the current page plus what the template needs for navigation.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, info: &PageInfo) -> Self {
        let current_page = info.current_page.max(1);

        Self {
            items,
            pages: page_window(info.total_pages, current_page, 2, 2),
            page: current_page,
            total_items: info.total_items,
            total_pages: info.total_pages,
            has_previous: info.has_previous,
            has_next: info.has_next,
        }
    }
}
