use std::ops::Range;

use serde::Serialize;

/// Pages radiating either side of the current page in the pagination bar.
const WINDOW_RADIUS: usize = 2;

pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

pub fn clamp_page(page_index: usize, page_count: usize) -> usize {
    page_index.clamp(1, page_count.max(1))
}

/// Index range of page `page_index` (1-based) within `total` items.
pub fn page_bounds(page_index: usize, page_size: usize, total: usize) -> Range<usize> {
    let start = page_index
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(total);
    let end = start.saturating_add(page_size).min(total);
    start..end
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageLink {
    Previous { target: usize, enabled: bool },
    Page { number: usize, current: bool },
    Ellipsis,
    Next { target: usize, enabled: bool },
}

/// Button model for the pagination bar. Empty when everything fits on one page.
pub fn page_window(current: usize, page_count: usize) -> Vec<PageLink> {
    if page_count <= 1 {
        return Vec::new();
    }
    let current = clamp_page(current, page_count);
    let start = current.saturating_sub(WINDOW_RADIUS).max(1);
    let end = (current + WINDOW_RADIUS).min(page_count);

    let mut links = vec![PageLink::Previous {
        target: current.saturating_sub(1).max(1),
        enabled: current > 1,
    }];

    if start > 1 {
        links.push(PageLink::Page {
            number: 1,
            current: false,
        });
        if start > 2 {
            links.push(PageLink::Ellipsis);
        }
    }

    links.extend((start..=end).map(|number| PageLink::Page {
        number,
        current: number == current,
    }));

    if end < page_count {
        if end + 1 < page_count {
            links.push(PageLink::Ellipsis);
        }
        links.push(PageLink::Page {
            number: page_count,
            current: false,
        });
    }

    links.push(PageLink::Next {
        target: (current + 1).min(page_count),
        enabled: current < page_count,
    });
    links
}
