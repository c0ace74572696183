//! Pagination controls.

use storeroom_core::Page;

use super::{ListQuery, PageSizes};

/// Pages shown on each side of the current one.
const WINDOW: u32 = 2;

/// A numbered page link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: u32,
    pub href: String,
    pub current: bool,
}

/// A page size option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeLink {
    pub limit: u32,
    pub href: String,
    pub current: bool,
}

/// Pagination controls for one rendered page.
///
/// Every link is derived from the displayed query, so page links keep the
/// filter and page size and size links go back to page 1.
#[derive(Debug, Clone)]
pub struct PaginationView {
    /// False when there is at most one page.
    pub visible: bool,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub pages: Vec<PageLink>,
    pub sizes: Vec<SizeLink>,
    /// e.g. `51-100 of 230`
    pub range_label: String,
}

impl PaginationView {
    #[must_use]
    pub fn build<T>(
        page: &Page<T>,
        query: &ListQuery,
        sizes: &PageSizes,
        href: impl Fn(&ListQuery) -> String,
    ) -> Self {
        let current = query.page;
        let total = page.total_pages;
        let link = |number: u32| href(&query.clone().with_page(number));

        let first = current.saturating_sub(WINDOW).max(1);
        let last = current.saturating_add(WINDOW).min(total);
        let pages = (first..=last)
            .map(|number| PageLink {
                number,
                href: link(number),
                current: number == current,
            })
            .collect();

        let sizes = sizes
            .allowed
            .iter()
            .map(|&limit| SizeLink {
                limit,
                href: href(&query.clone().with_limit(sizes, limit)),
                current: limit == query.limit,
            })
            .collect();

        Self {
            visible: total > 1,
            prev_href: (current > 1).then(|| link(current - 1)),
            next_href: (current < total).then(|| link(current + 1)),
            pages,
            sizes,
            range_label: format!(
                "{}-{} of {}",
                page.first_item_index(),
                page.last_item_index(),
                page.total_items
            ),
        }
    }
}
