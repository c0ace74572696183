//! List query state: page, page size and filter text.
//!
//! A `ListQuery` is both the UI state of a section and (with the session
//! token) the cache key of its fetch. Transitions are by value so that every
//! link a section renders is derived from the query currently displayed.

/// Allowed page sizes for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizes {
    pub allowed: &'static [u32],
    pub default: u32,
}

impl PageSizes {
    /// Fall back to the default for sizes outside the allowed set.
    #[must_use]
    pub fn normalize(&self, limit: u32) -> u32 {
        if self.allowed.contains(&limit) {
            limit
        } else {
            self.default
        }
    }
}

/// Inventory section page sizes.
pub const INVENTORY_PAGE_SIZES: PageSizes = PageSizes {
    allowed: &[50, 100, 200, 250],
    default: 50,
};

/// Users section page sizes.
pub const USERS_PAGE_SIZES: PageSizes = PageSizes {
    allowed: &[10, 25, 50, 100],
    default: 10,
};

/// Page, page size and filter of a list section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery {
    /// 1-based.
    pub page: u32,
    pub limit: u32,
    pub filter: String,
}

impl ListQuery {
    /// First page, default size, no filter.
    #[must_use]
    pub const fn new(sizes: &PageSizes) -> Self {
        Self {
            page: 1,
            limit: sizes.default,
            filter: String::new(),
        }
    }

    /// Build a query from raw request parameters, clamping the page to 1
    /// and the limit to the allowed set.
    #[must_use]
    pub fn from_params(
        sizes: &PageSizes,
        page: Option<u32>,
        limit: Option<u32>,
        filter: Option<String>,
    ) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.map_or(sizes.default, |l| sizes.normalize(l)),
            filter: filter.unwrap_or_default(),
        }
    }

    /// New filter text; resets to the first page.
    #[must_use]
    pub fn with_filter(self, filter: impl Into<String>) -> Self {
        Self {
            page: 1,
            filter: filter.into(),
            ..self
        }
    }

    /// New page size; resets to the first page.
    #[must_use]
    pub fn with_limit(self, sizes: &PageSizes, limit: u32) -> Self {
        Self {
            page: 1,
            limit: sizes.normalize(limit),
            ..self
        }
    }

    /// Another page; keeps filter and page size.
    #[must_use]
    pub fn with_page(self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }

    /// Whether a search filter is active.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.filter.is_empty()
    }

    /// Page and limit as query parameter values.
    #[must_use]
    pub fn page_params(&self) -> (String, String) {
        (self.page.to_string(), self.limit.to_string())
    }
}

/// Page to warm after `current` has been displayed, if any.
#[must_use]
pub const fn next_prefetch_page(current: u32, total_pages: u32) -> Option<u32> {
    if current < total_pages {
        Some(current + 1)
    } else {
        None
    }
}
