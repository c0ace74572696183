//! Pagination envelope shared by every list resource.

use serde::{Deserialize, Serialize};

/// One page of a server-side list plus its pagination metadata.
///
/// The backend reports pagination differently per resource; the admin
/// client normalises both shapes into this envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
}

impl<T> Page<T> {
    /// Whether the page holds no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 1-based index of the first row on this page, or 0 when empty.
    #[must_use]
    pub fn first_item_index(&self) -> u64 {
        if self.items.is_empty() {
            return 0;
        }
        u64::from(self.current_page.saturating_sub(1)) * u64::from(self.items_per_page) + 1
    }

    /// 1-based index of the last row on this page, or 0 when empty.
    #[must_use]
    pub fn last_item_index(&self) -> u64 {
        if self.items.is_empty() {
            return 0;
        }
        self.first_item_index() + self.items.len() as u64 - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(current_page: u32, total_pages: u32, len: usize) -> Page<u8> {
        Page {
            items: vec![0; len],
            current_page,
            total_pages,
            total_items: 120,
            items_per_page: 50,
        }
    }

    #[test]
    fn test_is_empty() {
        assert!(page(1, 0, 0).is_empty());
        assert!(!page(1, 3, 50).is_empty());
    }

    #[test]
    fn test_item_range() {
        let last = page(3, 3, 20);
        assert_eq!(last.first_item_index(), 101);
        assert_eq!(last.last_item_index(), 120);

        let empty = page(1, 0, 0);
        assert_eq!(empty.first_item_index(), 0);
        assert_eq!(empty.last_item_index(), 0);
    }
}
