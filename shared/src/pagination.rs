use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Page moved because the collection shrank under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCorrection {
    pub from: usize,
    pub to: usize,
}

/// 1-based page window over a sorted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginator {
    current_page: usize,
    page_size: usize,
}

impl Paginator {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Zero for an empty collection.
    #[must_use]
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size.max(1))
    }

    #[must_use]
    pub fn page_range(&self, len: usize) -> Range<usize> {
        let start = self
            .current_page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .min(len);
        let end = start.saturating_add(self.page_size).min(len);
        start..end
    }

    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.page_range(items.len())]
    }

    /// Moves to `page`, clamped into `1..=max(1, total_pages)`.
    pub fn go_to(&mut self, page: usize, len: usize) -> usize {
        let last = self.total_pages(len).max(1);
        self.current_page = page.clamp(1, last);
        self.current_page
    }

    /// Pulls the current page into `1..=max(1, total_pages)`. A page that is
    /// still in range is left alone.
    pub fn reconcile(&mut self, len: usize) -> Option<PageCorrection> {
        let to = self.current_page.clamp(1, self.total_pages(len).max(1));
        if to == self.current_page {
            return None;
        }
        let from = self.current_page;
        self.current_page = to;
        Some(PageCorrection { from, to })
    }

    /// Filler rows needed to keep the table at a constant height.
    #[must_use]
    pub const fn placeholder_rows(&self, rendered: usize) -> usize {
        self.page_size.saturating_sub(rendered)
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(crate::PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn total_pages_rounds_up() {
        let p = Paginator::new(10);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
        assert_eq!(p.total_pages(25), 3);
    }

    #[test]
    fn last_page_is_partial() {
        let items: Vec<usize> = (1..=25).collect();
        let mut p = Paginator::new(10);
        p.go_to(3, items.len());
        assert_eq!(p.slice(&items), &[21, 22, 23, 24, 25]);
        assert_eq!(p.placeholder_rows(p.slice(&items).len()), 5);
    }

    #[test]
    fn shrinking_collection_clamps_page() {
        let mut p = Paginator::new(10);
        p.go_to(3, 25);
        assert_eq!(p.reconcile(5), Some(PageCorrection { from: 3, to: 1 }));
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.total_pages(5), 1);
    }

    #[test]
    fn empty_collection_clamps_to_first_page() {
        let mut p = Paginator::new(10);
        p.go_to(2, 15);
        assert_eq!(p.reconcile(0), Some(PageCorrection { from: 2, to: 1 }));
        assert_eq!(p.reconcile(0), None);
        assert!(p.slice::<u8>(&[]).is_empty());
    }

    #[test]
    fn in_range_page_is_untouched() {
        let mut p = Paginator::new(10);
        p.go_to(2, 30);
        assert_eq!(p.reconcile(11), None);
        assert_eq!(p.current_page(), 2);
    }

    #[test]
    fn go_to_clamps_out_of_range_requests() {
        let mut p = Paginator::new(10);
        assert_eq!(p.go_to(0, 30), 1);
        assert_eq!(p.go_to(99, 30), 3);
        assert_eq!(p.go_to(5, 0), 1);
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let p = Paginator::new(0);
        assert_eq!(p.page_size(), 1);
        assert_eq!(p.total_pages(3), 3);
    }

    #[test]
    fn restored_zero_page_is_pulled_to_first_page() {
        let mut p: Paginator =
            serde_json::from_str(r#"{"current_page": 0, "page_size": 10}"#).unwrap();
        let items: Vec<usize> = (1..=15).collect();
        assert_eq!(p.slice(&items), &items[..10]);
        assert_eq!(p.reconcile(items.len()), Some(PageCorrection { from: 0, to: 1 }));
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn restored_zero_page_size_does_not_divide_by_zero() {
        let p: Paginator =
            serde_json::from_str(r#"{"current_page": 2, "page_size": 0}"#).unwrap();
        assert_eq!(p.total_pages(3), 3);
        assert!(p.slice(&[1, 2, 3]).is_empty());
    }

    proptest! {
        #[test]
        fn reconciled_page_is_in_bounds(
            len in 0usize..500,
            page in 1usize..100,
            shrink_to in 0usize..500,
        ) {
            let mut p = Paginator::new(10);
            p.go_to(page, len);
            p.reconcile(shrink_to);
            let current = p.current_page();
            prop_assert!(current >= 1);
            if shrink_to > 0 {
                prop_assert!(current <= shrink_to.div_ceil(10));
                prop_assert!(!p.slice(&vec![0u8; shrink_to]).is_empty());
            } else {
                prop_assert_eq!(current, 1);
            }
        }

        #[test]
        fn slices_cover_collection_exactly(len in 0usize..300, size in 1usize..25) {
            let items: Vec<usize> = (0..len).collect();
            let mut p = Paginator::new(size);
            let mut collected = Vec::with_capacity(len);
            for page in 1..=p.total_pages(len) {
                p.go_to(page, len);
                let slice = p.slice(&items);
                prop_assert!(!slice.is_empty());
                prop_assert!(slice.len() <= size);
                collected.extend_from_slice(slice);
            }
            prop_assert_eq!(collected, items);
        }
    }
}
