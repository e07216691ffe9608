//! In-memory pagination for list views.
//!
//! The backend returns whole collections; list pages slice them here.

use serde::Serialize;

/// Page size used when none (or zero) is requested.
pub const DEFAULT_PER_PAGE: usize = 20;

/// One page of a larger list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number, always within `1..=total_pages`.
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    /// Never zero; an empty list is one empty page.
    pub total_pages: usize,
}

/// Slice `items` into the requested page.
///
/// Out-of-range pages are clamped and `per_page == 0` falls back to
/// [`DEFAULT_PER_PAGE`].
///
/// ```
/// use depot_core::pagination::paginate;
///
/// let page = paginate((1..=45).collect::<Vec<_>>(), 9, 20);
/// assert_eq!(page.page, 3);
/// assert_eq!(page.items, vec![41, 42, 43, 44, 45]);
/// ```
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = if per_page == 0 { DEFAULT_PER_PAGE } else { per_page };
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);
    let items = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();
    Page {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}

impl<T> Page<T> {
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Previous page number, or the current one on the first page.
    #[must_use]
    pub const fn prev_page(&self) -> usize {
        if self.has_prev() { self.page - 1 } else { self.page }
    }

    /// Next page number, or the current one on the last page.
    #[must_use]
    pub const fn next_page(&self) -> usize {
        if self.has_next() { self.page + 1 } else { self.page }
    }

    /// 1-based position of the first item shown, zero for an empty list.
    #[must_use]
    pub fn first_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.per_page + 1
        }
    }

    /// 1-based position of the last item shown, zero for an empty list.
    #[must_use]
    pub fn last_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.first_index() + self.items.len() - 1
        }
    }

    /// Page numbers within `radius` of the current page.
    #[must_use]
    pub fn window(&self, radius: usize) -> Vec<usize> {
        let start = self.page.saturating_sub(radius).max(1);
        let end = (self.page + radius).min(self.total_pages);
        (start..=end).collect()
    }

    /// Convert the items while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_is_one_empty_page() {
        let page = paginate(Vec::<u8>::new(), 4, 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.first_index(), 0);
        assert_eq!(page.last_index(), 0);
        assert!(!page.has_prev());
        assert!(!page.has_next());
    }

    #[test]
    fn test_clamps_page_number() {
        let items: Vec<_> = (0..25).collect();
        assert_eq!(paginate(items.clone(), 0, 10).page, 1);
        let last = paginate(items, 99, 10);
        assert_eq!(last.page, 3);
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.first_index(), 21);
        assert_eq!(last.last_index(), 25);
        assert_eq!(last.next_page(), 3);
        assert_eq!(last.prev_page(), 2);
    }

    #[test]
    fn test_zero_per_page_uses_default() {
        let page = paginate((0..50).collect::<Vec<_>>(), 1, 0);
        assert_eq!(page.per_page, DEFAULT_PER_PAGE);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_window_stays_in_range() {
        let page = paginate((0..100).collect::<Vec<_>>(), 2, 10);
        assert_eq!(page.window(2), vec![1, 2, 3, 4]);
        let page = paginate((0..100).collect::<Vec<_>>(), 10, 10);
        assert_eq!(page.window(2), vec![8, 9, 10]);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = paginate(vec![1, 2, 3], 2, 2).map(|n| n * 10);
        assert_eq!(page.items, vec![30]);
        assert_eq!(page.total_items, 3);
        assert_eq!(page.page, 2);
    }
}
