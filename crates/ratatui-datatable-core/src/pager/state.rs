use std::ops::Range;

/// Pagination over `row_count` rows, `page_size` rows at a time.
///
/// `page_index` is 0-based; the pager labels are 1-based. Every setter keeps the index inside
/// `0..page_count()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationState {
    page_index: usize,
    page_size: usize,
    row_count: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PaginationState {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
            row_count: 0,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// 1-based current page, as shown in the pager.
    pub fn current_page(&self) -> usize {
        self.page_index + 1
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of pages, never less than one so an empty table still shows page 1.
    pub fn page_count(&self) -> usize {
        self.row_count.div_ceil(self.page_size).max(1)
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    /// Returns `true` if the index changed.
    pub fn set_page_index(&mut self, index: usize) -> bool {
        let next = index.min(self.page_count() - 1);
        let changed = next != self.page_index;
        self.page_index = next;
        changed
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let page_size = page_size.max(1);
        if page_size == self.page_size {
            return false;
        }
        self.page_size = page_size;
        self.page_index = 0;
        true
    }

    pub fn set_row_count(&mut self, rows: usize) {
        self.row_count = rows;
        self.page_index = self.page_index.min(self.page_count() - 1);
    }

    pub fn previous(&mut self) -> bool {
        self.set_page_index(self.page_index.saturating_sub(1))
    }

    pub fn next(&mut self) -> bool {
        self.set_page_index(self.page_index + 1)
    }

    pub fn first(&mut self) -> bool {
        self.set_page_index(0)
    }

    pub fn last(&mut self) -> bool {
        self.set_page_index(self.page_count() - 1)
    }

    /// Row indices shown on the current page.
    pub fn page_range(&self) -> Range<usize> {
        let start = (self.page_index * self.page_size).min(self.row_count);
        let end = (start + self.page_size).min(self.row_count);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_has_one_page() {
        let s = PaginationState::new(10);
        assert_eq!(s.page_count(), 1);
        assert!(!s.can_next());
        assert!(!s.can_previous());
        assert_eq!(s.page_range(), 0..0);
    }

    #[test]
    fn last_page_is_partial() {
        let mut s = PaginationState::new(10);
        s.set_row_count(95);
        assert_eq!(s.page_count(), 10);
        assert!(s.last());
        assert_eq!(s.page_range(), 90..95);
        assert!(!s.next());
    }

    #[test]
    fn page_size_change_resets_to_first_page() {
        let mut s = PaginationState::new(10);
        s.set_row_count(100);
        s.set_page_index(4);
        assert!(s.set_page_size(20));
        assert_eq!(s.page_index(), 0);
        assert!(!s.set_page_size(20));
    }

    #[test]
    fn shrinking_rows_clamps_index() {
        let mut s = PaginationState::new(5);
        s.set_row_count(50);
        s.set_page_index(9);
        s.set_row_count(12);
        assert_eq!(s.page_index(), 2);
        assert_eq!(s.page_range(), 10..12);
    }
}
