//! Pager window computation.
//!
//! A pager never shows every page. It always anchors the first and last page and collapses the
//! rest into at most one run of neighbours around the current page, with [`PageLabel::Ellipsis`]
//! standing in for the elided ranges.

/// One entry of a pager window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLabel {
    /// A 1-based page number.
    Page(usize),
    Ellipsis,
}

impl PageLabel {
    pub fn page(self) -> Option<usize> {
        match self {
            PageLabel::Page(n) => Some(n),
            PageLabel::Ellipsis => None,
        }
    }
}

/// Pages shown after the first page while the current page is near the start.
const LEADING_RUN_END: usize = 5;
/// Page counts above this get ellipses.
const COMPACT_THRESHOLD: usize = 6;

/// Computes the labels of a pager for `current_page` out of `total_pages` (both 1-based).
///
/// `total_pages` is clamped to at least 1 and `current_page` into `1..=total_pages`.
///
/// ```
/// use ratatui_datatable_core::pager::window::PageLabel::{Ellipsis, Page};
/// use ratatui_datatable_core::pager::window::compute_window;
///
/// assert_eq!(
///     compute_window(10, 20),
///     vec![Page(1), Ellipsis, Page(9), Page(10), Page(11), Ellipsis, Page(20)],
/// );
/// ```
pub fn compute_window(current_page: usize, total_pages: usize) -> Vec<PageLabel> {
    let total = total_pages.max(1);
    let current = current_page.clamp(1, total);
    let compact = total > COMPACT_THRESHOLD;

    let mut labels = Vec::with_capacity(7);
    labels.push(PageLabel::Page(1));

    if current <= 4 {
        let end = LEADING_RUN_END.min(total.saturating_sub(1));
        labels.extend((2..=end).map(PageLabel::Page));
        if compact {
            labels.push(PageLabel::Ellipsis);
        }
    } else if current + 3 >= total {
        if compact {
            labels.push(PageLabel::Ellipsis);
        }
        // Lower bound 2 keeps page 1 from repeating when there are only a handful of pages.
        let start = total.saturating_sub(4).max(2);
        labels.extend((start..total).map(PageLabel::Page));
    } else {
        labels.push(PageLabel::Ellipsis);
        labels.extend((current - 1..=current + 1).map(PageLabel::Page));
        labels.push(PageLabel::Ellipsis);
    }

    if total > 1 {
        labels.push(PageLabel::Page(total));
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::PageLabel::Ellipsis;
    use super::PageLabel::Page;
    use super::*;

    fn pages(ns: &[usize]) -> Vec<PageLabel> {
        ns.iter().copied().map(Page).collect()
    }

    #[test]
    fn single_page() {
        assert_eq!(compute_window(1, 1), pages(&[1]));
    }

    #[test]
    fn two_pages() {
        assert_eq!(compute_window(1, 2), pages(&[1, 2]));
        assert_eq!(compute_window(2, 2), pages(&[1, 2]));
    }

    #[test]
    fn six_pages_never_elide() {
        for current in 1..=6 {
            assert_eq!(compute_window(current, 6), pages(&[1, 2, 3, 4, 5, 6]));
        }
    }

    #[test]
    fn seven_pages_from_start() {
        assert_eq!(
            compute_window(1, 7),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(7)]
        );
    }

    #[test]
    fn middle_of_twenty() {
        assert_eq!(
            compute_window(10, 20),
            vec![Page(1), Ellipsis, Page(9), Page(10), Page(11), Ellipsis, Page(20)]
        );
    }

    #[test]
    fn last_page_uses_near_end_run() {
        assert_eq!(
            compute_window(20, 20),
            vec![Page(1), Ellipsis, Page(16), Page(17), Page(18), Page(19), Page(20)]
        );
    }

    #[test]
    fn near_end_with_few_pages_does_not_repeat_first_page() {
        assert_eq!(compute_window(5, 5), pages(&[1, 2, 3, 4, 5]));
        assert_eq!(compute_window(6, 6), pages(&[1, 2, 3, 4, 5, 6]));
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        assert_eq!(compute_window(0, 0), pages(&[1]));
        assert_eq!(compute_window(99, 20), compute_window(20, 20));
        assert_eq!(compute_window(0, 20), compute_window(1, 20));
    }
}
