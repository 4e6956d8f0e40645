//! Property tests for the pager window.
//!
//! 1. The window starts at page 1 and ends at the last page
//! 2. Page numbers strictly increase, so nothing repeats
//! 3. Ellipses never touch each other or the ends, and always hide at least one page
//! 4. The current page is always shown
//! 5. At most seven labels

use proptest::prelude::*;
use ratatui_datatable_core::pager::window::PageLabel;
use ratatui_datatable_core::pager::window::compute_window;

fn pages(labels: &[PageLabel]) -> Vec<usize> {
    labels.iter().filter_map(|l| l.page()).collect()
}

proptest! {
    #[test]
    fn anchored_at_first_and_last(total in 1usize..500, current in 0usize..600) {
        let labels = compute_window(current, total);
        prop_assert_eq!(labels.first().copied(), Some(PageLabel::Page(1)));
        prop_assert_eq!(labels.last().copied(), Some(PageLabel::Page(total)));
    }

    #[test]
    fn page_numbers_strictly_increase(total in 1usize..500, current in 1usize..500) {
        let labels = compute_window(current, total);
        let shown = pages(&labels);
        prop_assert!(shown.windows(2).all(|w| w[0] < w[1]), "{:?}", labels);
    }

    #[test]
    fn ellipses_hide_at_least_one_page(total in 1usize..500, current in 1usize..500) {
        let labels = compute_window(current, total);
        for (i, label) in labels.iter().enumerate() {
            if *label != PageLabel::Ellipsis {
                continue;
            }
            prop_assert!(i > 0 && i + 1 < labels.len());
            let before = labels[i - 1].page();
            let after = labels[i + 1].page();
            prop_assert!(before.is_some() && after.is_some(), "{:?}", labels);
            prop_assert!(after.unwrap_or(0) >= before.unwrap_or(0) + 2, "{:?}", labels);
        }
    }

    #[test]
    fn gaps_without_ellipsis_are_contiguous(total in 1usize..500, current in 1usize..500) {
        let labels = compute_window(current, total);
        for w in labels.windows(2) {
            if let (Some(a), Some(b)) = (w[0].page(), w[1].page()) {
                prop_assert_eq!(b, a + 1, "{:?}", labels);
            }
        }
    }

    #[test]
    fn current_page_is_shown(total in 1usize..500, current in 1usize..500) {
        let labels = compute_window(current, total);
        let current = current.min(total);
        prop_assert!(labels.contains(&PageLabel::Page(current)), "{:?}", labels);
        prop_assert!(labels.len() <= 7);
    }
}

#[test]
fn small_totals_show_every_page() {
    for total in 1..=6 {
        for current in 1..=total {
            let shown = pages(&compute_window(current, total));
            assert_eq!(shown, (1..=total).collect::<Vec<_>>());
        }
    }
}
