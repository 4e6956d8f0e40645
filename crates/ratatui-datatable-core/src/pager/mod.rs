//! Pagination: the page-window algorithm, pagination state, and the pager bar widget.

pub mod state;
pub mod view;
pub mod window;

pub use state::PaginationState;
pub use view::PagerAction;
pub use view::PagerBar;
pub use view::PagerBarOptions;
pub use window::PageLabel;
pub use window::compute_window;
