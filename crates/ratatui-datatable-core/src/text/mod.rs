//! Text cells: wrapping, search highlighting, and expand/collapse.

pub mod expandable;
pub mod highlight;
pub mod wrap;

pub use expandable::ExpandableAction;
pub use expandable::ExpandableText;
pub use expandable::ExpandableTextOptions;
