//! The data table: JSON rows, search, filters, sorting, pagination.

pub mod menu;
pub mod model;
pub mod view;

pub use menu::ExportFormat;
pub use menu::ExportScope;
pub use view::DataTable;
pub use view::DataTableBindings;
pub use view::DataTableOptions;
pub use view::TableAction;
