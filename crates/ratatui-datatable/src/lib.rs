//! A configurable data table for `ratatui`.
//!
//! [`table::DataTable`] renders JSON rows with global search, per-column filters, sorting,
//! pagination, column visibility and pinning. Its filter panel can float above the table as a
//! draggable, resizable overlay.
//!
//! ```
//! use ratatui_datatable::config::TableSpec;
//! use ratatui_datatable::table::DataTable;
//! use serde_json::json;
//!
//! let spec = TableSpec::from_json(r#"{
//!     "columns": [
//!         { "accessorKey": "sku", "header": "SKU" },
//!         { "accessorKey": "qty", "header": "Qty", "type": "number" }
//!     ],
//!     "defaultSorting": [{ "id": "qty", "desc": true }]
//! }"#)?;
//! let mut table = DataTable::from_spec(spec);
//! table.set_rows(vec![json!({ "sku": "A-1", "qty": 4 }), json!({ "sku": "B-2", "qty": 9 })]);
//! assert_eq!(table.page_rows(), &[1, 0]);
//! # Ok::<(), ratatui_datatable::error::ConfigError>(())
//! ```
//!
//! Everything here is re-exported from `ratatui-datatable-core`; depend on that crate directly
//! if you only need the primitives (pager window, drag/resize controller).

pub use ratatui_datatable_core::config;
pub use ratatui_datatable_core::error;
pub use ratatui_datatable_core::filter;
pub use ratatui_datatable_core::input;
pub use ratatui_datatable_core::keymap;
pub use ratatui_datatable_core::pager;
pub use ratatui_datatable_core::panel;
pub use ratatui_datatable_core::render;
pub use ratatui_datatable_core::table;
pub use ratatui_datatable_core::text;
pub use ratatui_datatable_core::theme;

#[cfg(feature = "crossterm")]
pub use ratatui_datatable_core::crossterm_input;

/// The types most apps need.
pub mod prelude {
    pub use crate::config::ColumnConfig;
    pub use crate::config::ColumnType;
    pub use crate::config::CustomButton;
    pub use crate::config::TableConfig;
    pub use crate::config::TableSpec;
    pub use crate::input::InputEvent;
    pub use crate::table::DataTable;
    pub use crate::table::ExportFormat;
    pub use crate::table::ExportScope;
    pub use crate::table::TableAction;
    pub use crate::theme::Theme;
}
