//! `ratatui-datatable-core` provides the building blocks behind the `ratatui-datatable` widgets.
//!
//! Widgets are event-loop agnostic: feed them [`input::InputEvent`]s through `handle_event`, act
//! on the returned `*Action`, and call `render` every frame.
//!
//! Useful entry points:
//! - [`pager::compute_window`]: which page numbers and ellipses a pager shows.
//! - [`panel::DragResizeController`]: pointer-driven move/resize state for floating panels.
//! - [`panel::FloatingPanel`]: a draggable, resizable overlay built on the controller.
//! - [`filter::FilterPopover`]: per-column filters, inline or floating.
//! - [`table::DataTable`]: the full table over `serde_json::Value` rows.
//!
//! ## Features
//!
//! - `crossterm`: converts crossterm events into [`input::InputEvent`].
//! - `tracing`: emits `tracing` events for gestures, page changes and filter resets.
pub mod theme;

pub mod config;
pub mod error;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod input;
pub mod keymap;
pub mod render;

pub mod filter;
pub mod pager;
pub mod panel;
pub mod table;
pub mod text;
