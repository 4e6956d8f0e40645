//! Floating, draggable and resizable panels.

pub mod floating;
pub mod gesture;

pub use floating::FloatingPanel;
pub use floating::FloatingPanelOptions;
pub use floating::PanelAction;
pub use gesture::DragResizeController;
pub use gesture::Gesture;
