use crate::filter::panel::FilterPanel;
use crate::filter::panel::FilterPanelAction;
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::keymap;
use crate::panel::FloatingPanel;
use crate::panel::FloatingPanelOptions;
use crate::panel::PanelAction;
use crate::render;
use crate::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// Where the filter panel is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    Closed,
    /// Drawn into an area the host lays out, e.g. beside the table.
    Inline,
    /// Drawn as a draggable, resizable overlay.
    Floating,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterPopoverAction {
    None,
    Redraw,
    FiltersChanged,
    CaptureAcquired,
    CaptureReleased,
    Closed,
}

#[derive(Clone, Debug)]
pub struct FilterPopoverBindings {
    /// Switches an open panel between inline and floating.
    pub switch_mode: Vec<KeyEvent>,
}

impl Default for FilterPopoverBindings {
    fn default() -> Self {
        Self {
            switch_mode: vec![keymap::key_ctrl('f')],
        }
    }
}

/// The filter panel plus its presentation: closed, inline, or floating.
///
/// Keys go to the panel while it is open (Esc on an empty field closes it, `Ctrl+F` detaches or
/// docks it). In floating mode mouse
/// events the overlay claims are routed to it, so a drag keeps working when the pointer leaves
/// the overlay. Closing always ends a live drag or resize first.
#[derive(Clone, Debug, Default)]
pub struct FilterPopover {
    pub panel: FilterPanel,
    floating: FloatingPanel,
    mode: FilterMode,
    bindings: FilterPopoverBindings,
}

impl FilterPopover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_floating_options(options: FloatingPanelOptions) -> Self {
        Self {
            floating: FloatingPanel::with_options(options),
            ..Self::default()
        }
    }

    pub fn set_bindings(&mut self, bindings: FilterPopoverBindings) {
        self.bindings = bindings;
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != FilterMode::Closed
    }

    pub fn floating(&self) -> &FloatingPanel {
        &self.floating
    }

    pub fn open_inline(&mut self) -> FilterPopoverAction {
        let released = self.end_floating();
        self.mode = FilterMode::Inline;
        released.unwrap_or(FilterPopoverAction::Redraw)
    }

    /// Opens the floating overlay, or closes it if it is already open.
    pub fn toggle_floating(&mut self) -> FilterPopoverAction {
        if self.mode == FilterMode::Floating {
            return self.close();
        }
        self.mode = FilterMode::Floating;
        FilterPopoverAction::Redraw
    }

    /// Moves an open panel between inline and floating. A live gesture is released when
    /// docking.
    pub fn switch_mode(&mut self) -> FilterPopoverAction {
        match self.mode {
            FilterMode::Closed => FilterPopoverAction::None,
            FilterMode::Inline => self.toggle_floating(),
            FilterMode::Floating => self.open_inline(),
        }
    }

    /// Closes the panel. Returns `CaptureReleased` instead of `Closed` when a drag or resize was
    /// cut short; the panel is closed either way.
    pub fn close(&mut self) -> FilterPopoverAction {
        if self.mode == FilterMode::Closed {
            return FilterPopoverAction::None;
        }
        let released = self.end_floating();
        self.mode = FilterMode::Closed;
        #[cfg(feature = "tracing")]
        tracing::debug!(released_capture = released.is_some(), "filter panel closed");
        released.unwrap_or(FilterPopoverAction::Closed)
    }

    /// Toolbar label, e.g. `Filters (2)`.
    pub fn trigger_label(&self) -> String {
        match self.panel.active_count() {
            0 => "Filters".to_string(),
            n => format!("Filters ({n})"),
        }
    }

    /// Whether a mouse event should be routed here rather than to the widgets underneath.
    pub fn wants_mouse(&self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Mouse(m) => self.mode == FilterMode::Floating && self.floating.wants_mouse(m),
            _ => false,
        }
    }

    pub fn handle_event(&mut self, event: InputEvent) -> FilterPopoverAction {
        if !self.is_open() {
            return FilterPopoverAction::None;
        }
        match event {
            InputEvent::Mouse(m) => {
                if self.mode != FilterMode::Floating || !self.floating.wants_mouse(&m) {
                    return FilterPopoverAction::None;
                }
                match self.floating.handle_event(InputEvent::Mouse(m)) {
                    PanelAction::None => FilterPopoverAction::None,
                    PanelAction::Redraw => FilterPopoverAction::Redraw,
                    PanelAction::CaptureAcquired => FilterPopoverAction::CaptureAcquired,
                    PanelAction::CaptureReleased => FilterPopoverAction::CaptureReleased,
                    PanelAction::Closed => {
                        self.mode = FilterMode::Closed;
                        FilterPopoverAction::Closed
                    }
                }
            }
            InputEvent::Key(key) => {
                let focused_active = self
                    .panel
                    .focused()
                    .is_some_and(|f| self.panel.filters.is_active(&f.key));
                if key.code == KeyCode::Esc && !focused_active {
                    return self.close();
                }
                if keymap::any_matches(&self.bindings.switch_mode, &key) {
                    return self.switch_mode();
                }
                map_panel(self.panel.handle_event(InputEvent::Key(key)))
            }
            paste @ InputEvent::Paste(_) => map_panel(self.panel.handle_event(paste)),
        }
    }

    /// Renders the panel. Inline mode fills `area`; floating mode positions itself on `area`
    /// treated as the whole screen.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        match self.mode {
            FilterMode::Closed => {}
            FilterMode::Inline => {
                render::fill(area, buf, " ", theme.text_primary);
                self.panel.render(area, buf, theme);
            }
            FilterMode::Floating => {
                let inner = self.floating.render(area, buf, theme);
                if inner.width > 0 && inner.height > 0 {
                    self.panel.render(inner, buf, theme);
                }
            }
        }
    }

    fn end_floating(&mut self) -> Option<FilterPopoverAction> {
        if self.floating.controller().is_active() {
            self.floating.close();
            Some(FilterPopoverAction::CaptureReleased)
        } else {
            None
        }
    }
}

fn map_panel(action: FilterPanelAction) -> FilterPopoverAction {
    match action {
        FilterPanelAction::None => FilterPopoverAction::None,
        FilterPanelAction::Redraw => FilterPopoverAction::Redraw,
        FilterPanelAction::FiltersChanged => FilterPopoverAction::FiltersChanged,
    }
}
