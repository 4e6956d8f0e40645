use crate::input::InputEvent;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::panel::gesture::DragBounds;
use crate::panel::gesture::DragResizeController;
use crate::panel::gesture::Point;
use crate::panel::gesture::Size;
use crate::render;
use crate::theme::Theme;
use crate::theme::or_theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;

/// Result of feeding an event to a [`FloatingPanel`].
///
/// `CaptureAcquired` and `CaptureReleased` always come in pairs: between them the panel wants
/// every mouse event, wherever it happens on screen. Closing mid-gesture reports
/// `CaptureReleased`, so the pair is never broken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelAction {
    None,
    Redraw,
    CaptureAcquired,
    CaptureReleased,
    Closed,
}

#[derive(Clone, Debug)]
pub struct FloatingPanelOptions {
    pub title: String,
    pub default_size: Size,
    pub min_size: Size,
    pub initial_position: Point,
    /// Keep the panel inside the screen while dragging.
    pub keep_on_screen: bool,
    pub style: Style,
    pub border_style: Style,
    pub title_style: Style,
}

impl Default for FloatingPanelOptions {
    fn default() -> Self {
        Self {
            title: "Filters".to_string(),
            default_size: Size::new(48, 18),
            min_size: Size::new(30, 8),
            initial_position: Point::new(4, 2),
            keep_on_screen: true,
            style: Style::default(),
            border_style: Style::default(),
            title_style: Style::default().add_modifier(Modifier::BOLD),
        }
    }
}

/// A bordered overlay that can be dragged by its title row and resized from its bottom-right
/// corner.
///
/// Mouse routing: while idle the panel only reacts to presses on its own rectangle; once a drag
/// or resize starts it consumes every move and the next release, wherever they happen. Use
/// [`FloatingPanel::wants_mouse`] to decide whether an event belongs to the panel.
#[derive(Clone, Debug)]
pub struct FloatingPanel {
    controller: DragResizeController,
    options: FloatingPanelOptions,
    last_pointer: Option<(u16, u16)>,
}

impl Default for FloatingPanel {
    fn default() -> Self {
        Self::with_options(FloatingPanelOptions::default())
    }
}

impl FloatingPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FloatingPanelOptions) -> Self {
        let controller = DragResizeController::new(options.default_size)
            .with_min_size(options.min_size)
            .with_position(options.initial_position);
        Self {
            controller,
            options,
            last_pointer: None,
        }
    }

    pub fn controller(&self) -> &DragResizeController {
        &self.controller
    }

    pub fn options(&self) -> &FloatingPanelOptions {
        &self.options
    }

    /// The panel rectangle clipped to `screen`.
    pub fn area(&self, screen: Rect) -> Rect {
        let p = self.controller.position();
        let s = self.controller.size();
        let x0 = (p.x as i64).max(screen.x as i64);
        let y0 = (p.y as i64).max(screen.y as i64);
        let x1 = (p.x as i64 + s.width as i64).min(screen.right() as i64);
        let y1 = (p.y as i64 + s.height as i64).min(screen.bottom() as i64);
        if x1 <= x0 || y1 <= y0 {
            return Rect::new(screen.x, screen.y, 0, 0);
        }
        Rect::new(x0 as u16, y0 as u16, (x1 - x0) as u16, (y1 - y0) as u16)
    }

    pub fn wants_mouse(&self, m: &MouseEvent) -> bool {
        self.controller.is_active() || self.contains(m.x, m.y)
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        let p = self.controller.position();
        let s = self.controller.size();
        let (x, y) = (x as i64, y as i64);
        x >= p.x as i64
            && y >= p.y as i64
            && x < p.x as i64 + s.width as i64
            && y < p.y as i64 + s.height as i64
    }

    pub fn handle_event(&mut self, event: InputEvent) -> PanelAction {
        match event {
            InputEvent::Mouse(m) => self.handle_mouse(m),
            InputEvent::Key(_) | InputEvent::Paste(_) => PanelAction::None,
        }
    }

    /// Tears the panel down. Any live gesture is ended first, so capture never outlives the
    /// panel. Returns `CaptureReleased` instead of `Closed` when a gesture was cut short.
    pub fn close(&mut self) -> PanelAction {
        let released = self.controller.end_gesture();
        self.last_pointer = None;
        if released {
            PanelAction::CaptureReleased
        } else {
            PanelAction::Closed
        }
    }

    /// Draws the frame and returns the content area inside it.
    pub fn render(&mut self, screen: Rect, buf: &mut Buffer, theme: &Theme) -> Rect {
        if self.options.keep_on_screen {
            self.controller.set_bounds(Some(DragBounds {
                origin: Point::new(screen.x as i32, screen.y as i32),
                size: Size::new(screen.width as u32, screen.height as u32),
            }));
        }

        let area = self.area(screen);
        if area.width < 2 || area.height < 2 {
            return Rect::new(area.x, area.y, 0, 0);
        }

        let base = or_theme(self.options.style, theme.text_primary);
        let border = if self.controller.is_active() {
            or_theme(self.options.border_style, theme.border_active)
        } else {
            or_theme(self.options.border_style, theme.border)
        };
        let title_style = base.patch(self.options.title_style);

        render::fill(area, buf, " ", base);
        let inner = render::draw_box(area, buf, border);

        let title = format!(" ⠿ {} ", self.options.title);
        let title_room = area.width.saturating_sub(5);
        render::render_str_clipped(area.x + 1, area.y, 0, title_room, buf, &title, title_style);
        buf.set_string(area.right() - 3, area.y, "×", border);
        buf.set_string(area.right() - 1, area.bottom() - 1, "◢", border);

        inner
    }

    fn handle_mouse(&mut self, m: MouseEvent) -> PanelAction {
        if self.controller.is_active() {
            return self.handle_captured(m);
        }
        if !m.is_left_press() || !self.contains(m.x, m.y) {
            return PanelAction::None;
        }

        let p = self.controller.position();
        let s = self.controller.size();
        let (x, y) = (m.x as i32, m.y as i32);
        let right = p.x + s.width as i32 - 1;
        let bottom = p.y + s.height as i32 - 1;

        if y == p.y && x == right - 2 {
            return self.close();
        }
        let started = if x == right && y == bottom {
            self.controller.begin_resize()
        } else if y == p.y {
            self.controller.begin_drag(x, y)
        } else {
            false
        };
        if started {
            self.last_pointer = Some((m.x, m.y));
            PanelAction::CaptureAcquired
        } else {
            PanelAction::None
        }
    }

    fn handle_captured(&mut self, m: MouseEvent) -> PanelAction {
        // A bare move or a new press means the button went up where we could not see it,
        // typically outside the terminal window.
        if m.is_release() || matches!(m.kind, MouseEventKind::Moved | MouseEventKind::Down(_)) {
            self.controller.end_gesture();
            self.last_pointer = None;
            return PanelAction::CaptureReleased;
        }
        if !m.is_drag() {
            return PanelAction::None;
        }
        let (lx, ly) = self.last_pointer.unwrap_or((m.x, m.y));
        self.last_pointer = Some((m.x, m.y));
        let dx = m.x as i32 - lx as i32;
        let dy = m.y as i32 - ly as i32;
        if self
            .controller
            .on_pointer_move(m.x as i32, m.y as i32, dx, dy)
        {
            PanelAction::Redraw
        } else {
            PanelAction::None
        }
    }
}
