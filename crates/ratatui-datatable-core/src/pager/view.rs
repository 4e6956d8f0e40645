use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::MouseEvent;
use crate::keymap;
use crate::pager::state::PaginationState;
use crate::pager::window::PageLabel;
use crate::pager::window::compute_window;
use crate::render;
use crate::theme::Theme;
use crate::theme::or_theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagerAction {
    None,
    /// The 0-based page index changed.
    PageChanged(usize),
    PageSizeChanged(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagerCommand {
    First,
    Previous,
    Next,
    Last,
    GrowPageSize,
    ShrinkPageSize,
}

#[derive(Clone, Debug)]
pub struct PagerBindings {
    pub first: Vec<KeyEvent>,
    pub previous: Vec<KeyEvent>,
    pub next: Vec<KeyEvent>,
    pub last: Vec<KeyEvent>,
    pub grow_page_size: Vec<KeyEvent>,
    pub shrink_page_size: Vec<KeyEvent>,
}

impl Default for PagerBindings {
    fn default() -> Self {
        Self {
            first: vec![keymap::key(KeyCode::Home)],
            previous: vec![keymap::key(KeyCode::Left), keymap::key_char('h')],
            next: vec![keymap::key(KeyCode::Right), keymap::key_char('l')],
            last: vec![keymap::key(KeyCode::End)],
            grow_page_size: vec![keymap::key_char('+')],
            shrink_page_size: vec![keymap::key_char('-')],
        }
    }
}

impl PagerBindings {
    pub fn command_for(&self, key: &KeyEvent) -> Option<PagerCommand> {
        [
            (&self.first, PagerCommand::First),
            (&self.previous, PagerCommand::Previous),
            (&self.next, PagerCommand::Next),
            (&self.last, PagerCommand::Last),
            (&self.grow_page_size, PagerCommand::GrowPageSize),
            (&self.shrink_page_size, PagerCommand::ShrinkPageSize),
        ]
        .into_iter()
        .find(|(keys, _)| keymap::any_matches(keys, key))
        .map(|(_, cmd)| cmd)
    }
}

/// Options for [`PagerBar`].
#[derive(Clone, Debug)]
pub struct PagerBarOptions {
    pub page_size_options: Vec<usize>,
    pub show_page_size: bool,
    pub show_first_last: bool,
    pub page_size_label: String,
    pub style: Style,
    pub current_style: Style,
    pub disabled_style: Style,
}

impl Default for PagerBarOptions {
    fn default() -> Self {
        Self {
            page_size_options: vec![5, 10, 20, 30, 40, 50],
            show_page_size: true,
            show_first_last: true,
            page_size_label: "rows per page".to_string(),
            style: Style::default(),
            current_style: Style::default().add_modifier(Modifier::REVERSED),
            disabled_style: Style::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    First,
    Previous,
    Page(usize),
    Next,
    Last,
    PageSize,
}

#[derive(Clone, Copy, Debug)]
struct HitRegion {
    x: u16,
    y: u16,
    width: u16,
    target: Target,
}

/// A single-row pager: first/previous arrows, the page window, next/last arrows and a
/// rows-per-page selector.
///
/// Render it every frame; mouse hit regions are recorded during `render` and used by the next
/// `handle_event`.
#[derive(Clone, Debug, Default)]
pub struct PagerBar {
    pub state: PaginationState,
    options: PagerBarOptions,
    bindings: PagerBindings,
    hits: Vec<HitRegion>,
}

impl PagerBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: PagerBarOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &PagerBarOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: PagerBarOptions) {
        self.options = options;
        self.hits.clear();
    }

    pub fn set_bindings(&mut self, bindings: PagerBindings) {
        self.bindings = bindings;
    }

    /// Labels for the current state.
    pub fn labels(&self) -> Vec<PageLabel> {
        compute_window(self.state.current_page(), self.state.page_count())
    }

    pub fn handle_event(&mut self, event: InputEvent) -> PagerAction {
        match event {
            InputEvent::Key(key) => match self.bindings.command_for(&key) {
                Some(cmd) => self.apply(cmd),
                None => PagerAction::None,
            },
            InputEvent::Mouse(m) => self.handle_mouse(m),
            InputEvent::Paste(_) => PagerAction::None,
        }
    }

    pub fn apply(&mut self, cmd: PagerCommand) -> PagerAction {
        let changed = match cmd {
            PagerCommand::First => self.state.first(),
            PagerCommand::Previous => self.state.previous(),
            PagerCommand::Next => self.state.next(),
            PagerCommand::Last => self.state.last(),
            PagerCommand::GrowPageSize => return self.step_page_size(true),
            PagerCommand::ShrinkPageSize => return self.step_page_size(false),
        };
        self.page_changed(changed)
    }

    /// Jumps to a 1-based page.
    pub fn go_to_page(&mut self, page: usize) -> PagerAction {
        let changed = self.state.set_page_index(page.saturating_sub(1));
        self.page_changed(changed)
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.hits.clear();
        if area.width == 0 || area.height == 0 {
            return;
        }

        let base = or_theme(self.options.style, theme.text_primary);
        let disabled = or_theme(self.options.disabled_style, theme.text_muted);
        let current = self.options.current_style.patch(theme.accent);
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), base);

        let mut x = area.x;
        let right = area.right();
        let y = area.y;

        let mut segments: Vec<(String, Style, Option<Target>)> = Vec::new();
        let prev_style = if self.state.can_previous() { base } else { disabled };
        let next_style = if self.state.can_next() { base } else { disabled };
        if self.options.show_first_last {
            segments.push(("«".to_string(), prev_style, Some(Target::First)));
        }
        segments.push(("‹".to_string(), prev_style, Some(Target::Previous)));
        for label in self.labels() {
            match label {
                PageLabel::Page(n) => {
                    let style = if n == self.state.current_page() {
                        current
                    } else {
                        base
                    };
                    segments.push((n.to_string(), style, Some(Target::Page(n))));
                }
                PageLabel::Ellipsis => segments.push(("…".to_string(), disabled, None)),
            }
        }
        segments.push(("›".to_string(), next_style, Some(Target::Next)));
        if self.options.show_first_last {
            segments.push(("»".to_string(), next_style, Some(Target::Last)));
        }

        for (text, style, target) in segments {
            let padded = format!(" {text} ");
            let w = render::display_width(&padded) as u16;
            if x + w > right {
                return;
            }
            render::render_str_clipped(x, y, 0, w, buf, &padded, style);
            if let Some(target) = target {
                self.hits.push(HitRegion {
                    x,
                    y,
                    width: w,
                    target,
                });
            }
            x += w;
        }

        if self.options.show_page_size {
            let selector = format!(
                "  {} {}",
                self.state.page_size(),
                self.options.page_size_label
            );
            let w = render::display_width(&selector) as u16;
            if x + w <= right {
                render::render_str_clipped(x, y, 0, w, buf, &selector, disabled);
                self.hits.push(HitRegion {
                    x,
                    y,
                    width: w,
                    target: Target::PageSize,
                });
            }
        }
    }

    fn handle_mouse(&mut self, m: MouseEvent) -> PagerAction {
        if !m.is_left_press() {
            return PagerAction::None;
        }
        let Some(hit) = self
            .hits
            .iter()
            .find(|h| h.y == m.y && m.x >= h.x && m.x < h.x + h.width)
            .copied()
        else {
            return PagerAction::None;
        };
        match hit.target {
            Target::First => self.apply(PagerCommand::First),
            Target::Previous => self.apply(PagerCommand::Previous),
            Target::Next => self.apply(PagerCommand::Next),
            Target::Last => self.apply(PagerCommand::Last),
            Target::Page(n) => self.go_to_page(n),
            Target::PageSize => self.cycle_page_size(),
        }
    }

    fn step_page_size(&mut self, grow: bool) -> PagerAction {
        let current = self.state.page_size();
        let opts = &self.options.page_size_options;
        let next = if grow {
            opts.iter().copied().filter(|s| *s > current).min()
        } else {
            opts.iter().copied().filter(|s| *s < current).max()
        };
        match next {
            Some(size) => self.set_page_size(size),
            None => PagerAction::None,
        }
    }

    fn cycle_page_size(&mut self) -> PagerAction {
        match self.step_page_size(true) {
            PagerAction::None => {
                let smallest = self.options.page_size_options.iter().copied().min();
                match smallest {
                    Some(size) => self.set_page_size(size),
                    None => PagerAction::None,
                }
            }
            action => action,
        }
    }

    fn set_page_size(&mut self, size: usize) -> PagerAction {
        if !self.state.set_page_size(size) {
            return PagerAction::None;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(page_size = size, "pager page size changed");
        PagerAction::PageSizeChanged(self.state.page_size())
    }

    fn page_changed(&self, changed: bool) -> PagerAction {
        if !changed {
            return PagerAction::None;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(page = self.state.current_page(), "pager page changed");
        PagerAction::PageChanged(self.state.page_index())
    }
}
