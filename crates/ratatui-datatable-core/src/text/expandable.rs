use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::MouseEvent;
use crate::render;
use crate::text::highlight;
use crate::text::wrap;
use crate::theme::Theme;
use crate::theme::or_theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use std::borrow::Cow;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpandableAction {
    None,
    /// Expansion toggled; carries the new expanded state.
    Toggled(bool),
}

#[derive(Clone, Debug)]
pub struct ExpandableTextOptions {
    /// Values longer than this many characters are truncated while collapsed.
    pub max_length: usize,
    /// Line clamp while collapsed.
    pub collapsed_lines: u16,
    pub ellipsis: String,
    pub style: Style,
    pub highlight_style: Style,
    pub toggle_style: Style,
}

impl Default for ExpandableTextOptions {
    fn default() -> Self {
        Self {
            max_length: 50,
            collapsed_lines: 2,
            ellipsis: "...".to_string(),
            style: Style::default(),
            highlight_style: Style::default(),
            toggle_style: Style::default(),
        }
    }
}

/// A text cell that truncates long values and can be expanded to show them in full.
///
/// Short values render as-is with no toggle. Long values show `max_length` characters plus an
/// ellipsis, wrapped and clamped to `collapsed_lines`, and a `▾`/`▴` toggle in the last column.
/// Occurrences of the search term are highlighted in both states.
#[derive(Clone, Debug, Default)]
pub struct ExpandableText {
    value: String,
    search_term: String,
    expanded: bool,
    options: ExpandableTextOptions,
    toggle_at: Option<(u16, u16)>,
}

impl ExpandableText {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_options(value: impl Into<String>, options: ExpandableTextOptions) -> Self {
        Self {
            value: value.into(),
            options,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the value and collapses.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.expanded = false;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn options(&self) -> &ExpandableTextOptions {
        &self.options
    }

    pub fn is_truncatable(&self) -> bool {
        self.value.chars().count() > self.options.max_length
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Expands or collapses. Values that fit are never marked expanded.
    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded && self.is_truncatable();
    }

    pub fn toggle(&mut self) -> ExpandableAction {
        if !self.is_truncatable() {
            return ExpandableAction::None;
        }
        self.expanded = !self.expanded;
        ExpandableAction::Toggled(self.expanded)
    }

    /// The text shown in the current state, before wrapping.
    pub fn display_text(&self) -> Cow<'_, str> {
        if self.expanded || !self.is_truncatable() {
            return Cow::Borrowed(&self.value);
        }
        let mut s: String = self.value.chars().take(self.options.max_length).collect();
        s.push_str(&self.options.ellipsis);
        Cow::Owned(s)
    }

    /// Wrapped lines for a cell `width` columns wide, with the collapsed line clamp applied.
    pub fn lines(&self, width: u16) -> Vec<String> {
        let text_w = self.text_width(width);
        let mut lines = wrap::wrap_words(&self.display_text(), text_w);
        if !self.expanded && self.is_truncatable() {
            lines.truncate(self.options.collapsed_lines.max(1) as usize);
        }
        lines
    }

    /// Rows needed to render at `width`.
    pub fn height(&self, width: u16) -> u16 {
        self.lines(width).len().max(1) as u16
    }

    pub fn handle_event(&mut self, event: InputEvent) -> ExpandableAction {
        match event {
            InputEvent::Key(key) => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => self.toggle(),
                _ => ExpandableAction::None,
            },
            InputEvent::Mouse(m) => self.handle_mouse(m),
            InputEvent::Paste(_) => ExpandableAction::None,
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.toggle_at = None;
        if area.width == 0 || area.height == 0 {
            return;
        }

        let base = or_theme(self.options.style, theme.text_primary);
        let hl = or_theme(self.options.highlight_style, theme.highlight);
        let text_w = self.text_width(area.width);

        for (dy, line) in self.lines(area.width).iter().enumerate() {
            if dy as u16 >= area.height {
                break;
            }
            let spans = highlight::highlight_spans(line, &self.search_term, base, hl);
            render::render_spans_clipped(
                area.x,
                area.y + dy as u16,
                0,
                text_w,
                buf,
                &spans,
                base,
            );
        }

        if self.is_truncatable() && area.width >= 2 {
            let glyph = if self.expanded { "▴" } else { "▾" };
            let at = (area.right() - 1, area.y);
            let style = or_theme(self.options.toggle_style, theme.accent);
            buf.set_string(at.0, at.1, glyph, style);
            self.toggle_at = Some(at);
        }
    }

    fn handle_mouse(&mut self, m: MouseEvent) -> ExpandableAction {
        if m.is_left_press() && self.toggle_at == Some((m.x, m.y)) {
            self.toggle()
        } else {
            ExpandableAction::None
        }
    }

    // The last column is reserved for the toggle glyph.
    fn text_width(&self, width: u16) -> u16 {
        if self.is_truncatable() && width >= 2 {
            width - 1
        } else {
            width
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;
    use crate::input::MouseEventKind;
    use crate::keymap;

    const LONG: &str = "Ordered replacement parts for the north warehouse conveyor line after inspection";

    #[test]
    fn short_values_are_not_truncated() {
        let mut t = ExpandableText::new("Stock");
        assert!(!t.is_truncatable());
        assert_eq!(t.display_text(), "Stock");
        assert_eq!(t.toggle(), ExpandableAction::None);
        assert!(!t.is_expanded());
    }

    #[test]
    fn exactly_max_length_is_not_truncated() {
        let t = ExpandableText::new("x".repeat(50));
        assert!(!t.is_truncatable());
    }

    #[test]
    fn long_values_truncate_with_ellipsis() {
        let t = ExpandableText::new(LONG);
        let shown = t.display_text();
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), 53);
    }

    #[test]
    fn collapsed_is_clamped_to_two_lines() {
        let mut t = ExpandableText::new(LONG);
        assert_eq!(t.height(16), 2);
        t.toggle();
        assert!(t.height(16) > 2);
        assert_eq!(t.display_text(), LONG);
    }

    #[test]
    fn enter_toggles() {
        let mut t = ExpandableText::new(LONG);
        assert_eq!(
            t.handle_event(InputEvent::Key(keymap::key(KeyCode::Enter))),
            ExpandableAction::Toggled(true)
        );
        assert_eq!(
            t.handle_event(InputEvent::Key(keymap::key_char(' '))),
            ExpandableAction::Toggled(false)
        );
    }

    #[test]
    fn clicking_the_glyph_toggles() {
        let mut t = ExpandableText::new(LONG);
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        t.render(area, &mut buf, &Theme::default());
        assert_eq!(buf.cell((19, 0)).unwrap().symbol(), "▾");
        let click = MouseEvent::new(19, 0, MouseEventKind::Down(MouseButton::Left));
        assert_eq!(
            t.handle_event(InputEvent::Mouse(click)),
            ExpandableAction::Toggled(true)
        );
    }

    #[test]
    fn search_term_is_highlighted() {
        let theme = Theme::default();
        let mut t = ExpandableText::new("Received from supplier");
        t.set_search_term("SUPP");
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        t.render(area, &mut buf, &theme);
        let hl = buf.cell((14, 0)).unwrap();
        assert_eq!(hl.symbol(), "s");
        assert_eq!(hl.style().bg, theme.highlight.bg);
        assert_ne!(buf.cell((13, 0)).unwrap().style().bg, theme.highlight.bg);
    }
}
