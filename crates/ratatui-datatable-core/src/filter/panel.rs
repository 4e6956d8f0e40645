use crate::config::ColumnConfig;
use crate::filter::ColumnFilters;
use crate::filter::FilterKind;
use crate::filter::FilterValue;
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::keymap;
use crate::render;
use crate::theme::Theme;
use crate::theme::or_theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterPanelAction {
    None,
    Redraw,
    FiltersChanged,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterField {
    pub key: String,
    pub header: String,
    pub kind: FilterKind,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum DatePart {
    #[default]
    From,
    To,
}

#[derive(Clone, Debug)]
pub struct FilterPanelOptions {
    pub title: String,
    pub subtitle: String,
    pub reset_all: Vec<KeyEvent>,
    pub style: Style,
    pub label_style: Style,
    pub focus_style: Style,
}

impl Default for FilterPanelOptions {
    fn default() -> Self {
        Self {
            title: "Filters".to_string(),
            subtitle: "Filter your data by specific criteria".to_string(),
            reset_all: vec![keymap::key_ctrl('r')],
            style: Style::default(),
            label_style: Style::default().add_modifier(Modifier::BOLD),
            focus_style: Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}

const HEADER_ROWS: u16 = 3;
const FIELD_ROWS: u16 = 3;

/// Editable list of column filters.
///
/// One entry per filterable column: a label (with a `Filtered` badge when active) and an editor
/// chosen from the column's [`FilterKind`]. Up/Down move between fields; text and date fields
/// take typed characters, select fields cycle with Left/Right, Esc clears the focused field and
/// the reset binding (`Ctrl+R`, or `r` outside text fields) clears all of them.
#[derive(Clone, Debug, Default)]
pub struct FilterPanel {
    pub filters: ColumnFilters,
    fields: Vec<FilterField>,
    focus: usize,
    date_part: DatePart,
    scroll: usize,
    options: FilterPanelOptions,
}

impl FilterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FilterPanelOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Rebuilds the field list from the filterable columns. Filters on columns that are gone
    /// are dropped.
    pub fn set_columns(&mut self, columns: &[ColumnConfig]) {
        self.fields = columns
            .iter()
            .filter(|c| c.filterable)
            .map(|c| FilterField {
                key: c.accessor_key.clone(),
                header: c.header.clone(),
                kind: FilterKind::for_column(c),
            })
            .collect();
        let stale: Vec<String> = self
            .filters
            .iter()
            .map(|(k, _)| k.to_string())
            .filter(|k| !self.fields.iter().any(|f| &f.key == k))
            .collect();
        for key in stale {
            self.filters.clear(&key);
        }
        self.focus = self.focus.min(self.fields.len().saturating_sub(1));
        self.date_part = DatePart::From;
    }

    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    pub fn focused(&self) -> Option<&FilterField> {
        self.fields.get(self.focus)
    }

    pub fn active_count(&self) -> usize {
        self.filters.active_count()
    }

    pub fn reset_all(&mut self) -> FilterPanelAction {
        if self.filters.reset_all() {
            FilterPanelAction::FiltersChanged
        } else {
            FilterPanelAction::None
        }
    }

    pub fn handle_event(&mut self, event: InputEvent) -> FilterPanelAction {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Paste(text) => self.edit(|s| s.push_str(&text)),
            InputEvent::Mouse(_) => FilterPanelAction::None,
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let base = or_theme(self.options.style, theme.text_primary);
        let label = base.patch(self.options.label_style);
        let focus = self.options.focus_style.patch(theme.accent);

        let active = self.active_count();
        let mut head = vec![Span::styled(self.options.title.clone(), label)];
        if active > 0 {
            head.push(Span::styled(format!("  {active} active"), theme.accent));
            head.push(Span::styled("  ^R reset all".to_string(), theme.text_muted));
        }
        render::render_spans_clipped(area.x, area.y, 0, area.width, buf, &head, base);
        if area.height > 1 {
            render::render_str_clipped(
                area.x,
                area.y + 1,
                0,
                area.width,
                buf,
                &self.options.subtitle,
                theme.text_muted,
            );
        }

        let body_h = area.height.saturating_sub(HEADER_ROWS);
        let visible = (body_h / FIELD_ROWS).max(1) as usize;
        if self.focus < self.scroll {
            self.scroll = self.focus;
        } else if self.focus >= self.scroll + visible {
            self.scroll = self.focus + 1 - visible;
        }

        let mut y = area.y + HEADER_ROWS;
        for (i, field) in self.fields.iter().enumerate().skip(self.scroll) {
            if y + 1 >= area.bottom() {
                break;
            }
            let is_active = self.filters.is_active(&field.key);
            let mut spans = vec![Span::styled(field.header.clone(), label)];
            if is_active {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(" Filtered ".to_string(), theme.badge));
            }
            render::render_spans_clipped(area.x, y, 0, area.width, buf, &spans, base);

            let is_focused = i == self.focus;
            let marker = if is_focused { "› " } else { "  " };
            let editor = self.editor_spans(field, is_focused, base, focus, theme);
            let mut line = vec![Span::styled(marker.to_string(), theme.accent)];
            line.extend(editor);
            render::render_spans_clipped(area.x, y + 1, 0, area.width, buf, &line, base);
            y += FIELD_ROWS;
        }
    }

    fn editor_spans(
        &self,
        field: &FilterField,
        is_focused: bool,
        base: Style,
        focus: Style,
        theme: &Theme,
    ) -> Vec<Span<'static>> {
        let value = self
            .filters
            .get(&field.key)
            .cloned()
            .unwrap_or_else(|| FilterValue::empty_for(&field.kind));
        let style_for = |part_focused: bool| if part_focused { focus } else { base };

        match value {
            FilterValue::Text(s) if s.is_empty() => vec![Span::styled(
                format!("Search {}...", field.header.to_lowercase()),
                if is_focused { focus } else { theme.text_muted },
            )],
            FilterValue::Text(s) => vec![Span::styled(s, style_for(is_focused))],
            FilterValue::Choice(s) => {
                let shown = if s.is_empty() { "All".to_string() } else { s };
                vec![Span::styled(format!("‹ {shown} ›"), style_for(is_focused))]
            }
            FilterValue::DateRange { from, to } => {
                let show = |s: String| if s.is_empty() { "YYYY-MM-DD".to_string() } else { s };
                vec![
                    Span::styled("from ".to_string(), theme.text_muted),
                    Span::styled(
                        show(from),
                        style_for(is_focused && self.date_part == DatePart::From),
                    ),
                    Span::styled("  to ".to_string(), theme.text_muted),
                    Span::styled(
                        show(to),
                        style_for(is_focused && self.date_part == DatePart::To),
                    ),
                ]
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> FilterPanelAction {
        if keymap::any_matches(&self.options.reset_all, &key) {
            return self.reset_all();
        }
        let Some(field) = self.fields.get(self.focus).cloned() else {
            return FilterPanelAction::None;
        };

        match key.code {
            KeyCode::Up => self.move_focus(-1),
            KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab => {
                if field.kind == FilterKind::DateRange && self.date_part == DatePart::To {
                    self.date_part = DatePart::From;
                    FilterPanelAction::Redraw
                } else {
                    self.move_focus(-1)
                }
            }
            KeyCode::Tab => {
                if field.kind == FilterKind::DateRange && self.date_part == DatePart::From {
                    self.date_part = DatePart::To;
                    FilterPanelAction::Redraw
                } else {
                    self.move_focus(1)
                }
            }
            KeyCode::Esc => {
                if self.filters.clear(&field.key) {
                    FilterPanelAction::FiltersChanged
                } else {
                    FilterPanelAction::None
                }
            }
            KeyCode::Backspace => self.edit(|s| {
                s.pop();
            }),
            KeyCode::Left | KeyCode::Right => match &field.kind {
                FilterKind::Select { options } => {
                    self.cycle_choice(&field.key, options, key.code == KeyCode::Right)
                }
                _ => FilterPanelAction::None,
            },
            KeyCode::Char(c) if key.plain_char().is_some() => match field.kind {
                FilterKind::Text => self.edit(|s| s.push(c)),
                FilterKind::DateRange if c.is_ascii_digit() || c == '-' => {
                    self.edit(|s| s.push(c))
                }
                _ if c == 'r' => self.reset_all(),
                _ => FilterPanelAction::None,
            },
            _ => FilterPanelAction::None,
        }
    }

    fn move_focus(&mut self, delta: i32) -> FilterPanelAction {
        if self.fields.is_empty() {
            return FilterPanelAction::None;
        }
        let next = (self.focus as i64 + delta as i64).clamp(0, self.fields.len() as i64 - 1);
        let next = next as usize;
        if next == self.focus {
            return FilterPanelAction::None;
        }
        self.focus = next;
        self.date_part = if delta < 0 {
            DatePart::To
        } else {
            DatePart::From
        };
        FilterPanelAction::Redraw
    }

    /// Applies `f` to the focused text or date part.
    fn edit(&mut self, f: impl FnOnce(&mut String)) -> FilterPanelAction {
        let Some(field) = self.fields.get(self.focus) else {
            return FilterPanelAction::None;
        };
        let mut value = self
            .filters
            .get(&field.key)
            .cloned()
            .unwrap_or_else(|| FilterValue::empty_for(&field.kind));
        match &mut value {
            FilterValue::Text(s) => f(s),
            FilterValue::DateRange { from, to } => match self.date_part {
                DatePart::From => f(from),
                DatePart::To => f(to),
            },
            FilterValue::Choice(_) => return FilterPanelAction::None,
        }
        let key = field.key.clone();
        if self.filters.set(key, value) {
            FilterPanelAction::FiltersChanged
        } else {
            FilterPanelAction::Redraw
        }
    }

    fn cycle_choice(&mut self, key: &str, options: &[String], forward: bool) -> FilterPanelAction {
        // Slot 0 is "All", i.e. no filter.
        let slots = options.len() + 1;
        let current = match self.filters.get(key) {
            Some(FilterValue::Choice(s)) => options.iter().position(|o| o == s).map_or(0, |i| i + 1),
            _ => 0,
        };
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        let value = if next == 0 {
            FilterValue::Choice(String::new())
        } else {
            FilterValue::Choice(options[next - 1].clone())
        };
        if self.filters.set(key, value) {
            FilterPanelAction::FiltersChanged
        } else {
            FilterPanelAction::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnType;

    fn columns() -> Vec<ColumnConfig> {
        vec![
            ColumnConfig::new("name", "Name"),
            ColumnConfig::new("status", "Status")
                .with_type(ColumnType::Category)
                .with_options(vec!["Received".into(), "Pending".into(), "Rejected".into()]),
            ColumnConfig::new("created", "Created").with_type(ColumnType::Date),
            ColumnConfig {
                filterable: false,
                ..ColumnConfig::new("id", "Id")
            },
        ]
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code))
    }

    fn typed(panel: &mut FilterPanel, s: &str) {
        for c in s.chars() {
            panel.handle_event(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn only_filterable_columns_get_fields() {
        let mut p = FilterPanel::new();
        p.set_columns(&columns());
        let keys: Vec<&str> = p.fields().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "status", "created"]);
    }

    #[test]
    fn typing_edits_text_filter() {
        let mut p = FilterPanel::new();
        p.set_columns(&columns());
        typed(&mut p, "al");
        assert_eq!(p.filters.get("name"), Some(&FilterValue::Text("al".into())));
        p.handle_event(key(KeyCode::Backspace));
        p.handle_event(key(KeyCode::Backspace));
        assert_eq!(p.active_count(), 0);
    }

    #[test]
    fn select_cycles_through_all_and_options() {
        let mut p = FilterPanel::new();
        p.set_columns(&columns());
        p.handle_event(key(KeyCode::Down));
        assert_eq!(
            p.handle_event(key(KeyCode::Right)),
            FilterPanelAction::FiltersChanged
        );
        assert_eq!(
            p.filters.get("status"),
            Some(&FilterValue::Choice("Received".into()))
        );
        p.handle_event(key(KeyCode::Left));
        assert!(!p.filters.is_active("status"));
        p.handle_event(key(KeyCode::Left));
        assert_eq!(
            p.filters.get("status"),
            Some(&FilterValue::Choice("Rejected".into()))
        );
    }

    #[test]
    fn tab_moves_between_date_bounds() {
        let mut p = FilterPanel::new();
        p.set_columns(&columns());
        p.handle_event(key(KeyCode::Down));
        p.handle_event(key(KeyCode::Down));
        typed(&mut p, "2024-01-01x");
        p.handle_event(key(KeyCode::Tab));
        typed(&mut p, "2024-12-31");
        assert_eq!(
            p.filters.get("created"),
            Some(&FilterValue::DateRange {
                from: "2024-01-01".into(),
                to: "2024-12-31".into()
            })
        );
    }

    #[test]
    fn reset_all_clears_everything() {
        let mut p = FilterPanel::new();
        p.set_columns(&columns());
        typed(&mut p, "x");
        p.handle_event(key(KeyCode::Down));
        p.handle_event(key(KeyCode::Right));
        assert_eq!(p.active_count(), 2);
        assert_eq!(
            p.handle_event(key(KeyCode::Char('r'))),
            FilterPanelAction::FiltersChanged
        );
        assert_eq!(p.active_count(), 0);
        assert_eq!(
            p.handle_event(InputEvent::Key(keymap::key_ctrl('r'))),
            FilterPanelAction::None
        );
    }

    #[test]
    fn render_shows_badge_and_placeholders() {
        let mut p = FilterPanel::new();
        p.set_columns(&columns());
        typed(&mut p, "bo");
        let area = Rect::new(0, 0, 50, 12);
        let mut buf = Buffer::empty(area);
        p.render(area, &mut buf, &Theme::default());
        assert!(render::row_text(&buf, area, 0).starts_with("Filters  1 active"));
        assert!(render::row_text(&buf, area, 3).contains("Filtered"));
        assert!(render::row_text(&buf, area, 4).starts_with("› bo"));
        assert!(render::row_text(&buf, area, 7).contains("‹ All ›"));
        assert!(render::row_text(&buf, area, 10).contains("from YYYY-MM-DD  to YYYY-MM-DD"));
    }
}
