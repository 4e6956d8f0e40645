//! Toolbar dropdowns: export choices and the column list.

use crate::render;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

/// Which rows an export covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportScope {
    /// Every row that passes search and filters, across all pages.
    All,
    /// Only the rows on the current page.
    Page,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

/// The export menu, in display order.
pub const EXPORT_CHOICES: [(ExportScope, ExportFormat); 4] = [
    (ExportScope::All, ExportFormat::Csv),
    (ExportScope::Page, ExportFormat::Csv),
    (ExportScope::All, ExportFormat::Pdf),
    (ExportScope::Page, ExportFormat::Pdf),
];

pub fn export_label(scope: ExportScope, format: ExportFormat) -> &'static str {
    match (scope, format) {
        (ExportScope::All, ExportFormat::Csv) => "Export All (CSV)",
        (ExportScope::Page, ExportFormat::Csv) => "Export Page (CSV)",
        (ExportScope::All, ExportFormat::Pdf) => "Export All (PDF)",
        (ExportScope::Page, ExportFormat::Pdf) => "Export Page (PDF)",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MenuKind {
    Export,
    Columns,
}

pub(crate) struct MenuEntry {
    pub text: String,
    pub style: Style,
}

/// An open dropdown hanging below the toolbar button that opened it.
#[derive(Clone, Debug)]
pub(crate) struct Menu {
    pub kind: MenuKind,
    pub cursor: usize,
    anchor_x: u16,
    anchor_y: u16,
    area: Rect,
    inner: Rect,
}

impl Menu {
    pub fn new(kind: MenuKind, anchor_x: u16, anchor_y: u16) -> Self {
        Self {
            kind,
            cursor: 0,
            anchor_x,
            anchor_y,
            area: Rect::default(),
            inner: Rect::default(),
        }
    }

    pub fn move_cursor(&mut self, delta: i32, len: usize) -> bool {
        if len == 0 {
            return false;
        }
        let next = (self.cursor as i64 + delta as i64).clamp(0, len as i64 - 1) as usize;
        if next == self.cursor {
            return false;
        }
        self.cursor = next;
        true
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.area.left()
            && x < self.area.right()
            && y >= self.area.top()
            && y < self.area.bottom()
    }

    /// Entry index under `(x, y)` and the column offset inside it.
    pub fn entry_at(&self, x: u16, y: u16) -> Option<(usize, u16)> {
        let inner = self.inner;
        if x < inner.left() || x >= inner.right() || y < inner.top() || y >= inner.bottom() {
            return None;
        }
        Some(((y - inner.y) as usize, x - inner.x))
    }

    pub fn render(
        &mut self,
        screen: Rect,
        buf: &mut Buffer,
        entries: &[MenuEntry],
        border: Style,
        cursor_style: Style,
    ) {
        self.cursor = self.cursor.min(entries.len().saturating_sub(1));
        let text_w = entries
            .iter()
            .map(|e| render::display_width(&e.text))
            .max()
            .unwrap_or(0) as u16;
        let width = (text_w + 2).min(screen.width);
        let room = screen.bottom().saturating_sub(self.anchor_y + 1);
        let height = (entries.len() as u16 + 2).min(room);
        let x = self.anchor_x.min(screen.right().saturating_sub(width)).max(screen.x);
        self.area = Rect::new(x, self.anchor_y + 1, width, height);
        self.inner = Rect::default();
        if width < 3 || height < 3 {
            return;
        }

        render::fill(self.area, buf, " ", Style::reset());
        self.inner = render::draw_box(self.area, buf, border);
        for (i, entry) in entries.iter().enumerate().take(self.inner.height as usize) {
            let y = self.inner.y + i as u16;
            let w = self.inner.width;
            render::render_str_clipped(self.inner.x, y, 0, w, buf, &entry.text, entry.style);
            if i == self.cursor {
                buf.set_style(Rect::new(self.inner.x, y, self.inner.width, 1), cursor_style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(texts: &[&str]) -> Vec<MenuEntry> {
        texts
            .iter()
            .map(|t| MenuEntry {
                text: t.to_string(),
                style: Style::default(),
            })
            .collect()
    }

    #[test]
    fn menu_hangs_below_anchor_and_stays_on_screen() {
        let screen = Rect::new(0, 0, 30, 10);
        let mut buf = Buffer::empty(screen);
        let mut menu = Menu::new(MenuKind::Export, 25, 0);
        let items = entries(&["Export All (CSV)", "Export Page (CSV)"]);
        menu.render(screen, &mut buf, &items, Style::default(), Style::default());
        // 17 columns of text plus the frame, pushed left to fit.
        assert!(menu.contains(11, 1));
        assert!(!menu.contains(10, 1));
        assert!(render::row_text(&buf, screen, 3).contains("│Export Page (CSV)│"));
        assert_eq!(menu.entry_at(12, 3), Some((1, 0)));
        assert_eq!(menu.entry_at(11, 3), None);
    }

    #[test]
    fn cursor_clamps_to_entries() {
        let mut menu = Menu::new(MenuKind::Columns, 0, 0);
        assert!(menu.move_cursor(1, 3));
        assert!(menu.move_cursor(5, 3));
        assert_eq!(menu.cursor, 2);
        assert!(!menu.move_cursor(1, 3));
        assert!(!menu.move_cursor(-1, 0));
    }
}
