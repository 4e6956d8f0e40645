//! Low-level buffer helpers shared by the widgets.
//!
//! Everything here writes straight into a [`Buffer`] and clips against a column budget, so
//! widgets never depend on `ratatui`'s layout engine for narrow areas.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;

const TAB_COLS: usize = 4;

/// Renders `input` at `(x, y)`, skipping `start_col` display columns and writing at most
/// `max_cols` columns. Returns the number of columns written.
pub fn render_str_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) -> u16 {
    let span = Span::styled(input.to_string(), style);
    render_spans_clipped(x, y, start_col, max_cols, buf, &[span], style)
}

/// Span-aware variant of [`render_str_clipped`]. Spans with a default style use
/// `fallback_style`. Wide characters that straddle either clip edge are skipped.
pub fn render_spans_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    spans: &[Span<'_>],
    fallback_style: Style,
) -> u16 {
    if max_cols == 0 {
        return 0;
    }

    let mut w = ClipWriter {
        x,
        y,
        start_col: start_col as usize,
        max_cols: max_cols as usize,
        col: 0,
        out_cols: 0,
    };

    for span in spans {
        let style = if span.style == Style::default() {
            fallback_style
        } else {
            span.style
        };
        for ch in span.content.chars() {
            let keep_going = if ch == '\t' {
                (0..TAB_COLS).all(|_| w.put(buf, ' ', 1, style))
            } else {
                let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
                cw == 0 || w.put(buf, ch, cw, style)
            };
            if !keep_going {
                return w.out_cols as u16;
            }
        }
    }
    w.out_cols as u16
}

struct ClipWriter {
    x: u16,
    y: u16,
    start_col: usize,
    max_cols: usize,
    col: usize,
    out_cols: usize,
}

impl ClipWriter {
    /// Returns `false` once the column budget is exhausted.
    fn put(&mut self, buf: &mut Buffer, ch: char, width: usize, style: Style) -> bool {
        if self.col < self.start_col {
            self.col += width;
            return true;
        }
        if self.out_cols + width > self.max_cols {
            return false;
        }

        let mut tmp = [0u8; 4];
        let dx = self.out_cols as u16;
        if let Some(cell) = buf.cell_mut((self.x + dx, self.y)) {
            cell.set_style(style);
            cell.set_symbol(ch.encode_utf8(&mut tmp));
        }
        for extra in 1..width {
            if let Some(cell) = buf.cell_mut((self.x + dx + extra as u16, self.y)) {
                cell.set_style(style);
                cell.set_symbol("");
            }
        }
        self.col += width;
        self.out_cols += width;
        true
    }
}

/// Display width with tabs counted as four columns.
pub fn display_width(s: &str) -> usize {
    s.chars()
        .map(|ch| {
            if ch == '\t' {
                TAB_COLS
            } else {
                UnicodeWidthChar::width(ch).unwrap_or(0)
            }
        })
        .sum()
}

/// Returns the part of `input` that fits in `max_cols` columns after skipping `start_col`.
pub fn slice_by_cols(input: &str, start_col: u32, max_cols: u16) -> String {
    let start_col = start_col as usize;
    let max_cols = max_cols as usize;
    let mut col = 0usize;
    let mut out_cols = 0usize;
    let mut out = String::new();

    for ch in input.chars() {
        let (ch, w, repeat) = if ch == '\t' {
            (' ', TAB_COLS, TAB_COLS)
        } else {
            (ch, UnicodeWidthChar::width(ch).unwrap_or(0), 1)
        };
        if w == 0 {
            continue;
        }
        if col < start_col {
            col += w;
            continue;
        }
        if out_cols + w > max_cols {
            break;
        }
        out.extend(std::iter::repeat_n(ch, repeat));
        col += w;
        out_cols += w;
    }

    out
}

/// Fits `input` into `width` columns, replacing the tail with `…` when it does not fit.
pub fn fit_with_ellipsis(input: &str, width: u16) -> String {
    if display_width(input) <= width as usize {
        return input.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = slice_by_cols(input, 0, width - 1);
    out.push('…');
    out
}

pub fn fill(area: Rect, buf: &mut Buffer, symbol: &str, style: Style) {
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(symbol);
                cell.set_style(style);
            }
        }
    }
}

/// Draws a single-line box around `area` and returns the inner rect.
pub fn draw_box(area: Rect, buf: &mut Buffer, style: Style) -> Rect {
    if area.width < 2 || area.height < 2 {
        return Rect::new(area.x, area.y, 0, 0);
    }
    let right = area.right() - 1;
    let bottom = area.bottom() - 1;
    for x in area.left()..=right {
        let (top, bot) = if x == area.left() {
            ("┌", "└")
        } else if x == right {
            ("┐", "┘")
        } else {
            ("─", "─")
        };
        buf.set_string(x, area.top(), top, style);
        buf.set_string(x, bottom, bot, style);
    }
    for y in area.top() + 1..bottom {
        buf.set_string(area.left(), y, "│", style);
        buf.set_string(right, y, "│", style);
    }
    Rect::new(area.x + 1, area.y + 1, area.width - 2, area.height - 2)
}

/// Returns the visible text of row `y` in `area`, for tests and snapshots.
pub fn row_text(buf: &Buffer, area: Rect, y: u16) -> String {
    (area.left()..area.right())
        .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_by_cols_handles_tabs_and_width() {
        assert_eq!(slice_by_cols("\t1", 0, 4), "    ");
        assert_eq!(slice_by_cols("abcdef", 0, 3), "abc");
        assert_eq!(slice_by_cols("abcdef", 2, 3), "cde");
    }

    #[test]
    fn render_spans_clipped_expands_tabs() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 1));
        let spans = vec![Span::raw("\t1")];
        let written = render_spans_clipped(0, 0, 0, 6, &mut buf, &spans, Style::default());
        assert_eq!(written, 5);
        assert!(row_text(&buf, buf.area, 0).starts_with("    1"));
    }

    #[test]
    fn wide_chars_do_not_overflow_budget() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 1));
        let written = render_str_clipped(0, 0, 0, 3, &mut buf, "你好", Style::default());
        assert_eq!(written, 2);
    }

    #[test]
    fn fit_with_ellipsis_marks_truncation() {
        assert_eq!(fit_with_ellipsis("status", 10), "status");
        assert_eq!(fit_with_ellipsis("description", 5), "desc…");
        assert_eq!(fit_with_ellipsis("x", 0), "");
    }

    #[test]
    fn draw_box_returns_inner_area() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 5, 3));
        let inner = draw_box(buf.area, &mut buf, Style::default());
        assert_eq!(inner, Rect::new(1, 1, 3, 1));
        assert_eq!(row_text(&buf, buf.area, 0), "┌───┐");
    }
}
