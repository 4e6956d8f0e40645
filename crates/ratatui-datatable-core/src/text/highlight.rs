use ratatui::style::Style;
use ratatui::text::Span;
use std::ops::Range;

/// Byte ranges of case-insensitive, non-overlapping matches of `term` in `text`.
///
/// The term is matched literally; an empty term matches nothing.
pub fn match_ranges(text: &str, term: &str) -> Vec<Range<usize>> {
    if term.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut skip_until = 0usize;
    for (start, _) in text.char_indices() {
        if start < skip_until {
            continue;
        }
        if let Some(end) = match_at(text, start, term) {
            out.push(start..end);
            skip_until = end;
        }
    }
    out
}

fn match_at(text: &str, start: usize, term: &str) -> Option<usize> {
    let mut hay = text[start..].char_indices();
    for t in term.chars() {
        let (_, h) = hay.next()?;
        if !h.to_lowercase().eq(t.to_lowercase()) {
            return None;
        }
    }
    Some(hay.next().map_or(text.len(), |(i, _)| start + i))
}

/// Splits `text` into spans, styling every match of `term` with `highlight`.
pub fn highlight_spans(
    text: &str,
    term: &str,
    base: Style,
    highlight: Style,
) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut at = 0usize;
    for r in match_ranges(text, term) {
        if r.start > at {
            spans.push(Span::styled(text[at..r.start].to_string(), base));
        }
        spans.push(Span::styled(text[r.clone()].to_string(), base.patch(highlight)));
        at = r.end;
    }
    if at < text.len() || spans.is_empty() {
        spans.push(Span::styled(text[at..].to_string(), base));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Stylize;

    #[test]
    fn matches_ignore_case() {
        let text = "Pending review, PENDING payment";
        let ranges = match_ranges(text, "pending");
        let found: Vec<&str> = ranges.iter().map(|r| &text[r.clone()]).collect();
        assert_eq!(found, vec!["Pending", "PENDING"]);
    }

    #[test]
    fn empty_term_matches_nothing() {
        assert!(match_ranges("anything", "").is_empty());
    }

    #[test]
    fn term_is_literal_not_a_pattern() {
        assert_eq!(match_ranges("a.b axb", "a.b"), vec![0..3]);
        assert!(match_ranges("abc", "(").is_empty());
    }

    #[test]
    fn matches_do_not_overlap() {
        assert_eq!(match_ranges("aaaa", "aa"), vec![0..2, 2..4]);
    }

    #[test]
    fn spans_split_around_matches() {
        let hl = Style::default().on_yellow();
        let spans = highlight_spans("Stock and stock", "stock", Style::default(), hl);
        let parts: Vec<(&str, bool)> = spans
            .iter()
            .map(|s| (s.content.as_ref(), s.style == hl))
            .collect();
        assert_eq!(
            parts,
            vec![("Stock", true), (" and ", false), ("stock", true)]
        );
    }
}
