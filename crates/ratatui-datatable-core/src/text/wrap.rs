use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Word-wraps `text` to `width` columns.
///
/// Breaks prefer whitespace and common punctuation; a word longer than the width is split
/// mid-word. Embedded newlines start a new line, tabs become four spaces. A zero width returns
/// the input split on newlines only.
pub fn wrap_words(text: &str, width: u16) -> Vec<String> {
    let text = normalize_tabs(text);
    if width == 0 {
        return text.split('\n').map(str::to_string).collect();
    }

    let max_cols = width as usize;
    let mut out: Vec<String> = Vec::new();

    for raw in text.split('\n') {
        if raw.is_empty() {
            out.push(String::new());
            continue;
        }

        let mut line = String::new();
        let mut line_cols = 0usize;
        let mut last_soft_idx: Option<usize> = None;

        for ch in raw.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if line_cols + w > max_cols {
                if ch.is_whitespace() {
                    out.push(std::mem::take(&mut line).trim_end().to_string());
                    last_soft_idx = None;
                    line_cols = 0;
                    continue;
                }
                if let Some(split) = last_soft_idx.take() {
                    let rest = line.split_off(split);
                    out.push(line.trim_end().to_string());
                    line = rest.trim_start().to_string();
                } else if !line.is_empty() {
                    out.push(std::mem::take(&mut line));
                }
                line_cols = UnicodeWidthStr::width(line.as_str());
            }

            if line.is_empty() && ch.is_whitespace() {
                continue;
            }

            line.push(ch);
            line_cols += w;

            if is_soft_break(ch) {
                last_soft_idx = Some(line.len());
            }
        }

        if !line.is_empty() {
            out.push(line);
        }
    }

    out
}

fn is_soft_break(ch: char) -> bool {
    ch.is_whitespace()
        || matches!(
            ch,
            ',' | ';' | '.' | ':' | ')' | ']' | '}' | '|' | '/' | '?' | '!' | '-' | '_'
        )
}

fn normalize_tabs(s: &str) -> String {
    if s.contains('\t') {
        s.replace('\t', "    ")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_whitespace() {
        assert_eq!(wrap_words("hello world", 5), vec!["hello", "world"]);
        assert_eq!(wrap_words("a b c d", 3), vec!["a b", "c d"]);
    }

    #[test]
    fn splits_long_words() {
        assert_eq!(wrap_words("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn keeps_explicit_newlines() {
        assert_eq!(wrap_words("one\n\ntwo", 10), vec!["one", "", "two"]);
    }

    #[test]
    fn breaks_after_punctuation() {
        assert_eq!(wrap_words("pending-review", 9), vec!["pending-", "review"]);
    }
}
