use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

/// A named group of key patterns, used for toolbar buttons and help hints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub keys: Vec<KeyEvent>,
    pub help_key: String,
    pub help_desc: String,
}

impl Binding {
    pub fn new(
        help_key: impl Into<String>,
        help_desc: impl Into<String>,
        keys: Vec<KeyEvent>,
    ) -> Self {
        Self {
            keys,
            help_key: help_key.into(),
            help_desc: help_desc.into(),
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        any_matches(&self.keys, event)
    }
}

pub fn any_matches(patterns: &[KeyEvent], event: &KeyEvent) -> bool {
    patterns.iter().any(|p| key_event_matches(p, event))
}

pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    pattern.code == event.code && modifiers_match(pattern, event)
}

// Shift is implied by upper-case characters on most terminals, so it is only compared for
// non-character keys.
fn modifiers_match(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    let p = pattern.modifiers;
    let e = event.modifiers;
    let shift_ok = matches!(pattern.code, KeyCode::Char(_)) || p.shift == e.shift;
    shift_ok && p.ctrl == e.ctrl && p.alt == e.alt
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code)
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers {
        shift: false,
        ctrl: true,
        alt: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_matches_exact_modifiers() {
        let b = Binding::new("q", "quit", vec![key_char('q')]);
        assert!(b.matches(&key_char('q')));
        assert!(!b.matches(&key_ctrl('q')));
    }

    #[test]
    fn shifted_chars_match_without_explicit_shift() {
        let shifted = key_char('G').with_modifiers(KeyModifiers {
            shift: true,
            ctrl: false,
            alt: false,
        });
        assert!(key_event_matches(&key_char('G'), &shifted));
    }
}
