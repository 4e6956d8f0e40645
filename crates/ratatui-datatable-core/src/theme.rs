use ratatui::style::Style;

/// Shared styles for every widget in this crate.
///
/// Widget options carry their own `Style` fields; when those are left at `Style::default()` the
/// widget falls back to the matching theme style.
#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    pub danger: Style,
    pub highlight: Style,
    pub badge: Style,
    pub border: Style,
    pub border_active: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().cyan(),
            danger: Style::default().red(),
            highlight: Style::default().black().on_yellow(),
            badge: Style::default().black().on_gray(),
            border: Style::default().dark_gray(),
            border_active: Style::default().cyan(),
        }
    }
}

/// Returns `preferred` unless it is the default style, in which case `fallback` is used.
pub fn or_theme(preferred: Style, fallback: Style) -> Style {
    if preferred == Style::default() {
        fallback
    } else {
        preferred
    }
}
