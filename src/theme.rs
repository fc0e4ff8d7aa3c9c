use crate::color::Color;
use crate::config::types::Theme;

/// Detected terminal background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Dark,
    Light,
}

impl Background {
    /// Detect whether the terminal has a dark or light background.
    ///
    /// Heuristic: check `COLORFGBG` (format "fg;bg"), fall back to dark.
    pub fn detect() -> Self {
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|v| Self::from_colorfgbg(&v))
            .unwrap_or(Background::Dark)
    }

    fn from_colorfgbg(value: &str) -> Option<Self> {
        let n = value.rsplit(';').next()?.parse::<u8>().ok()?;
        // ANSI colors 0-6 and 8 are dark.
        Some(if n > 6 && n != 8 {
            Background::Light
        } else {
            Background::Dark
        })
    }
}

/// Every colour slot the UI paints with, config overrides applied.
#[derive(Debug, Clone)]
pub struct ResolvedTheme {
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_faint: Color,
    pub text_accent: Color,
    pub text_warning: Color,
    pub text_success: Color,
    pub text_error: Color,
    pub bg_selected: Color,
    pub bg_active: Color,
    pub border_primary: Color,
    pub border_faint: Color,
}

impl ResolvedTheme {
    pub fn resolve(theme: &Theme, bg: Background) -> Self {
        let d = Self::defaults(bg);
        let c = &theme.colors;
        Self {
            text_primary: c.text.primary.unwrap_or(d.text_primary),
            text_secondary: c.text.secondary.unwrap_or(d.text_secondary),
            text_faint: c.text.faint.unwrap_or(d.text_faint),
            text_accent: c.text.accent.unwrap_or(d.text_accent),
            text_warning: c.text.warning.unwrap_or(d.text_warning),
            text_success: c.text.success.unwrap_or(d.text_success),
            text_error: c.text.error.unwrap_or(d.text_error),
            bg_selected: c.background.selected.unwrap_or(d.bg_selected),
            bg_active: c.background.active.unwrap_or(d.bg_active),
            border_primary: c.border.primary.unwrap_or(d.border_primary),
            border_faint: c.border.faint.unwrap_or(d.border_faint),
        }
    }

    fn defaults(bg: Background) -> Self {
        match bg {
            Background::Dark => Self {
                text_primary: Color::Ansi(7),
                text_secondary: Color::Ansi(245),
                text_faint: Color::Ansi(243),
                text_accent: Color::Ansi(6),
                text_warning: Color::Ansi(11),
                text_success: Color::Ansi(10),
                text_error: Color::Ansi(9),
                bg_selected: Color::Ansi(237),
                bg_active: Color::Ansi(24),
                border_primary: Color::Ansi(244),
                border_faint: Color::Ansi(241),
            },
            Background::Light => Self {
                text_primary: Color::Ansi(0),
                text_secondary: Color::Ansi(240),
                text_faint: Color::Ansi(248),
                text_accent: Color::Ansi(4),
                text_warning: Color::Ansi(3),
                text_success: Color::Ansi(2),
                text_error: Color::Ansi(1),
                bg_selected: Color::Ansi(254),
                bg_active: Color::Ansi(153),
                border_primary: Color::Ansi(240),
                border_faint: Color::Ansi(252),
            },
        }
    }
}
