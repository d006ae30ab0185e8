//! Light/dark theme state.

use serde::{Deserialize, Serialize};

/// Storage key under which the chosen theme is persisted.
pub const THEME_STORAGE_KEY: &str = "theme";

/// Color theme, written to the document's `data-theme` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_name(name: &str) -> Option<Theme> {
        match name.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// Theme to apply on page load.
///
/// A saved choice wins; otherwise a dark color-scheme preference selects
/// `Dark`; otherwise `None` leaves the stylesheet default in place.
pub fn initial_theme(saved: Option<&str>, prefers_dark: bool) -> Option<Theme> {
    match saved.and_then(Theme::from_name) {
        Some(theme) => Some(theme),
        None if prefers_dark => Some(Theme::Dark),
        None => None,
    }
}

/// Result of pressing the theme toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeToggle {
    /// Theme to apply and persist under [`THEME_STORAGE_KEY`]
    pub theme: Theme,
    /// Whether to play the logo pop animation
    pub animate_logo: bool,
}

/// Flip the current theme. Anything other than `Dark` becomes `Dark`.
pub fn toggle_theme(current: Option<Theme>, prefers_reduced_motion: bool) -> ThemeToggle {
    let theme = match current {
        Some(Theme::Dark) => Theme::Light,
        _ => Theme::Dark,
    };

    ThemeToggle {
        theme,
        animate_logo: !prefers_reduced_motion,
    }
}
