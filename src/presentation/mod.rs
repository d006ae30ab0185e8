//! Presentation state for the site's client behavior, kept free of any DOM
//! binding so each piece can be tested on its own.

pub mod layout;
pub mod nav;
pub mod stats;
pub mod theme;
pub mod toggle;

pub use layout::{copyright_line, header_is_scrolled};
pub use nav::{active_links, MobileMenu, NavKind, NavLink};
pub use stats::StatValue;
pub use theme::{initial_theme, toggle_theme, Theme, ThemeToggle};
pub use toggle::{toggle_language, Location};
