//! Page chrome: header scroll state and footer copyright.

use chrono::{Datelike, Utc};

/// Scroll offset (px) past which the header switches to its compact style.
pub const HEADER_SCROLL_THRESHOLD: f64 = 50.0;

pub fn header_is_scrolled(scroll_offset: f64) -> bool {
    scroll_offset > HEADER_SCROLL_THRESHOLD
}

/// Footer copyright line. The legal name is the same in both languages.
pub fn copyright_line(year: i32) -> String {
    format!("© {} Les Entreprises Nestego.", year)
}

pub fn current_copyright_line() -> String {
    copyright_line(Utc::now().year())
}
