//! Count-up animation values for credential stats ("10+", "150+", "99.9%").

use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

/// Length of the count-up animation.
pub const COUNT_UP_DURATION: Duration = Duration::from_millis(2000);

static STAT_REGEX: OnceLock<Regex> = OnceLock::new();

/// A stat that can be animated from zero to its target.
#[derive(Debug, Clone, PartialEq)]
pub struct StatValue {
    target: f64,
    suffix: String,
}

impl StatValue {
    /// Parse a stat label. Labels that are not a number followed by an
    /// optional `+` and/or `%` are not animated.
    pub fn parse(text: &str) -> Option<StatValue> {
        let regex = STAT_REGEX.get_or_init(|| Regex::new(r"^([\d.]+)(\+?%?)$").unwrap());
        let captures = regex.captures(text)?;

        let target: f64 = captures.get(1)?.as_str().parse().ok()?;
        let suffix = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

        Some(StatValue {
            target,
            suffix: suffix.to_string(),
        })
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Fractional targets are shown with one decimal place.
    pub fn is_decimal(&self) -> bool {
        self.target.fract() != 0.0
    }

    /// Text to display `elapsed` into the animation (ease-out cubic).
    pub fn frame(&self, elapsed: Duration) -> String {
        let progress = (elapsed.as_secs_f64() / COUNT_UP_DURATION.as_secs_f64()).min(1.0);
        if progress >= 1.0 {
            return self.final_text();
        }

        let eased = 1.0 - (1.0 - progress).powi(3);
        let value = self.target * eased;

        if self.is_decimal() {
            format!("{:.1}{}", value, self.suffix)
        } else {
            format!("{}{}", value.round(), self.suffix)
        }
    }

    /// Exact final text, also shown immediately when motion is reduced.
    pub fn final_text(&self) -> String {
        if self.is_decimal() {
            format!("{:.1}{}", self.target, self.suffix)
        } else {
            format!("{}{}", self.target, self.suffix)
        }
    }
}
