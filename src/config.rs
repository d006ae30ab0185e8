use anyhow::{Context, Result};
use std::path::PathBuf;

/// Origins allowed to post the contact form cross-origin.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://nestego.com",
    "https://www.nestego.com",
    "https://saren-p.github.io",
];

pub const DEFAULT_TURNSTILE_VERIFY_URL: &str =
    "https://challenges.cloudflare.com/turnstile/v0/siteverify";

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub allowed_origins: Vec<String>,

    // CAPTCHA
    pub turnstile_secret: String,
    pub turnstile_verify_url: String,

    // Mail relay
    pub mail_relay_url: String,
    pub mail_relay_token: Option<String>,
    pub contact_recipient: String,
    pub contact_from: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_else(|_| {
                    DEFAULT_ALLOWED_ORIGINS
                        .iter()
                        .map(|s| s.to_string())
                        .collect()
                }),

            // CAPTCHA
            turnstile_secret: std::env::var("TURNSTILE_SECRET")
                .context("TURNSTILE_SECRET not set")?,
            turnstile_verify_url: std::env::var("TURNSTILE_VERIFY_URL")
                .unwrap_or_else(|_| DEFAULT_TURNSTILE_VERIFY_URL.to_string()),

            // Mail relay
            mail_relay_url: std::env::var("MAIL_RELAY_URL").context("MAIL_RELAY_URL not set")?,
            mail_relay_token: std::env::var("MAIL_RELAY_TOKEN")
                .ok()
                .filter(|v| !v.is_empty()),
            contact_recipient: std::env::var("CONTACT_RECIPIENT")
                .unwrap_or_else(|_| "info@nestego.com".to_string()),
            contact_from: std::env::var("CONTACT_FROM")
                .unwrap_or_else(|_| "Nestego Website <no-reply@nestego.com>".to_string()),
        })
    }

    pub fn is_allowed_origin(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }
}

/// Root of the static site tree the tools operate on (`SITE_ROOT`, default `.`).
pub fn site_root() -> PathBuf {
    std::env::var("SITE_ROOT")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Parse a comma separated origin list, dropping blanks and trailing slashes.
fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
