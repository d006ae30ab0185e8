//! Contact form payload: parsing, validation and client-side rules.

use crate::contact::ContactError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Fields the browser refuses to submit blank.
pub const CLIENT_REQUIRED_FIELDS: &[&str] = &["name", "email", "challenge"];

const MIN_NAME_CHARS: usize = 2;
const MIN_MESSAGE_CHARS: usize = 10;
const MAX_EMAIL_LEN: usize = 254;
const MAX_EMAIL_LOCAL_LEN: usize = 64;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static CLIENT_EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

/// A submitted inquiry. Every field is trimmed; absent fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub company_size: String,
    pub message: String,
    pub captcha_token: String,
}

/// Request metadata included in the delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionContext {
    pub client_ip: Option<String>,
    pub referer: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl ContactForm {
    /// Build from raw field values. `challenge` is the form's message field;
    /// `message` is accepted when it is absent.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let field = |key: &str| {
            fields
                .get(key)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        let message = fields
            .get("challenge")
            .or_else(|| fields.get("message"))
            .map(|v| v.trim().to_string())
            .unwrap_or_default();

        Self {
            name: field("name"),
            email: field("email"),
            company: field("company"),
            phone: field("phone"),
            company_size: field("companySize"),
            message,
            captcha_token: field("cf-turnstile-response"),
        }
    }

    /// Parse a JSON object body. Scalars are stringified, `null` counts as
    /// absent and nested values are ignored. Returns `None` for anything
    /// other than an object.
    pub fn from_json(body: &[u8]) -> Option<Self> {
        let value: Value = serde_json::from_slice(body).ok()?;
        let object = value.as_object()?;

        let fields = object
            .iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(true) => "1".to_string(),
                    Value::Bool(false) => String::new(),
                    Value::Null | Value::Array(_) | Value::Object(_) => return None,
                };
                Some((key.clone(), text))
            })
            .collect();

        Some(Self::from_fields(&fields))
    }

    /// Parse an `application/x-www-form-urlencoded` body.
    pub fn from_urlencoded(body: &[u8]) -> Self {
        let fields: HashMap<String, String> = url::form_urlencoded::parse(body)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self::from_fields(&fields)
    }

    /// Parse a request body according to its content type. A JSON body that
    /// is not an object yields an empty form, which then fails validation.
    pub fn parse(content_type: &str, body: &[u8]) -> Self {
        if content_type.to_ascii_lowercase().contains("application/json") {
            return Self::from_json(body).unwrap_or_default();
        }
        Self::from_urlencoded(body)
    }

    /// Server-side validation, checked in a fixed order so the visitor
    /// always sees the first problem.
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.chars().count() < MIN_NAME_CHARS {
            return Err(ContactError::NameTooShort);
        }
        if !is_valid_email(&self.email) {
            return Err(ContactError::InvalidEmail);
        }
        if [&self.name, &self.email, &self.company]
            .into_iter()
            .any(|field| has_line_break(field))
        {
            return Err(ContactError::HeaderInjection);
        }
        if self.message.chars().count() < MIN_MESSAGE_CHARS {
            return Err(ContactError::MessageTooShort);
        }
        if self.captcha_token.is_empty() {
            return Err(ContactError::MissingCaptcha);
        }
        Ok(())
    }

    /// Required fields left blank, using the browser's field names.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        CLIENT_REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| match *field {
                "name" => self.name.is_empty(),
                "email" => self.email.is_empty(),
                _ => self.message.is_empty(),
            })
            .collect()
    }
}

fn has_line_break(value: &str) -> bool {
    value.contains(['\r', '\n'])
}

/// Strict address check used by the endpoint.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN {
        return false;
    }
    let Some((local, _)) = email.rsplit_once('@') else {
        return false;
    };
    if local.len() > MAX_EMAIL_LOCAL_LEN
        || local.starts_with('.')
        || local.ends_with('.')
        || local.contains("..")
    {
        return false;
    }

    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
        )
        .unwrap()
    });
    regex.is_match(email)
}

/// The looser pattern the browser applies before submitting.
pub fn is_client_email(email: &str) -> bool {
    let regex = CLIENT_EMAIL_REGEX.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
    regex.is_match(email)
}

/// Log-safe label for an address: domain and length only.
pub fn email_label(email: &str) -> String {
    let domain = email.rsplit_once('@').map(|(_, d)| d).unwrap_or("invalid");
    format!("{} (len={})", domain, email.len())
}
