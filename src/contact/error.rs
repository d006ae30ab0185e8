use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reported to the visitor. The display text is the user-facing
/// message returned in the JSON body.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("Please provide your name.")]
    NameTooShort,

    #[error("Please provide a valid email address.")]
    InvalidEmail,

    /// CR/LF in a value that ends up in a mail header
    #[error("Invalid input detected.")]
    HeaderInjection,

    #[error("Please provide more details in your message.")]
    MessageTooShort,

    #[error("Please complete the security verification.")]
    MissingCaptcha,

    #[error("Security verification failed. Please try again.")]
    CaptchaRejected,

    #[error("Unable to send your message right now. Please try again later.")]
    DeliveryFailed,

    #[error("Method not allowed.")]
    MethodNotAllowed,
}

impl ContactError {
    pub fn status(&self) -> StatusCode {
        match self {
            ContactError::NameTooShort
            | ContactError::InvalidEmail
            | ContactError::HeaderInjection
            | ContactError::MessageTooShort
            | ContactError::MissingCaptcha => StatusCode::BAD_REQUEST,
            ContactError::CaptchaRejected => StatusCode::FORBIDDEN,
            ContactError::DeliveryFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ContactError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

/// JSON body of every contact endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactResponse {
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        (self.status(), Json(ContactResponse::failure(self.to_string()))).into_response()
    }
}
