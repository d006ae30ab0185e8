//! Contact form endpoint: validates an inquiry, checks the CAPTCHA token
//! and relays the message by mail.

pub mod captcha;
mod error;
pub mod form;
pub mod mailer;
pub mod server;

pub use captcha::{CaptchaVerifier, TurnstileVerifier};
pub use error::{ContactError, ContactResponse};
pub use form::{ContactForm, SubmissionContext};
pub use mailer::{Mailer, OutgoingMail, RelayMailer};
pub use server::{router, AppState, CONTACT_PATH};
