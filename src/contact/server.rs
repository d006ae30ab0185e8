use crate::config::Config;
use crate::contact::captcha::CaptchaVerifier;
use crate::contact::form::{email_label, ContactForm, SubmissionContext};
use crate::contact::mailer::{Mailer, OutgoingMail};
use crate::contact::{ContactError, ContactResponse};
use axum::body::Bytes;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub const CONTACT_PATH: &str = "/api/contact";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verifier: Arc<dyn CaptchaVerifier>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(
        config: Config,
        verifier: Arc<dyn CaptchaVerifier>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            verifier,
            mailer,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            CONTACT_PATH,
            post(submit_contact)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            response_headers,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Adds `nosniff` to every response and the CORS echo for allow-listed
/// origins.
async fn response_headers(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .filter(|origin| state.config.is_allowed_origin(origin))
        .and_then(|origin| HeaderValue::from_str(origin).ok());

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    if let Some(origin) = origin {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }
    response
}

async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}

async fn method_not_allowed() -> ContactError {
    ContactError::MethodNotAllowed
}

async fn health() -> &'static str {
    "ok"
}

async fn submit_contact(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ContactResponse>, ContactError> {
    let content_type = header_str(&headers, header::CONTENT_TYPE).unwrap_or_default();
    let form = ContactForm::parse(&content_type, &body);

    if let Err(e) = form.validate() {
        info!("Rejected contact submission: {}", e);
        return Err(e);
    }

    let client_ip = connect_info.map(|ConnectInfo(addr)| addr.ip().to_string());

    match state
        .verifier
        .verify(&form.captcha_token, client_ip.as_deref())
        .await
    {
        Ok(true) => {}
        Ok(false) => return Err(ContactError::CaptchaRejected),
        Err(e) => {
            warn!("CAPTCHA verification failed: {:#}", e);
            return Err(ContactError::CaptchaRejected);
        }
    }

    let ctx = SubmissionContext {
        client_ip,
        referer: header_str(&headers, header::REFERER),
        received_at: Utc::now(),
    };
    let mail = OutgoingMail::for_submission(
        &form,
        &ctx,
        &state.config.contact_recipient,
        &state.config.contact_from,
    );

    if let Err(e) = state.mailer.send(&mail).await {
        error!(
            "Failed to deliver inquiry from {}: {:#}",
            email_label(&form.email),
            e
        );
        return Err(ContactError::DeliveryFailed);
    }

    info!("Accepted inquiry from {}", email_label(&form.email));
    Ok(Json(ContactResponse::success()))
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TURNSTILE_VERIFY_URL;
    use anyhow::Result;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http;
    use std::sync::Mutex;
    use tower::ServiceExt;

    struct FakeVerifier {
        outcome: Option<bool>,
    }

    #[async_trait]
    impl CaptchaVerifier for FakeVerifier {
        async fn verify(&self, _token: &str, _remote_ip: Option<&str>) -> Result<bool> {
            self.outcome
                .ok_or_else(|| anyhow::anyhow!("siteverify unreachable"))
        }
    }

    #[derive(Default)]
    struct FakeMailer {
        fail: bool,
        sent: Mutex<Vec<OutgoingMail>>,
    }

    #[async_trait]
    impl Mailer for FakeMailer {
        async fn send(&self, mail: &OutgoingMail) -> Result<()> {
            if self.fail {
                anyhow::bail!("relay down");
            }
            self.sent.lock().unwrap().push(mail.clone());
            Ok(())
        }
    }

    fn test_config() -> Config {
        Config {
            port: 0,
            allowed_origins: vec!["https://nestego.com".to_string()],
            turnstile_secret: "secret".to_string(),
            turnstile_verify_url: DEFAULT_TURNSTILE_VERIFY_URL.to_string(),
            mail_relay_url: "http://relay.invalid".to_string(),
            mail_relay_token: None,
            contact_recipient: "info@nestego.com".to_string(),
            contact_from: "Nestego Website <no-reply@nestego.com>".to_string(),
        }
    }

    fn app(outcome: Option<bool>, mailer: Arc<FakeMailer>) -> Router {
        router(AppState::new(
            test_config(),
            Arc::new(FakeVerifier { outcome }),
            mailer,
        ))
    }

    fn post_json(body: &str) -> Request {
        http::Request::builder()
            .method("POST")
            .uri(CONTACT_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ORIGIN, "https://nestego.com")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> ContactResponse {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const VALID: &str = r#"{"name":"Marie","email":"marie@example.ca","challenge":"We need a new website.","cf-turnstile-response":"tok"}"#;

    // ==================== Method Tests ====================

    #[tokio::test]
    async fn test_preflight() {
        let request = http::Request::builder()
            .method("OPTIONS")
            .uri(CONTACT_PATH)
            .header(header::ORIGIN, "https://nestego.com")
            .body(Body::empty())
            .unwrap();

        let response = app(Some(true), Arc::default()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://nestego.com");
        assert_eq!(headers[header::VARY], "Origin");
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }

    #[tokio::test]
    async fn test_get_is_not_allowed() {
        let request = http::Request::builder()
            .method("GET")
            .uri(CONTACT_PATH)
            .body(Body::empty())
            .unwrap();

        let response = app(Some(true), Arc::default()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        let body = json_body(response).await;
        assert_eq!(body, ContactResponse::failure("Method not allowed."));
    }

    #[tokio::test]
    async fn test_unknown_origin_gets_no_cors_headers() {
        let mut request = post_json(VALID);
        request
            .headers_mut()
            .insert(header::ORIGIN, HeaderValue::from_static("https://evil.example"));

        let response = app(Some(true), Arc::default()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
        assert!(response.headers().get(header::VARY).is_none());
    }

    // ==================== Submission Tests ====================

    #[tokio::test]
    async fn test_successful_submission_sends_mail() {
        let mailer = Arc::new(FakeMailer::default());
        let mut request = post_json(VALID);
        request.headers_mut().insert(
            header::REFERER,
            HeaderValue::from_static("https://nestego.com/contact/"),
        );

        let response = app(Some(true), Arc::clone(&mailer))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, ContactResponse::success());

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "New website inquiry — Marie");
        assert_eq!(sent[0].reply_to, "marie@example.ca");
        assert!(sent[0].body.contains("Referer: https://nestego.com/contact/"));
        assert!(sent[0].body.contains("IP: Unknown"));
    }

    #[tokio::test]
    async fn test_form_encoded_submission() {
        let mailer = Arc::new(FakeMailer::default());
        let request = http::Request::builder()
            .method("POST")
            .uri(CONTACT_PATH)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                "name=Jean&email=jean%40example.com&company=Roy+%26+Fils&message=Please+call+me+back&cf-turnstile-response=t",
            ))
            .unwrap();

        let response = app(Some(true), Arc::clone(&mailer))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent[0].subject, "New website inquiry — Jean (Roy & Fils)");
    }

    #[tokio::test]
    async fn test_validation_error_is_400() {
        let mailer = Arc::new(FakeMailer::default());
        let response = app(Some(true), Arc::clone(&mailer))
            .oneshot(post_json(r#"{"name":"Marie","email":"nope"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            ContactResponse::failure("Please provide a valid email address.")
        );
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_captcha_is_403() {
        let response = app(Some(false), Arc::default())
            .oneshot(post_json(VALID))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unreachable_verifier_is_403() {
        let mailer = Arc::new(FakeMailer::default());
        let response = app(None, Arc::clone(&mailer))
            .oneshot(post_json(VALID))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            json_body(response).await,
            ContactResponse::failure("Security verification failed. Please try again.")
        );
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mail_failure_is_500() {
        let mailer = Arc::new(FakeMailer {
            fail: true,
            ..Default::default()
        });
        let response = app(Some(true), mailer)
            .oneshot(post_json(VALID))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health() {
        let request = http::Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app(Some(true), Arc::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
