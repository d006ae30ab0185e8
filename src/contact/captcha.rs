use crate::config::Config;
use crate::retry::{is_transient, with_retry_if, HttpStatusError, RetryConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Verifies the CAPTCHA token submitted with the contact form.
#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// `Ok(false)` means the provider rejected the token; `Err` means the
    /// provider could not be reached.
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<bool>;
}

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Cloudflare Turnstile siteverify client.
pub struct TurnstileVerifier {
    client: reqwest::Client,
    secret: String,
    verify_url: String,
    retry: RetryConfig,
}

impl TurnstileVerifier {
    pub fn new(secret: impl Into<String>, verify_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            secret: secret.into(),
            verify_url: verify_url.into(),
            retry: RetryConfig::captcha_verify(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.turnstile_secret, &config.turnstile_verify_url)
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn siteverify(&self, token: &str, remote_ip: Option<&str>) -> Result<SiteverifyResponse> {
        let mut params = vec![("secret", self.secret.as_str()), ("response", token)];
        if let Some(ip) = remote_ip {
            params.push(("remoteip", ip));
        }

        let response = self
            .client
            .post(&self.verify_url)
            .form(&params)
            .send()
            .await
            .context("Failed to reach CAPTCHA provider")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpStatusError {
                service: "Turnstile",
                status: status.as_u16(),
                body,
            }
            .into());
        }

        response
            .json::<SiteverifyResponse>()
            .await
            .context("Failed to parse siteverify response")
    }
}

#[async_trait]
impl CaptchaVerifier for TurnstileVerifier {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<bool> {
        let outcome = with_retry_if(
            &self.retry,
            "Turnstile siteverify",
            || self.siteverify(token, remote_ip),
            is_transient,
        )
        .await?;

        if outcome.success {
            debug!("CAPTCHA token accepted");
        } else {
            warn!("CAPTCHA token rejected: {:?}", outcome.error_codes);
        }
        Ok(outcome.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_siteverify_response_parsing() {
        let ok: SiteverifyResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(ok.success);
        assert!(ok.error_codes.is_empty());

        let rejected: SiteverifyResponse = serde_json::from_str(
            r#"{"success":false,"error-codes":["invalid-input-response"],"hostname":""}"#,
        )
        .unwrap();
        assert!(!rejected.success);
        assert_eq!(rejected.error_codes, vec!["invalid-input-response"]);
    }
}
