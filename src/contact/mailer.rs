use crate::config::Config;
use crate::contact::form::{email_label, ContactForm, SubmissionContext};
use crate::retry::{is_transient, with_retry_if, HttpStatusError, RetryConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// A plain-text message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    pub to: String,
    pub from: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingMail {
    /// Compose the notification for a validated inquiry. Replies go to the
    /// visitor.
    pub fn for_submission(
        form: &ContactForm,
        ctx: &SubmissionContext,
        recipient: &str,
        from: &str,
    ) -> Self {
        let subject = if form.company.is_empty() {
            format!("New website inquiry — {}", form.name)
        } else {
            format!("New website inquiry — {} ({})", form.name, form.company)
        };

        let or_na = |value: &str| {
            if value.is_empty() {
                "N/A".to_string()
            } else {
                value.to_string()
            }
        };

        let body = [
            "New website inquiry".to_string(),
            "-------------------".to_string(),
            format!("Name: {}", form.name),
            format!("Email: {}", form.email),
            format!("Company: {}", or_na(&form.company)),
            format!("Phone: {}", or_na(&form.phone)),
            format!("Company size: {}", or_na(&form.company_size)),
            String::new(),
            "Message:".to_string(),
            form.message.clone(),
            String::new(),
            format!(
                "Timestamp: {}",
                ctx.received_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            format!("Referer: {}", ctx.referer.as_deref().unwrap_or("Unknown")),
            format!("IP: {}", ctx.client_ip.as_deref().unwrap_or("Unknown")),
        ]
        .join("\n");

        Self {
            to: recipient.to_string(),
            from: from.to_string(),
            reply_to: form.email.clone(),
            subject,
            body,
        }
    }
}

/// Outbound mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

/// Delivers mail by POSTing it as JSON to an HTTP relay.
pub struct RelayMailer {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
    retry: RetryConfig,
}

impl RelayMailer {
    pub fn new(url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
            token,
            retry: RetryConfig::mail_relay(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.mail_relay_url, config.mail_relay_token.clone())
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn post(&self, mail: &OutgoingMail) -> Result<()> {
        let mut request = self.client.post(&self.url).json(mail);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("Failed to reach mail relay")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpStatusError {
                service: "Mail relay",
                status: status.as_u16(),
                body,
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl Mailer for RelayMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        debug!(
            "Sending contact mail: to={} subject_len={} body_len={}",
            email_label(&mail.to),
            mail.subject.len(),
            mail.body.len()
        );

        with_retry_if(&self.retry, "Mail relay", || self.post(mail), is_transient).await?;

        info!("Contact mail delivered to {}", email_label(&mail.to));
        Ok(())
    }
}
