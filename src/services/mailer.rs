use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::{EmailConfig, EmailProvider};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("email request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("email provider rejected message with status {0}")]
    Rejected(u16),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl EmailMessage {
    pub fn welcome(to: &str, app_url: &str) -> Self {
        let dashboard = format!("{}/dashboard", app_url.trim_end_matches('/'));
        Self {
            to: to.to_string(),
            subject: "Welcome to Sharpline - your email is verified".to_string(),
            html: format!(
                "<p>Thanks for confirming your email address.</p>\
                 <p>Your picks, tracker and recommendations are ready at \
                 <a href=\"{0}\">{0}</a>.</p>",
                dashboard
            ),
        }
    }
}

/// Downstream transactional email sender.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Writes messages to the log instead of delivering them.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        tracing::info!(to = %message.to, subject = %message.subject, "email (log only)");
        Ok(())
    }
}

/// Posts messages to an HTTP email API using a bearer API key.
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct OutgoingEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl HttpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            from: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let body = OutgoingEmail {
            from: &self.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
        };

        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(MailError::Rejected(res.status().as_u16()));
        }
        Ok(())
    }
}

pub fn mailer_from_config(config: &EmailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    let mailer: Arc<dyn Mailer> = match config.provider {
        EmailProvider::Log => Arc::new(LogMailer),
        EmailProvider::Http => Arc::new(HttpMailer::new(config)?),
    };
    Ok(mailer)
}
