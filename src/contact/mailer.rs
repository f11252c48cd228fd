//! Mailer trait and the Resend HTTP implementation

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::template::OutboundEmail;
use crate::config::ContactConfig;

#[derive(Debug, Error)]
pub enum MailError {
    /// Provider answered with a non-2xx status
    #[error("provider responded {status}: {}", message.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, message: Option<String> },

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unreadable provider response: {0}")]
    Response(String),
}

/// Accepted delivery
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Provider message id, when reported
    pub id: Option<String>,
}

/// Async email sending trait.
///
/// One call is one delivery attempt; implementations do not retry.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send(&self, email: &OutboundEmail) -> Result<Delivery, MailError>;
}

/// Resend transactional email API client
pub struct ResendMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ResendMailer {
    /// A missing key is sent as an empty bearer token and rejected by the provider
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, MailError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
            api_key: api_key.unwrap_or_default(),
        })
    }

    pub fn from_config(config: &ContactConfig) -> Result<Self, MailError> {
        Self::new(
            config.provider_url.clone(),
            config.resolve_api_key(),
            config.provider_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Pull a string field out of a provider JSON body
fn string_field(body: &serde_json::Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<Delivery, MailError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let body: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| MailError::Response(format!("status {status}: {e}")))?;

        if !status.is_success() {
            return Err(MailError::Rejected {
                status: status.as_u16(),
                message: string_field(&body, "message"),
            });
        }

        Ok(Delivery {
            id: string_field(&body, "id"),
        })
    }
}
