//! Client-side contact form component
//!
//! Holds the four input fields and the form [`FormStatus`]. A submit posts
//! the fields once, moves to `Success` (clearing the fields) or `Error`, and
//! drops back to `Idle` after [`RESET_DELAY`]. There is no retry and an
//! earlier pending reset is never cancelled by a new submit.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;

use crate::logger;

/// How long `Success`/`Error` stay visible before the form returns to `Idle`
pub const RESET_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Submitting,
    Success,
    Error,
}

impl FormStatus {
    /// Notice shown under the form; every failure kind shares one message
    pub const fn notice(self) -> Option<&'static str> {
        match self {
            Self::Success => Some("Thank you! We'll be in touch soon."),
            Self::Error => Some("Something went wrong. Please try again."),
            Self::Idle | Self::Submitting => None,
        }
    }

    pub const fn button_label(self) -> &'static str {
        match self {
            Self::Submitting => "Sending...",
            _ => "Send Message",
        }
    }
}

/// Local input state, sent as-is (an empty company is sent as `""`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub company: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Company,
    Message,
}

impl Field {
    /// Look up a field by its input `name` attribute
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "company" => Some(Self::Company),
            "message" => Some(Self::Message),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
#[error("contact submission failed to send: {0}")]
pub struct TransportError(pub String);

/// Sends the fields to the submission endpoint and reports the HTTP status
#[async_trait]
pub trait SubmitTransport: Send + Sync {
    async fn post_contact(&self, fields: &FormFields) -> Result<u16, TransportError>;
}

/// Posts JSON to `<base_url><endpoint>`
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}{endpoint}", base_url.trim_end_matches('/')),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SubmitTransport for HttpTransport {
    async fn post_contact(&self, fields: &FormFields) -> Result<u16, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .json(fields)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}

pub struct ContactForm<T> {
    fields: FormFields,
    transport: T,
    status: Arc<watch::Sender<FormStatus>>,
    reset_delay: Duration,
}

impl<T: SubmitTransport> ContactForm<T> {
    pub fn new(transport: T) -> Self {
        let (status, _) = watch::channel(FormStatus::Idle);
        Self {
            fields: FormFields::default(),
            transport,
            status: Arc::new(status),
            reset_delay: RESET_DELAY,
        }
    }

    #[must_use]
    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    pub const fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub fn status(&self) -> FormStatus {
        *self.status.borrow()
    }

    /// Follow status transitions, including the delayed reset
    pub fn subscribe(&self) -> watch::Receiver<FormStatus> {
        self.status.subscribe()
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.fields.name = value,
            Field::Email => self.fields.email = value,
            Field::Company => self.fields.company = value,
            Field::Message => self.fields.message = value,
        }
    }

    /// Update a field by its input `name` attribute; unknown names are ignored
    pub fn set_input(&mut self, name: &str, value: impl Into<String>) -> bool {
        match Field::from_name(name) {
            Some(field) => {
                self.set_field(field, value);
                true
            }
            None => false,
        }
    }

    /// Submit the current fields and return the resulting status.
    ///
    /// Must be called inside a tokio runtime; the reset to `Idle` runs as a
    /// spawned task.
    pub async fn submit(&mut self) -> FormStatus {
        self.status.send_replace(FormStatus::Submitting);

        let outcome = match self.transport.post_contact(&self.fields).await {
            Ok(code) if (200..300).contains(&code) => {
                self.fields = FormFields::default();
                FormStatus::Success
            }
            Ok(code) => {
                logger::log_debug(&format!("Contact endpoint answered {code}"));
                FormStatus::Error
            }
            Err(e) => {
                logger::log_warning(&format!("Error submitting form: {e}"));
                FormStatus::Error
            }
        };

        self.status.send_replace(outcome);
        self.schedule_reset();
        outcome
    }

    fn schedule_reset(&self) {
        let status = Arc::clone(&self.status);
        let delay = self.reset_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            status.send_replace(FormStatus::Idle);
        });
    }
}
