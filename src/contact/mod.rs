//! Contact form module
//!
//! The submission flow behind `POST /api/contact`: parse and validate the
//! body, render the notification email, hand it to the [`Mailer`] once.
//! [`form`] holds the client-side form component.

mod error;
pub mod form;
mod mailer;
mod submission;
mod template;

pub use error::{ContactError, ErrorBody};
pub use mailer::{Delivery, MailError, Mailer, ResendMailer};
pub use submission::{is_valid_email, ContactRequest, ContactSubmission};
pub use template::{escape_html, render_email, render_html, OutboundEmail, NO_COMPANY};

use serde::Serialize;

use crate::config::ContactConfig;
use crate::logger;

/// Success body returned to the client
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Acknowledgement {
    pub success: bool,
    pub message: &'static str,
}

impl Acknowledgement {
    pub const fn submitted() -> Self {
        Self {
            success: true,
            message: "Form submitted successfully",
        }
    }
}

/// Validate one submission and forward it to the provider.
///
/// Validation errors return before the mailer is touched. Exactly one
/// delivery attempt is made for a valid body.
pub async fn handle_submission(
    body: &[u8],
    mailer: &dyn Mailer,
    config: &ContactConfig,
) -> Result<Acknowledgement, ContactError> {
    let submission = match ContactSubmission::from_json(body) {
        Ok(s) => s,
        Err(e) => {
            if e.is_validation() {
                logger::log_contact_rejected(&e.to_string());
            } else {
                logger::log_contact_failed(&e.to_string());
            }
            return Err(e);
        }
    };

    let email = render_email(&submission, &config.from, &config.to);
    match mailer.send(&email).await {
        Ok(delivery) => {
            logger::log_contact_delivered(
                &submission.name,
                &submission.email,
                delivery.id.as_deref(),
            );
            Ok(Acknowledgement::submitted())
        }
        Err(e) => {
            logger::log_contact_failed(&e.to_string());
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every email and answers with a canned result
    struct RecordingMailer {
        sent: Mutex<Vec<OutboundEmail>>,
        reject_with: Option<(u16, Option<String>)>,
    }

    impl RecordingMailer {
        fn accepting() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                reject_with: None,
            }
        }

        fn rejecting(status: u16, message: Option<&str>) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                reject_with: Some((status, message.map(ToString::to_string))),
            }
        }

        fn sent(&self) -> Vec<OutboundEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutboundEmail) -> Result<Delivery, MailError> {
            self.sent.lock().unwrap().push(email.clone());
            match &self.reject_with {
                Some((status, message)) => Err(MailError::Rejected {
                    status: *status,
                    message: message.clone(),
                }),
                None => Ok(Delivery {
                    id: Some("msg_1".to_string()),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_valid_submission_sends_once() {
        let mailer = RecordingMailer::accepting();
        let body = br#"{"name":"Jane","email":"jane@x.com","company":"Acme","message":"Hi\nthere"}"#;

        let ack = handle_submission(body, &mailer, &ContactConfig::default())
            .await
            .unwrap();
        assert_eq!(ack, Acknowledgement::submitted());

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["dcruz@dcinfrastructures.io"]);
        assert_eq!(sent[0].subject, "New Contact Form Submission from Jane");
        assert!(sent[0].html.contains("Hi<br>there"));
        assert!(sent[0].html.contains("Acme"));
        assert!(!sent[0].html.contains(NO_COMPANY));
    }

    #[tokio::test]
    async fn test_missing_company_uses_fallback() {
        let mailer = RecordingMailer::accepting();
        let body = br#"{"name":"Jane","email":"jane@x.com","message":"Hi"}"#;
        handle_submission(body, &mailer, &ContactConfig::default())
            .await
            .unwrap();
        assert!(mailer.sent()[0].html.contains("<strong>Company:</strong> N/A"));
    }

    #[tokio::test]
    async fn test_validation_errors_skip_mailer() {
        let mailer = RecordingMailer::accepting();
        for body in [
            &br#"{"email":"jane@x.com","message":"Hi"}"#[..],
            &br#"{"name":"Jane","message":"Hi"}"#[..],
            &br#"{"name":"Jane","email":"jane@x.com","message":""}"#[..],
            &br#"{"name":"Jane","email":"bademail","message":"Hi"}"#[..],
            &br#"{"name":"Jane","email":"a@b","message":"Hi"}"#[..],
        ] {
            let err = handle_submission(body, &mailer, &ContactConfig::default())
                .await
                .unwrap_err();
            assert!(err.is_validation());
        }
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_provider_rejection_surfaces_detail() {
        let mailer = RecordingMailer::rejecting(403, Some("The domain is not verified."));
        let body = br#"{"name":"Jane","email":"jane@x.com","message":"Hi"}"#;

        let err = handle_submission(body, &mailer, &ContactConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), hyper::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.body().details.as_deref(),
            Some("The domain is not verified.")
        );
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_custom_sender_and_recipients() {
        let mailer = RecordingMailer::accepting();
        let config = ContactConfig {
            from: "Site <site@example.com>".to_string(),
            to: vec!["a@example.com".to_string(), "b@example.com".to_string()],
            ..ContactConfig::default()
        };
        let body = br#"{"name":"Jane","email":"jane@x.com","message":"Hi"}"#;
        handle_submission(body, &mailer, &config).await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent[0].from, "Site <site@example.com>");
        assert_eq!(sent[0].to.len(), 2);
    }
}
