//! Contact submission error taxonomy
//!
//! Validation failures map to 400 and never reach the provider; delivery and
//! unexpected failures map to 500.

use hyper::StatusCode;
use serde::Serialize;
use thiserror::Error;

use super::mailer::MailError;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("missing required fields")]
    MissingFields,

    #[error("invalid email format")]
    InvalidEmail,

    /// Provider answered with a non-2xx status
    #[error("provider rejected the email ({status}): {}", details.as_deref().unwrap_or("no detail"))]
    Delivery { status: u16, details: Option<String> },

    #[error("{0}")]
    Unexpected(String),
}

/// JSON error body returned to the client
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ContactError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields | Self::InvalidEmail => StatusCode::BAD_REQUEST,
            Self::Delivery { .. } | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::MissingFields | Self::InvalidEmail)
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            Self::MissingFields => ErrorBody {
                error: "Missing required fields",
                details: None,
            },
            Self::InvalidEmail => ErrorBody {
                error: "Invalid email format",
                details: None,
            },
            Self::Delivery { details, .. } => ErrorBody {
                error: "Failed to send email",
                details: details.clone(),
            },
            Self::Unexpected(_) => ErrorBody {
                error: "Internal server error",
                details: None,
            },
        }
    }
}

impl From<MailError> for ContactError {
    fn from(err: MailError) -> Self {
        match err {
            MailError::Rejected { status, message } => Self::Delivery {
                status,
                details: message,
            },
            other => Self::Unexpected(other.to_string()),
        }
    }
}
