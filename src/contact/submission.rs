//! Contact submission parsing and validation

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ContactError;

/// `local@domain.tld` shape check
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
});

/// Request body reduced to its four keys; `None` means absent or falsy
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A validated submission, ready to be rendered into an email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    /// `None` when the field was absent or empty
    pub company: Option<String>,
    pub message: String,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

impl ContactRequest {
    /// Pick the four keys out of a parsed body.
    ///
    /// A body that is not an object carries none of them. Falsy values
    /// (`null`, `false`, `0`, `""`) count as absent; other scalars are
    /// stringified, so `"company": 5` becomes `"5"`.
    pub fn from_value(body: &Value) -> Self {
        let field = |key: &str| body.as_object().and_then(|map| map.get(key)).and_then(field_text);
        Self {
            name: field("name"),
            email: field("email"),
            company: field("company"),
            message: field("message"),
        }
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Keep a value only if it is present and non-empty
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl ContactSubmission {
    /// Parse a JSON body.
    ///
    /// Only unparseable JSON and a bare `null` are unexpected; any other
    /// shape goes through field validation.
    pub fn from_json(body: &[u8]) -> Result<Self, ContactError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ContactError::Unexpected(format!("invalid request body: {e}")))?;
        if value.is_null() {
            return Err(ContactError::Unexpected("request body is null".to_string()));
        }
        Self::validate(ContactRequest::from_value(&value))
    }

    /// Required fields first, then the email shape
    pub fn validate(request: ContactRequest) -> Result<Self, ContactError> {
        let (Some(name), Some(email), Some(message)) = (
            non_empty(request.name),
            non_empty(request.email),
            non_empty(request.message),
        ) else {
            return Err(ContactError::MissingFields);
        };

        if !is_valid_email(&email) {
            return Err(ContactError::InvalidEmail);
        }

        Ok(Self {
            name,
            email,
            company: non_empty(request.company),
            message,
        })
    }
}
