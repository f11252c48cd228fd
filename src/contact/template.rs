//! Notification email rendering
//!
//! Every user-supplied field is HTML-escaped before it is placed in the
//! template; newlines in the message become `<br>` after escaping.

use serde::Serialize;

use super::submission::ContactSubmission;

/// Resend `POST /emails` request body
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Shown in place of an absent company
pub const NO_COMPANY: &str = "N/A";

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn subject_for(submission: &ContactSubmission) -> String {
    format!("New Contact Form Submission from {}", submission.name)
}

pub fn render_html(submission: &ContactSubmission) -> String {
    let company = submission.company.as_deref().unwrap_or(NO_COMPANY);
    let message = escape_html(&submission.message).replace('\n', "<br>");

    format!(
        "<h2>New Contact Form Submission</h2>\n\
         <p><strong>Name:</strong> {}</p>\n\
         <p><strong>Email:</strong> {}</p>\n\
         <p><strong>Company:</strong> {}</p>\n\
         <p><strong>Message:</strong></p>\n\
         <p>{message}</p>\n",
        escape_html(&submission.name),
        escape_html(&submission.email),
        escape_html(company),
    )
}

/// Build the provider request for one submission
pub fn render_email(submission: &ContactSubmission, from: &str, to: &[String]) -> OutboundEmail {
    OutboundEmail {
        from: from.to_string(),
        to: to.to_vec(),
        subject: subject_for(submission),
        html: render_html(submission),
    }
}
