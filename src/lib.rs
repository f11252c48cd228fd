//! DC Infrastructures landing page server.
//!
//! Serves the static marketing site and the contact form endpoint, which
//! validates a submission and forwards it to the Resend email API.

pub mod config;
pub mod contact;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
