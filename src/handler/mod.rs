//! Request handler module
//!
//! Routing dispatch plus the two things the site does: serve the static
//! landing page and accept contact form submissions.

pub mod contact;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
