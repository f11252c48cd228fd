//! Contact endpoint handler
//!
//! Reads the JSON body under the configured size limit and maps the
//! submission outcome onto a JSON response.

use crate::config::AppState;
use crate::contact::{self, ContactError};
use crate::http::{self, SiteResponse};
use crate::logger;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, StatusCode};

/// Methods accepted on the contact endpoint
pub const CONTACT_ALLOW: &str = "POST, OPTIONS";

pub async fn handle_contact<B>(req: Request<B>, state: &AppState) -> SiteResponse
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX);

    let body = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!("Contact body exceeded {limit} bytes"));
            return http::build_413_response();
        }
        Err(e) => {
            let err = ContactError::Unexpected(format!("failed to read request body: {e}"));
            logger::log_contact_failed(&err.to_string());
            return http::build_json_response(err.status(), &err.body());
        }
    };

    match contact::handle_submission(&body, state.mailer.as_ref(), &state.config.contact).await {
        Ok(ack) => http::build_json_response(StatusCode::OK, &ack),
        Err(err) => http::build_json_response(err.status(), &err.body()),
    }
}
