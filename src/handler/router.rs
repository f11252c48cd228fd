//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: size check, health probes,
//! contact endpoint, then the static site. Also writes the access log line.

use crate::config::AppState;
use crate::handler::contact::{handle_contact, CONTACT_ALLOW};
use crate::handler::static_files::{self, RequestContext};
use crate::http::{self, SiteResponse};
use crate::logger::{self, AccessLogEntry};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, IF_NONE_MATCH, SERVER};
use hyper::{HeaderMap, Method, Request};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Methods accepted on static site paths
pub const SITE_ALLOW: &str = "GET, HEAD, OPTIONS";

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer: SocketAddr,
) -> Result<SiteResponse, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let access_log = state.cached_access_log.load(Ordering::Relaxed);
    let entry = access_log.then(|| {
        AccessLogEntry::from_request(&peer, req.method(), req.uri(), req.version(), req.headers())
    });

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let mut response = route_request(req, &state).await;

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<SiteResponse> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Route request based on path and method
async fn route_request<B>(req: Request<B>, state: &AppState) -> SiteResponse
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let config = &state.config;
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    if let Some(resp) = check_body_size(req.headers(), config.http.max_body_size) {
        return resp;
    }

    // 0. Health check endpoints (highest priority, always fast)
    let health = &config.site.health;
    if health.enabled
        && (path == health.liveness_path || path == health.readiness_path)
        && matches!(method, Method::GET | Method::HEAD)
    {
        return http::build_health_response("ok");
    }

    // 1. Contact endpoint
    if path == config.contact.endpoint {
        return match method {
            Method::POST => handle_contact(req, state).await,
            Method::OPTIONS => http::build_options_response(CONTACT_ALLOW, config.http.enable_cors),
            _ => {
                logger::log_warning(&format!("Method not allowed on {path}: {method}"));
                http::build_405_response(CONTACT_ALLOW)
            }
        };
    }

    // 2. Static site
    match method {
        Method::GET | Method::HEAD => {}
        Method::OPTIONS => {
            return http::build_options_response(SITE_ALLOW, config.http.enable_cors);
        }
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            return http::build_405_response(SITE_ALLOW);
        }
    }

    let if_none_match = req
        .headers()
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok());
    let ctx = RequestContext {
        path: &path,
        is_head: method == Method::HEAD,
        if_none_match,
    };

    static_files::serve_site(&ctx, &config.site).await
}
