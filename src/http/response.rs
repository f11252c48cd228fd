//! HTTP response building module
//!
//! Builders for the status codes the site server emits.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Response type shared by every handler
pub type SiteResponse = Response<Full<Bytes>>;

/// Finish a builder, falling back to an empty 500 if a header was invalid
fn finish(builder: Builder, body: Bytes, label: &str) -> SiteResponse {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        crate::logger::log_error(&format!("Failed to build {label} response: {e}"));
        let mut resp = Response::new(Full::new(Bytes::new()));
        *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        resp
    })
}

fn plain(status: StatusCode, text: &'static str) -> Builder {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", text.len())
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, cache_control: &str) -> SiteResponse {
    let builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", etag)
        .header("Cache-Control", cache_control);
    finish(builder, Bytes::new(), "304")
}

/// Build 404 Not Found response
pub fn build_404_response() -> SiteResponse {
    const TEXT: &str = "404 Not Found";
    finish(plain(StatusCode::NOT_FOUND, TEXT), Bytes::from(TEXT), "404")
}

/// Build 405 Method Not Allowed response listing the allowed methods
pub fn build_405_response(allow: &str) -> SiteResponse {
    const TEXT: &str = "405 Method Not Allowed";
    let builder = plain(StatusCode::METHOD_NOT_ALLOWED, TEXT).header("Allow", allow);
    finish(builder, Bytes::from(TEXT), "405")
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> SiteResponse {
    const TEXT: &str = "413 Payload Too Large";
    finish(
        plain(StatusCode::PAYLOAD_TOO_LARGE, TEXT),
        Bytes::from(TEXT),
        "413",
    )
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(allow: &str, enable_cors: bool) -> SiteResponse {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", allow);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", allow)
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    finish(builder, Bytes::new(), "OPTIONS")
}

/// Build health check response
pub fn build_health_response(status: &'static str) -> SiteResponse {
    let builder = plain(StatusCode::OK, status).header("Cache-Control", "no-cache");
    finish(builder, Bytes::from(status), "health")
}

/// Build a static asset response; HEAD keeps the headers and drops the body
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    cache_control: &str,
    is_head: bool,
) -> SiteResponse {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let builder = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", cache_control);
    finish(builder, body, "200")
}

/// Build JSON response
pub fn build_json_response<T: Serialize>(status: StatusCode, body: &T) -> SiteResponse {
    match serde_json::to_vec(body) {
        Ok(json) => {
            let builder = Response::builder()
                .status(status)
                .header("Content-Type", "application/json")
                .header("Content-Length", json.len());
            finish(builder, Bytes::from(json), status.as_str())
        }
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            let builder = Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json");
            finish(
                builder,
                Bytes::from_static(br#"{"error":"Internal server error"}"#),
                "500",
            )
        }
    }
}
