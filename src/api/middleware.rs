//! Per-request logging context.
//!
//! Every request runs inside a `request` span carrying `request_id`, `method`,
//! `endpoint` and, once the caller is authenticated, `user_id`. Log lines
//! emitted by handlers and services inherit these fields.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{field, Instrument};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Short random id used to correlate log lines of one request
pub fn new_request_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

pub async fn request_context(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = new_request_id();
    let method = request.method().clone();
    let endpoint = request.uri().path().to_string();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        endpoint = %endpoint,
        user_id = field::Empty,
    );

    let mut response = next.run(request).instrument(span.clone()).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    span.in_scope(|| {
        if status >= 500 {
            tracing::error!(status, duration_ms, "Request failed");
        } else if status >= 400 {
            tracing::warn!(status, duration_ms, "Request rejected");
        } else {
            tracing::info!(status, duration_ms, "Request completed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}
