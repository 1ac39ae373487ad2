//! Request middlewares used by the storage routes.

use axum::body::{Body, HttpBody, to_bytes};
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::time::Instant;
use tracing::{Level, debug, enabled, trace, warn};

/// Largest request body `log_request` will buffer. Matches axum's default body limit.
pub const MAX_LOGGED_BODY: usize = 2 * 1024 * 1024;

/// Logs the time spent in everything it wraps.
pub async fn trace_time(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    debug!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed = ?started.elapsed(),
        "Request handled"
    );
    response
}

/// Logs method, URI and body at `trace`. The body is buffered and handed on untouched.
///
/// Does nothing unless `trace` is enabled. A body whose size is unknown or above
/// [`MAX_LOGGED_BODY`] is forwarded as a stream without being logged.
pub async fn log_request(request: Request, next: Next) -> Response {
    if !enabled!(Level::TRACE) {
        return next.run(request).await;
    }

    let fits = request
        .body()
        .size_hint()
        .upper()
        .is_some_and(|len| usize::try_from(len).is_ok_and(|len| len <= MAX_LOGGED_BODY));
    if !fits {
        trace!(method = %request.method(), uri = %request.uri(), "Request received, body not logged");
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_LOGGED_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(method = %parts.method, uri = %parts.uri, "Unreadable request body: {e}");
            return StatusCode::BAD_REQUEST.into_response();
        },
    };

    trace!(
        method = %parts.method,
        uri = %parts.uri,
        body = %String::from_utf8_lossy(&bytes),
        "Request received"
    );

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
