use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header::CONTENT_LENGTH, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

const MAX_BUFFERED_BODY_BYTES: usize = 64 * 1024;
const MAX_LOGGED_BODY_BYTES: usize = 2048;

/// Logs method, URI (query string included), HTTP version, latency and a body
/// preview for every 4xx/5xx response, then forwards the buffered body unchanged.
pub async fn log_error_responses(req: Request<Body>, next: Next) -> Response {
    let request = RequestLine::of(&req);
    let start = Instant::now();

    let response = next.run(req).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let latency_ms = start.elapsed().as_millis() as u64;
    let (mut parts, body) = response.into_parts();
    match to_bytes(body, MAX_BUFFERED_BODY_BYTES).await {
        Ok(bytes) => {
            let preview = body_preview(&bytes);
            log_event(status, &request, latency_ms, &preview);
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(err) => {
            parts.headers.remove(CONTENT_LENGTH);
            log_event(
                status,
                &request,
                latency_ms,
                &format!("<unreadable body: {err}>"),
            );
            Response::from_parts(parts, Body::empty())
        }
    }
}

fn body_preview(bytes: &Bytes) -> String {
    if bytes.len() > MAX_LOGGED_BODY_BYTES {
        format!(
            "{}... (truncated, {} bytes total)",
            String::from_utf8_lossy(&bytes[..MAX_LOGGED_BODY_BYTES]),
            bytes.len()
        )
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

#[derive(Debug, PartialEq, Eq)]
struct RequestLine {
    method: String,
    uri: String,
    version: String,
}

impl RequestLine {
    fn of<B>(req: &Request<B>) -> Self {
        Self {
            method: req.method().to_string(),
            uri: req.uri().to_string(),
            version: format!("{:?}", req.version()),
        }
    }
}

fn log_event(status: StatusCode, request: &RequestLine, latency_ms: u64, body: &str) {
    let status = status.as_u16();
    let RequestLine {
        method,
        uri,
        version,
    } = request;
    if status >= 500 {
        tracing::error!(
            status,
            method = %method,
            uri = %uri,
            version = %version,
            latency_ms,
            body,
            "Request failed"
        );
    } else {
        tracing::warn!(
            status,
            method = %method,
            uri = %uri,
            version = %version,
            latency_ms,
            body,
            "Request rejected"
        );
    }
}
