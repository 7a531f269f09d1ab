//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::Error;

/// The number of bytes of a body to include in the `info` level log line.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// The method, URI and status are logged at the `info` level along with the
/// start of the body. If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes
/// it is truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = match to_bytes(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::debug!("Could not read request body: {error}");
            return Error::InvalidRequestBody(error.to_string()).into_response();
        }
    };

    log_body(
        &format!("Received request: {} {}", parts.method, parts.uri),
        &body,
    );

    let response = next
        .run(Request::from_parts(parts, Body::from(body)))
        .await;

    let (parts, body) = response.into_parts();
    let body = match to_bytes(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_body(&format!("Sending response: {}", parts.status), &body);

    Response::from_parts(parts, Body::from(body))
}

async fn to_bytes(body: Body) -> Result<Bytes, axum::Error> {
    axum::body::to_bytes(body, usize::MAX).await
}

fn log_body(message: &str, body: &[u8]) {
    let text = String::from_utf8_lossy(body);

    if text.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "{message}\nbody: {}...",
            truncate(&text, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full body: {text:?}");
    } else {
        tracing::info!("{message}\nbody: {text:?}");
    }
}

/// The longest prefix of `text` no longer than `limit` bytes that ends on a
/// character boundary.
fn truncate(text: &str, limit: usize) -> &str {
    let end = text
        .char_indices()
        .map(|(index, character)| index + character.len_utf8())
        .take_while(|&end| end <= limit)
        .last()
        .unwrap_or(0);

    &text[..end]
}
