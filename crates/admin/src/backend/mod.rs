//! Inventory REST backend client.
//!
//! A thin JSON-over-HTTP client for the backend that owns users, catalog,
//! orders, stock, transfers, alerts, files and reports. Entity decoding
//! (key spellings, envelopes, lenient IDs) is handled by `depot_core::models`;
//! this module only deals with transport and error mapping.
//!
//! # Errors
//!
//! Non-2xx responses are turned into [`BackendError`] with a best-effort
//! human message pulled from the body (see [`extract_error_message`]). No
//! request is retried.

pub mod catalog;
pub mod client;
pub mod files;
pub mod inventory;
pub mod orders;
pub mod reports;
pub mod users;

pub use client::BackendClient;
pub use files::Upload;

use depot_core::OrderId;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Longest raw body excerpt used as an error message.
const MAX_RAW_MESSAGE_CHARS: usize = 300;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport failure (connect, timeout, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A request path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The response body did not match the expected shape.
    #[error("Unexpected response from {path}: {source}")]
    Decode {
        /// Request path.
        path: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The backend rejected the request.
    #[error("{message} (HTTP {status})")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// Missing or rejected bearer token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The addressed resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The order header was created but a line failed.
    #[error("Order {order_id} was created but only {created} of {total} lines were saved: {source}")]
    PartialOrder {
        /// The order that now exists on the backend.
        order_id: OrderId,
        /// Lines saved before the failure.
        created: usize,
        /// Lines requested.
        total: usize,
        /// Failure for the first unsaved line.
        #[source]
        source: Box<BackendError>,
    },
}

impl BackendError {
    /// Map a non-success response to an error.
    pub(crate) fn from_response(status: StatusCode, retry_after: Option<u64>, body: &str) -> Self {
        let message = extract_error_message(status, body);
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited(retry_after.unwrap_or(60)),
            _ => Self::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Message suitable for showing to a dashboard user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::NotFound(message) => message.clone(),
            Self::Unauthorized(message) => {
                format!("The backend rejected our credentials: {message}")
            }
            Self::RateLimited(secs) => {
                format!("The backend is busy; try again in {secs} seconds")
            }
            Self::Http(err) if err.is_timeout() => "The backend did not respond in time".into(),
            Self::Http(_) => "Could not reach the backend".into(),
            Self::Url(_) | Self::Decode { .. } => "The backend sent an unexpected response".into(),
            Self::PartialOrder { .. } => self.to_string(),
        }
    }

    /// Whether the error means the resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Pull a human-readable message out of an error response body.
///
/// Looks, in order, at `message`, `error` (a string or an object with a
/// `message`), `detail`, and the first entry of `errors`. Falls back to the
/// raw body (trimmed and shortened), then to the status reason phrase.
#[must_use]
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body)
        && let Some(message) = message_from_json(&json)
    {
        return message;
    }

    let raw = body.trim();
    if !raw.is_empty() && !raw.starts_with('<') && !raw.starts_with('{') {
        return truncate(raw, MAX_RAW_MESSAGE_CHARS);
    }

    status.canonical_reason().map_or_else(
        || format!("Request failed with status {}", status.as_u16()),
        str::to_owned,
    )
}

fn message_from_json(json: &Value) -> Option<String> {
    let text = |value: Option<&Value>| {
        value
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };

    text(json.get("message"))
        .or_else(|| text(json.get("error")))
        .or_else(|| text(json.get("error").and_then(|e| e.get("message"))))
        .or_else(|| text(json.get("detail")))
        .or_else(|| {
            let first = json.get("errors")?.as_array()?.first()?;
            text(Some(first))
                .or_else(|| text(first.get("message")))
                .or_else(|| text(first.get("msg")))
        })
}

fn truncate(raw: &str, max_chars: usize) -> String {
    if raw.chars().count() <= max_chars {
        return raw.to_owned();
    }
    let mut cut: String = raw.chars().take(max_chars).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(body: &str) -> String {
        extract_error_message(StatusCode::BAD_REQUEST, body)
    }

    #[test]
    fn test_prefers_message_field() {
        assert_eq!(
            message(r#"{"message": "SKU already exists", "error": "conflict"}"#),
            "SKU already exists"
        );
    }

    #[test]
    fn test_error_string_or_object() {
        assert_eq!(message(r#"{"error": "Insufficient stock"}"#), "Insufficient stock");
        assert_eq!(
            message(r#"{"error": {"message": "Warehouse is full", "code": 9}}"#),
            "Warehouse is full"
        );
    }

    #[test]
    fn test_detail_and_errors_list() {
        assert_eq!(message(r#"{"detail": "Order is locked"}"#), "Order is locked");
        assert_eq!(
            message(r#"{"errors": [{"field": "qty", "message": "must be positive"}]}"#),
            "must be positive"
        );
        assert_eq!(message(r#"{"errors": ["name is required"]}"#), "name is required");
    }

    #[test]
    fn test_falls_back_to_text_then_reason() {
        assert_eq!(message("  upstream exploded \n"), "upstream exploded");
        assert_eq!(message(""), "Bad Request");
        assert_eq!(message("<html><body>502</body></html>"), "Bad Request");
        assert_eq!(message(r#"{"status": 400}"#), "Bad Request");
    }

    #[test]
    fn test_long_text_is_truncated() {
        let long = "x".repeat(500);
        let extracted = message(&long);
        assert_eq!(extracted.chars().count(), MAX_RAW_MESSAGE_CHARS + 1);
        assert!(extracted.ends_with('…'));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            BackendError::from_response(StatusCode::UNAUTHORIZED, None, ""),
            BackendError::Unauthorized(_)
        ));
        assert!(BackendError::from_response(StatusCode::NOT_FOUND, None, "").is_not_found());
        assert!(matches!(
            BackendError::from_response(StatusCode::TOO_MANY_REQUESTS, Some(7), ""),
            BackendError::RateLimited(7)
        ));
        let err = BackendError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            None,
            r#"{"message": "Not enough stock"}"#,
        );
        assert_eq!(err.user_message(), "Not enough stock");
        assert_eq!(err.to_string(), "Not enough stock (HTTP 422)");
    }
}
