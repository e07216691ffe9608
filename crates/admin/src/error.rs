//! Unified error handling for the dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{backend::BackendError, filters, toast::Toast};

/// Full-page error shown inside the dashboard layout.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub status: u16,
    pub title: String,
    pub message: String,
}

/// Application-level error type for dashboard handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// The inventory backend failed or rejected the request.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// HTTP status the error renders with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Backend(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Dashboard request error"
            );
        }

        let message = match &self {
            Self::Backend(err) => err.user_message(),
            Self::NotFound(_) => self.to_string(),
        };

        let page = ErrorTemplate {
            current_path: "",
            toasts: Vec::new(),
            load_errors: Vec::new(),
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
        };
        (status, page).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 12".to_string());
        assert_eq!(err.to_string(), "Not found: order 12");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        let outage = AppError::from(BackendError::Api {
            status: 503,
            message: "down".into(),
        });
        assert_eq!(outage.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_backend_errors_map_to_gateway_or_not_found() {
        let missing = AppError::from(BackendError::NotFound("no such product".into()));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let rejected = AppError::from(BackendError::Api {
            status: 500,
            message: "boom".into(),
        });
        assert_eq!(get_status(rejected), StatusCode::BAD_GATEWAY);
    }
}
