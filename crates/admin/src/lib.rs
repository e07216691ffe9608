//! Depot Admin library.
//!
//! The server-rendered inventory dashboard, exposed as a library so the
//! router can be driven from tests without binding a socket.
//!
//! # Security
//!
//! The dashboard holds the backend bearer token and can change stock,
//! orders and users. Deploy it behind the network boundary that protects
//! the backend; it has no login of its own.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod toast;

use axum::Router;
use tower_http::services::ServeDir;

use middleware::{create_session_layer, security_headers_middleware};
use state::AppState;

/// Directory holding `admin.css`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the dashboard application: routes, static files, sessions and
/// security headers, with state applied.
///
/// Tracing and Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(session_layer)
        .with_state(state)
}
