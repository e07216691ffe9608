//! HTTP middleware stack for the dashboard.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with method/uri/status/latency)
//! 3. Session layer (in-memory store, carries toasts only)
//! 4. Security headers

pub mod security_headers;
pub mod session;

pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
