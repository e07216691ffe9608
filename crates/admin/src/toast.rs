//! One-shot notifications carried in the session.
//!
//! A handler pushes a toast before redirecting; the next rendered page takes
//! (and thereby clears) everything queued.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// Session key holding queued toasts.
const TOASTS_KEY: &str = "toasts";

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
}

/// A queued notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    /// An error toast shown on the page being rendered, not queued.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    /// CSS modifier used by the layout.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.kind {
            ToastKind::Success => "toast-success",
            ToastKind::Error => "toast-error",
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, ToastKind::Error)
    }
}

/// Queue a success toast.
pub async fn push_success(session: &Session, message: impl Into<String>) {
    push(session, ToastKind::Success, message.into()).await;
}

/// Queue an error toast.
pub async fn push_error(session: &Session, message: impl Into<String>) {
    push(session, ToastKind::Error, message.into()).await;
}

async fn push(session: &Session, kind: ToastKind, message: String) {
    let mut toasts = read(session).await;
    toasts.push(Toast { kind, message });
    if let Err(e) = session.insert(TOASTS_KEY, toasts).await {
        tracing::warn!(error = %e, "Failed to queue toast");
    }
}

/// Drain every queued toast.
pub async fn take(session: &Session) -> Vec<Toast> {
    match session.remove::<Vec<Toast>>(TOASTS_KEY).await {
        Ok(toasts) => toasts.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read toasts");
            Vec::new()
        }
    }
}

async fn read(session: &Session) -> Vec<Toast> {
    session
        .get::<Vec<Toast>>(TOASTS_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}
