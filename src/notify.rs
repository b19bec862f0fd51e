//! In-process toast notifications.
//!
//! Mutations and session flows push toasts here; the console frontend
//! drains and prints them after each action.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ToastKind::Success => "success",
            ToastKind::Info => "info",
            ToastKind::Warning => "warning",
            ToastKind::Error => "error",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    /// Unique per toast, so a frontend can dismiss or dedup entries.
    pub id: String,
    pub kind: ToastKind,
    pub message: String,
}

/// Shared toast queue. Cheap to clone.
#[derive(Clone, Default)]
pub struct Toasts {
    queue: Arc<Mutex<Vec<Toast>>>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, kind: ToastKind, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(kind = %kind, message = %message, "toast");
        self.queue.lock().push(Toast {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            message,
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    /// Take everything queued since the last drain.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.queue.lock())
    }
}
