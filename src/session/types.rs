//! Status, notice, and error types for annotation sessions.

use crate::catalog::LoadError;
use crate::draw::SurfaceError;
use crate::export::ExportError;
use thiserror::Error;

/// Whether the session has a drawable form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormStatus {
    /// No form has been activated yet
    #[default]
    NoForm,
    /// Background loaded; surface and history are live
    Ready,
    /// Background failed to load; drawing stays inert until another form loads
    Failed(String),
}

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A short, non-fatal message for the user (shown as a toast by the UI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Errors returned by session operations.
///
/// None of these are fatal: the session state is unchanged and a matching
/// notice has been queued.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no form is active")]
    NoActiveForm,

    #[error("form '{0}' is not available")]
    FormUnavailable(String),

    #[error("failed to load form '{name}': {source}")]
    Load {
        name: String,
        #[source]
        source: LoadError,
    },

    #[error("text is empty")]
    EmptyText,

    #[error("no text position selected")]
    NoTextAnchor,

    #[error("drawing failed: {0}")]
    Surface(#[from] SurfaceError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

impl SessionError {
    /// User-facing text for the notice raised alongside this error.
    pub fn notice_message(&self) -> String {
        match self {
            SessionError::NoActiveForm => "Please select a form first".to_string(),
            SessionError::FormUnavailable(name) | SessionError::Load { name, .. } => {
                format!("Failed to load form: {}", name)
            }
            SessionError::EmptyText => "Please enter some text".to_string(),
            SessionError::NoTextAnchor => "Click on the form to place text first".to_string(),
            SessionError::Surface(_) => "Drawing is unavailable".to_string(),
            SessionError::Export(_) => "Export failed".to_string(),
        }
    }
}
