//! Annotation sessions: the engine's outward-facing interface.
//!
//! An [`AnnotationSession`] owns the active form's background and annotation
//! layer, the tool configuration, the stroke renderer, and the undo history.
//! Mouse and touch handlers feed the same renderer; exports flatten the two
//! layers on demand without touching drawing state. User-visible outcomes are
//! queued as [`Notice`]s and drained with [`AnnotationSession::take_notices`].

mod core;
mod export;
mod options;
mod pointer;
mod types;

pub use core::AnnotationSession;
pub use options::{MAX_WIDTH, MIN_WIDTH, SessionOptions, options_from_config};
pub use types::{FormStatus, Notice, NoticeLevel, SessionError};

#[cfg(test)]
mod tests;
