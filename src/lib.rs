//! Library exports for the formink annotation engine.
//!
//! Exposes the drawing core (surface, stroke renderer, history), the
//! session interface that input handlers drive, the export encoders, and the
//! configuration types so the CLI and other front ends share one
//! implementation.

pub mod catalog;
pub mod config;
pub mod draw;
pub mod export;
pub mod history;
pub mod input;
pub mod script;
pub mod session;
pub mod util;

pub use catalog::{BackgroundSource, FileBackgroundSource, FormCatalog, FormRef};
pub use config::Config;
pub use export::Subject;
pub use session::{AnnotationSession, FormStatus, Notice, NoticeLevel, SessionError};
