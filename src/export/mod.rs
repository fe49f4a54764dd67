//! Compositing and export payloads.
//!
//! This module provides:
//! - [`flatten`]: merges a form background with its annotation layer
//! - Encoders for the image, document (PDF), and print (HTML) outputs
//! - Message text and deep-link composition for the messaging handoff
//! - The local file sink used by the CLI

pub mod compositor;
pub mod document;
pub mod file;
pub mod message;
pub mod print;
pub mod types;

pub use compositor::flatten;
pub use document::{DocumentLayout, render_document};
pub use file::{export_filename, save_export};
pub use message::compose_message;
pub use print::render_print_html;
pub use types::{ExportArtifact, ExportError, ExportKind, FooterFields, Message, Subject};
