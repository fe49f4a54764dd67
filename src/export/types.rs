//! Data types for export payloads.

use crate::draw::SurfaceError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use thiserror::Error;

/// Person a form is being filled in for.
///
/// Read-only for the annotation engine: only used for filenames, footers,
/// and message text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Display name
    pub name: String,
    /// Record identifier (MR number)
    pub identifier: String,
    /// Phone number for the messaging handoff, in any formatting
    #[serde(default)]
    pub contact: Option<String>,
}

impl Subject {
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            contact: None,
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }
}

/// The three plain-text fields printed under exported forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterFields {
    pub name: String,
    pub identifier: String,
    pub date: String,
}

impl FooterFields {
    /// Builds footer fields, formatting `date` with a chrono format string.
    pub fn new(subject: &Subject, date: NaiveDate, date_format: &str) -> Result<Self, ExportError> {
        let mut formatted = String::new();
        write!(formatted, "{}", date.format(date_format))
            .map_err(|_| ExportError::DateFormat(date_format.to_string()))?;

        Ok(Self {
            name: subject.name.clone(),
            identifier: subject.identifier.clone(),
            date: formatted,
        })
    }

    /// Footer lines in display order.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Patient: {}", self.name),
            format!("MR No: {}", self.identifier),
            format!("Date: {}", self.date),
        ]
    }
}

/// Kind of file an export produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Flattened PNG
    Image,
    /// Single-page PDF with footer
    Document,
    /// Self-printing HTML page
    Print,
}

impl ExportKind {
    pub fn extension(self) -> &'static str {
        match self {
            ExportKind::Image => "png",
            ExportKind::Document => "pdf",
            ExportKind::Print => "html",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportKind::Image => "image/png",
            ExportKind::Document => "application/pdf",
            ExportKind::Print => "text/html",
        }
    }
}

/// An encoded export ready to hand to a file sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub kind: ExportKind,
    /// Suggested file name (no directory)
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Pre-formatted message for the external messaging handoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    /// Deep link carrying the text, present when the subject has a contact number
    pub handoff_url: Option<String>,
}

/// Errors that can occur while flattening or encoding an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("document generation failed: {0}")]
    Document(String),

    #[error("invalid date format '{0}'")]
    DateFormat(String),

    #[error("invalid handoff URL: {0}")]
    HandoffUrl(#[from] url::ParseError),

    #[error("failed to save export: {0}")]
    Save(#[from] std::io::Error),
}
