//! Drawing tool selection.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Drawing tool selection.
///
/// The active tool is read when a gesture starts; switching tools while a
/// stroke is in progress only affects the next stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Freehand ink at full opacity (default)
    #[default]
    Pen,
    /// Removes existing annotation pixels under the stroke
    Eraser,
    /// Wide, translucent ink
    Highlighter,
    /// Click to place an anchor, then submit a line of text
    Text,
}

impl Tool {
    /// Whether a pointer drag with this tool produces a stroke.
    pub fn draws_strokes(self) -> bool {
        !matches!(self, Tool::Text)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Pen => "pen",
            Tool::Eraser => "eraser",
            Tool::Highlighter => "highlighter",
            Tool::Text => "text",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown tool identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool '{0}' (expected pen, eraser, highlighter, or text)")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pen" => Ok(Tool::Pen),
            "eraser" => Ok(Tool::Eraser),
            "highlighter" => Ok(Tool::Highlighter),
            "text" => Ok(Tool::Text),
            _ => Err(UnknownTool(s.to_string())),
        }
    }
}
