//! Configuration type definitions.

use super::enums::ColorSpec;
use crate::input::{StrokeSettings, Tool};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Drawing-related settings.
///
/// Controls the tool configuration a session starts with. Users change
/// these at runtime through the toolbar.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Initial ink color - a named color, `#rrggbb`, or an RGB array like `[255, 0, 0]`
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Initial base line width in surface pixels (valid range: 1.0 - 50.0)
    #[serde(default = "default_width")]
    pub default_width: f64,

    /// Initial tool (pen, eraser, highlighter, text)
    #[serde(default)]
    pub default_tool: Tool,

    /// Font family name for text overlays (e.g., "Sans", "Arial")
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font weight (e.g., "normal", "bold", "light", or 100-900)
    #[serde(default = "default_font_weight")]
    pub font_weight: String,

    /// Font style (e.g., "normal", "italic", "oblique")
    #[serde(default = "default_font_style")]
    pub font_style: String,

    /// Text pixel size as a multiple of the base line width (valid range: 1.0 - 20.0)
    #[serde(default = "default_text_size_multiplier")]
    pub text_size_multiplier: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            default_width: default_width(),
            default_tool: Tool::default(),
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            font_style: default_font_style(),
            text_size_multiplier: default_text_size_multiplier(),
        }
    }
}

/// Stroke smoothing and tap detection thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StrokeConfig {
    /// Minimum time between accepted move samples in ms (valid range: 0 - 100)
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,

    /// Movement in pixels a sample must exceed to draw (valid range: 0.0 - 20.0)
    #[serde(default = "default_min_move_px")]
    pub min_move_px: f64,

    /// Gestures shorter than this (ms) that barely move render as a dot (valid range: 0 - 2000)
    #[serde(default = "default_dot_max_duration_ms")]
    pub dot_max_duration_ms: u64,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            throttle_ms: default_throttle_ms(),
            min_move_px: default_min_move_px(),
            dot_max_duration_ms: default_dot_max_duration_ms(),
        }
    }
}

impl StrokeConfig {
    pub fn to_settings(&self) -> StrokeSettings {
        StrokeSettings {
            min_sample_interval: Duration::from_millis(self.throttle_ms),
            min_movement: self.min_move_px,
            dot_window: Duration::from_millis(self.dot_max_duration_ms),
        }
    }
}

/// Undo history limits.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct HistoryConfig {
    /// Maximum snapshots kept per form (0 = unbounded). Each snapshot is a
    /// full copy of the surface, so large scans may warrant a cap.
    #[serde(default)]
    pub max_depth: usize,
}

/// Export, print, and messaging settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Directory export payloads are written to (supports `~/`)
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Document page width in millimetres (valid range: 50.0 - 1000.0)
    #[serde(default = "default_page_width_mm")]
    pub page_width_mm: f64,

    /// Footer font size in points (valid range: 4.0 - 48.0)
    #[serde(default = "default_footer_font_size")]
    pub footer_font_size: f64,

    /// chrono format for the date shown in footers and print pages
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Message template; supports {name}, {id}, and {form}
    #[serde(default = "default_message_template")]
    pub message_template: String,

    /// Base URL for the messaging handoff link
    #[serde(default = "default_handoff_base_url")]
    pub handoff_base_url: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            page_width_mm: default_page_width_mm(),
            footer_font_size: default_footer_font_size(),
            date_format: default_date_format(),
            message_template: default_message_template(),
            handoff_base_url: default_handoff_base_url(),
        }
    }
}

/// One form template in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormEntry {
    /// Display name, also used in export filenames
    pub name: String,
    /// Image location: an absolute path, a `file://` URL, or a path relative to `directory`
    pub url: String,
}

/// Form template catalog.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CatalogConfig {
    /// Base directory for relative form image paths
    #[serde(default = "default_catalog_directory")]
    pub directory: String,

    /// Ordered forms; the first one is activated by default
    #[serde(default)]
    pub forms: Vec<FormEntry>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            directory: default_catalog_directory(),
            forms: Vec::new(),
        }
    }
}

// ============================================================================
// Defaults
// ============================================================================

fn default_color() -> ColorSpec {
    ColorSpec::Name("red".to_string())
}

fn default_width() -> f64 {
    3.0
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_font_weight() -> String {
    "normal".to_string()
}

fn default_font_style() -> String {
    "normal".to_string()
}

fn default_text_size_multiplier() -> f64 {
    4.0
}

fn default_throttle_ms() -> u64 {
    6
}

fn default_min_move_px() -> f64 {
    1.0
}

fn default_dot_max_duration_ms() -> u64 {
    200
}

fn default_output_dir() -> String {
    "~/Pictures/Formink".to_string()
}

fn default_page_width_mm() -> f64 {
    210.0
}

fn default_footer_font_size() -> f64 {
    10.0
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_message_template() -> String {
    "Hi {name}, your {form} is ready. MR No: {id}".to_string()
}

fn default_handoff_base_url() -> String {
    "https://wa.me/".to_string()
}

fn default_catalog_directory() -> String {
    "~/.local/share/formink/forms".to_string()
}
