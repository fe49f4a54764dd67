use crate::config::Config;
use crate::draw::{Color, FontDescriptor};
use crate::input::{StrokeSettings, Tool};

/// Base widths outside this range are clamped.
pub const MIN_WIDTH: f64 = 1.0;
pub const MAX_WIDTH: f64 = 50.0;

/// Runtime options derived from configuration for an annotation session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub initial_tool: Tool,
    pub initial_color: Color,
    pub initial_width: f64,
    pub stroke: StrokeSettings,
    /// Maximum history entries per form (0 = unbounded)
    pub history_depth: usize,
    /// Text pixel size = base width x this
    pub text_size_multiplier: f64,
    pub font: FontDescriptor,
    pub page_width_mm: f64,
    pub footer_font_size: f64,
    pub date_format: String,
    pub message_template: String,
    pub handoff_base_url: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        options_from_config(&Config::default())
    }
}

impl SessionOptions {
    /// Font size in surface pixels for a given base width.
    pub fn text_pixel_size(&self, width: f64) -> f64 {
        width * self.text_size_multiplier
    }
}

/// Builds session options from the (already validated) config.
pub fn options_from_config(config: &Config) -> SessionOptions {
    SessionOptions {
        initial_tool: config.drawing.default_tool,
        initial_color: config.drawing.default_color.to_color(),
        initial_width: config.drawing.default_width.clamp(MIN_WIDTH, MAX_WIDTH),
        stroke: config.stroke.to_settings(),
        history_depth: config.history.max_depth,
        text_size_multiplier: config.drawing.text_size_multiplier,
        font: config.font_descriptor(),
        page_width_mm: config.export.page_width_mm,
        footer_font_size: config.export.footer_font_size,
        date_format: config.export.date_format.clone(),
        message_template: config.export.message_template.clone(),
        handoff_base_url: config.export.handoff_base_url.clone(),
    }
}
