//! Tool policy: resolves the active tool into a concrete stroke style.

use super::color::Color;
use crate::input::Tool;

/// Opacity applied to highlighter ink.
pub const HIGHLIGHTER_OPACITY: f64 = 0.3;
/// Highlighter width relative to the base width.
pub const HIGHLIGHTER_WIDTH_MULTIPLIER: f64 = 4.0;
/// Eraser width relative to the base width.
pub const ERASER_WIDTH_MULTIPLIER: f64 = 3.0;

/// Pixel blend rule used while drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeMode {
    /// Paint over existing pixels (Cairo `Over`)
    Normal,
    /// Remove existing pixels under the stroke (Cairo `DestOut`)
    Erase,
}

impl CompositeMode {
    pub fn operator(self) -> cairo::Operator {
        match self {
            CompositeMode::Normal => cairo::Operator::Over,
            CompositeMode::Erase => cairo::Operator::DestOut,
        }
    }
}

/// Fully resolved drawing style, fixed for the duration of one gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub mode: CompositeMode,
    pub color: Color,
    pub opacity: f64,
    /// Line width after the tool multiplier
    pub width: f64,
    /// Width the tool was resolved from; tap dots are sized from it
    pub base_width: f64,
}

impl StrokeStyle {
    /// Applies the policy table to the current tool configuration.
    ///
    /// | Tool        | Mode   | Opacity | Width |
    /// |-------------|--------|---------|-------|
    /// | pen         | normal | 1.0     | 1×    |
    /// | highlighter | normal | 0.3     | 4×    |
    /// | eraser      | erase  | 1.0     | 3×    |
    /// | text        | normal | 1.0     | 1×    |
    pub fn resolve(tool: Tool, color: Color, base_width: f64) -> Self {
        match tool {
            Tool::Pen | Tool::Text => Self {
                mode: CompositeMode::Normal,
                color,
                opacity: 1.0,
                width: base_width,
                base_width,
            },
            Tool::Highlighter => Self {
                mode: CompositeMode::Normal,
                color,
                opacity: HIGHLIGHTER_OPACITY,
                width: base_width * HIGHLIGHTER_WIDTH_MULTIPLIER,
                base_width,
            },
            Tool::Eraser => Self {
                mode: CompositeMode::Erase,
                color,
                opacity: 1.0,
                width: base_width * ERASER_WIDTH_MULTIPLIER,
                base_width,
            },
        }
    }

    /// Radius of the dot left by a quick tap.
    ///
    /// Always half the base width, whatever the tool multiplier.
    pub fn dot_radius(&self) -> f64 {
        self.base_width / 2.0
    }

    /// Source color actually handed to Cairo.
    ///
    /// Erasing only uses the source alpha, so the ink color is irrelevant.
    pub fn source_rgba(&self) -> (f64, f64, f64, f64) {
        match self.mode {
            CompositeMode::Erase => (0.0, 0.0, 0.0, self.opacity),
            CompositeMode::Normal => (
                self.color.r,
                self.color.g,
                self.color.b,
                self.color.a * self.opacity,
            ),
        }
    }

    /// Configures `ctx` for stroking and filling with this style.
    pub fn apply(&self, ctx: &cairo::Context) {
        let (r, g, b, a) = self.source_rgba();
        ctx.set_operator(self.mode.operator());
        ctx.set_source_rgba(r, g, b, a);
        ctx.set_line_width(self.width);
        ctx.set_line_cap(cairo::LineCap::Round);
        ctx.set_line_join(cairo::LineJoin::Round);
    }
}
