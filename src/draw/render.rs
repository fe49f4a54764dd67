//! Cairo-based raster primitives for strokes, dots, and text.
//!
//! Every function draws directly onto the given context with the
//! compositing mode of the supplied style, then leaves the context with no
//! current path.

use super::color::Color;
use super::font::FontDescriptor;
use super::style::StrokeStyle;
use crate::util::{Point, quadratic_to_cubic};

/// Renders one smoothed stroke segment.
///
/// The segment is the quadratic curve from `anchor` to `end` bent toward
/// `control`, stroked on its own path so each sample paints immediately.
///
/// # Arguments
/// * `ctx` - Cairo drawing context to render to
/// * `style` - Resolved tool style for the gesture
/// * `anchor` - Start of the segment (previous midpoint, or gesture start)
/// * `control` - Last recorded sample
/// * `end` - Midpoint between the last recorded sample and the new one
pub fn render_segment(
    ctx: &cairo::Context,
    style: &StrokeStyle,
    anchor: Point,
    control: Point,
    end: Point,
) -> Result<(), cairo::Error> {
    let (c1, c2) = quadratic_to_cubic(anchor, control, end);

    style.apply(ctx);
    ctx.new_path();
    ctx.move_to(anchor.x, anchor.y);
    ctx.curve_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
    ctx.stroke()
}

/// Renders a filled circular mark, used for taps and clicks.
pub fn render_dot(
    ctx: &cairo::Context,
    style: &StrokeStyle,
    center: Point,
    radius: f64,
) -> Result<(), cairo::Error> {
    if radius <= 0.0 {
        return Ok(());
    }

    style.apply(ctx);
    ctx.new_path();
    ctx.arc(center.x, center.y, radius, 0.0, std::f64::consts::PI * 2.0);
    ctx.fill()
}

/// Renders left-aligned, top-anchored text using Pango.
///
/// `(x, y)` is the top-left corner of the first line. Newlines start
/// additional lines below it.
///
/// # Arguments
/// * `ctx` - Cairo drawing context to render to
/// * `anchor` - Top-left corner in surface pixels
/// * `text` - Text content to render
/// * `color` - Fill color
/// * `pixel_size` - Font size in surface pixels
/// * `font` - Family, weight, and style
///
/// # Returns
/// The laid-out text size in pixels.
pub fn render_text(
    ctx: &cairo::Context,
    anchor: Point,
    text: &str,
    color: Color,
    pixel_size: f64,
    font: &FontDescriptor,
) -> Result<(i32, i32), cairo::Error> {
    ctx.save()?;

    // Gray antialiasing: subpixel fringes look wrong once flattened over a scan.
    ctx.set_antialias(cairo::Antialias::Gray);
    ctx.set_operator(cairo::Operator::Over);

    let layout = pangocairo::functions::create_layout(ctx);
    let description = font.to_pango_description(pixel_size);
    layout.set_font_description(Some(&description));
    layout.set_alignment(pango::Alignment::Left);
    layout.set_text(text);

    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.move_to(anchor.x, anchor.y);
    pangocairo::functions::show_layout(ctx, &layout);
    ctx.new_path();

    let size = layout.pixel_size();
    ctx.restore()?;
    Ok(size)
}

/// Renders lines of plain text with baselines spaced `line_gap` apart.
///
/// Used for document footers where positions are given in page units.
pub fn render_text_lines(
    ctx: &cairo::Context,
    origin: Point,
    lines: &[String],
    line_gap: f64,
    size: f64,
    font: &FontDescriptor,
) -> Result<(), cairo::Error> {
    let mut top = origin.y;
    for line in lines {
        render_text(
            ctx,
            Point::new(origin.x, top),
            line,
            super::color::BLACK,
            size,
            font,
        )?;
        top += line_gap;
    }
    Ok(())
}
