//! Flattens a form background and its annotation layer into one raster.

use super::types::ExportError;
use crate::draw::Surface;

/// Draws `background` at its natural size with `annotations` on top,
/// origin-aligned, into a new surface.
///
/// Neither input is modified. The output has the background's dimensions;
/// annotation pixels beyond them are cropped.
pub fn flatten(background: &Surface, annotations: &Surface) -> Result<Surface, ExportError> {
    let mut flat = Surface::new(background.width(), background.height())?;
    {
        let ctx = flat.context()?;

        ctx.set_operator(cairo::Operator::Source);
        ctx.set_source_surface(background.as_cairo(), 0.0, 0.0)?;
        ctx.paint()?;

        ctx.set_operator(cairo::Operator::Over);
        ctx.set_source_surface(annotations.as_cairo(), 0.0, 0.0)?;
        ctx.paint()?;
    }

    log::debug!(
        "Flattened {}x{} annotation layer over {}x{} background",
        annotations.width(),
        annotations.height(),
        background.width(),
        background.height()
    );
    Ok(flat)
}
