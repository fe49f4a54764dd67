//! Single-page PDF export with a plain-text footer.

use super::types::{ExportError, FooterFields};
use crate::draw::render::render_text_lines;
use crate::draw::{FontDescriptor, Surface};
use crate::util::Point;

const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Footer placement, in millimetres below the image.
const FOOTER_LEFT_MM: f64 = 10.0;
const FOOTER_TOP_MM: f64 = 10.0;
const FOOTER_LINE_GAP_MM: f64 = 5.0;
/// Space reserved under the image so every footer line stays on the page.
const FOOTER_SPACE_MM: f64 = 25.0;

/// Page geometry for document export.
#[derive(Debug, Clone)]
pub struct DocumentLayout {
    pub page_width_mm: f64,
    /// Footer font size in points
    pub footer_font_size: f64,
    pub font: FontDescriptor,
}

impl DocumentLayout {
    /// Page size in points for an image of the given pixel size.
    ///
    /// The image spans the full page width with proportional height.
    pub fn page_size(&self, image_width: u32, image_height: u32) -> (f64, f64) {
        let width = self.page_width_mm * POINTS_PER_MM;
        let image_height_pt = self.image_height(width, image_width, image_height);
        (width, image_height_pt + FOOTER_SPACE_MM * POINTS_PER_MM)
    }

    fn image_height(&self, page_width: f64, image_width: u32, image_height: u32) -> f64 {
        page_width * f64::from(image_height) / f64::from(image_width)
    }
}

/// Renders `flat` onto one PDF page followed by the footer lines.
///
/// # Returns
/// The encoded PDF.
pub fn render_document(
    flat: &Surface,
    footer: &FooterFields,
    layout: &DocumentLayout,
) -> Result<Vec<u8>, ExportError> {
    let (page_width, page_height) = layout.page_size(flat.width(), flat.height());
    let image_height = layout.image_height(page_width, flat.width(), flat.height());
    let scale = page_width / f64::from(flat.width());

    let pdf = cairo::PdfSurface::for_stream(page_width, page_height, Vec::<u8>::new())?;
    {
        let ctx = cairo::Context::new(&pdf)?;

        ctx.save()?;
        ctx.scale(scale, scale);
        ctx.set_source_surface(flat.as_cairo(), 0.0, 0.0)?;
        ctx.paint()?;
        ctx.restore()?;

        render_text_lines(
            &ctx,
            Point::new(
                FOOTER_LEFT_MM * POINTS_PER_MM,
                image_height + FOOTER_TOP_MM * POINTS_PER_MM - layout.footer_font_size,
            ),
            &footer.lines(),
            FOOTER_LINE_GAP_MM * POINTS_PER_MM,
            layout.footer_font_size,
            &layout.font,
        )?;

        ctx.show_page()?;
    }

    let stream = pdf
        .finish_output_stream()
        .map_err(|err| ExportError::Document(err.to_string()))?;
    let bytes = stream
        .downcast::<Vec<u8>>()
        .map_err(|_| ExportError::Document("unexpected PDF output stream".into()))?;

    log::debug!(
        "Rendered {:.0}x{:.0}pt PDF page ({} bytes)",
        page_width,
        page_height,
        bytes.len()
    );
    Ok(*bytes)
}
