//! Font descriptor for text overlays and document footers.

/// Font configuration for text rendering.
///
/// Describes which font family, weight, and style to use. The size is not
/// part of the descriptor: overlay text is sized in surface pixels from the
/// current stroke width, footer text in points from the export config.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Font family name (e.g., "Sans", "Arial", "DejaVu Serif")
    pub family: String,

    /// Font weight (e.g., "normal", "bold", "light" or numeric 100-900)
    pub weight: String,

    /// Font style (e.g., "normal", "italic", "oblique")
    pub style: String,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "Sans".to_string(),
            weight: "normal".to_string(),
            style: "normal".to_string(),
        }
    }
}

impl FontDescriptor {
    pub fn new(family: String, weight: String, style: String) -> Self {
        Self {
            family,
            weight,
            style,
        }
    }

    /// Converts this descriptor to a size-less Pango font description string.
    ///
    /// Format: "Family [Style] [Weight]", e.g. "Sans" or "Serif Italic Bold".
    pub fn to_pango_string(&self) -> String {
        let mut parts = vec![self.family.clone()];

        if !self.style.eq_ignore_ascii_case("normal") {
            parts.push(capitalize_first(&self.style));
        }

        if !self.weight.eq_ignore_ascii_case("normal") {
            parts.push(capitalize_first(&self.weight));
        }

        parts.join(" ")
    }

    /// Builds a Pango font description with an absolute pixel size.
    pub fn to_pango_description(&self, pixel_size: f64) -> pango::FontDescription {
        let mut description = pango::FontDescription::from_string(&self.to_pango_string());
        description.set_absolute_size(pixel_size * f64::from(pango::SCALE));
        description
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
