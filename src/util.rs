//! Utility functions for geometry, color names, and export filenames.
//!
//! This module provides:
//! - [`Point`] and the distance/midpoint math used by stroke smoothing
//! - Quadratic-to-cubic Bézier conversion (Cairo only draws cubics)
//! - Name/hex-to-color mapping for config files and scripts
//! - Filename component sanitizing for export payloads

use crate::draw::{Color, color::*};
use serde::{Deserialize, Serialize};

// ============================================================================
// Geometry
// ============================================================================

/// A position in surface pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Converts a quadratic Bézier (start, control, end) into the two control
/// points of the equivalent cubic curve.
///
/// # Returns
/// `(c1, c2)` such that `move_to(start); curve_to(c1, c2, end)` traces the
/// same curve as the quadratic.
pub fn quadratic_to_cubic(start: Point, control: Point, end: Point) -> (Point, Point) {
    const TWO_THIRDS: f64 = 2.0 / 3.0;
    let c1 = Point::new(
        start.x + TWO_THIRDS * (control.x - start.x),
        start.y + TWO_THIRDS * (control.y - start.y),
    );
    let c2 = Point::new(
        end.x + TWO_THIRDS * (control.x - end.x),
        end.y + TWO_THIRDS * (control.y - end.y),
    );
    (c1, c2)
}

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps a color name or `#rrggbb` hex string to a color.
///
/// # Supported names (case-insensitive)
/// black, red, blue, green, yellow, magenta (or pink), cyan, orange, white
///
/// # Returns
/// `None` for unknown names and malformed hex strings.
pub fn name_to_color(name: &str) -> Option<Color> {
    let trimmed = name.trim();
    if trimmed.starts_with('#') {
        return Color::from_hex(trimmed);
    }

    match trimmed.to_lowercase().as_str() {
        "black" => Some(BLACK),
        "red" => Some(RED),
        "blue" => Some(BLUE),
        "green" => Some(GREEN),
        "yellow" => Some(YELLOW),
        "magenta" | "pink" => Some(MAGENTA),
        "cyan" => Some(CYAN),
        "orange" => Some(ORANGE),
        "white" => Some(WHITE),
        _ => None,
    }
}

// ============================================================================
// Filenames
// ============================================================================

/// Replaces each run of whitespace with a single underscore.
///
/// Path separators are replaced too so a subject or form name can never
/// escape the export directory.
pub fn filename_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        match ch {
            '/' | '\\' | '\0' => out.push('-'),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_and_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(a.midpoint(b), Point::new(1.5, 2.0));
    }

    #[test]
    fn quadratic_with_collinear_control_stays_on_line() {
        let (c1, c2) = quadratic_to_cubic(
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(6.0, 0.0),
        );
        assert_eq!(c1, Point::new(2.0, 0.0));
        assert_eq!(c2, Point::new(4.0, 0.0));
    }

    #[test]
    fn quadratic_with_control_at_start() {
        // First segment of a stroke: control point equals the anchor.
        let start = Point::new(10.0, 10.0);
        let (c1, c2) = quadratic_to_cubic(start, start, Point::new(13.0, 10.0));
        assert_eq!(c1, start);
        assert_eq!(c2, Point::new(11.0, 10.0));
    }

    #[test]
    fn color_names_and_hex() {
        assert_eq!(name_to_color("Red"), Some(RED));
        assert_eq!(name_to_color("pink"), Some(MAGENTA));
        assert_eq!(name_to_color("#ff8800"), Some(ORANGE));
        assert_eq!(name_to_color("mauve"), None);
        assert_eq!(name_to_color("#12"), None);
    }

    #[test]
    fn filename_component_collapses_whitespace() {
        assert_eq!(filename_component("Jane  Q Doe"), "Jane_Q_Doe");
        assert_eq!(
            filename_component("CONSENT FOR CAG (1)"),
            "CONSENT_FOR_CAG_(1)"
        );
        assert_eq!(filename_component(" a/b "), "a-b");
    }
}
