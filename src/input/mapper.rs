//! Display-to-surface coordinate mapping.

use super::events::DisplayRect;
use crate::util::Point;

/// Maps a raw display position into surface pixel space.
///
/// Scale factors are computed independently per axis as
/// `surface dimension / displayed dimension`, then applied to the offset from
/// the rectangle's origin. Pure: the same inputs always produce the same
/// point.
///
/// # Returns
/// `None` when the rectangle is degenerate (zero, negative, or non-finite
/// size) or the input position is not finite. Such events are dropped.
pub fn map_to_surface(
    client_x: f64,
    client_y: f64,
    rect: &DisplayRect,
    surface_width: u32,
    surface_height: u32,
) -> Option<Point> {
    let usable = |v: f64| v.is_finite() && v > 0.0;
    if !usable(rect.width) || !usable(rect.height) {
        return None;
    }

    let scale_x = f64::from(surface_width) / rect.width;
    let scale_y = f64::from(surface_height) / rect.height;

    let point = Point::new(
        (client_x - rect.left) * scale_x,
        (client_y - rect.top) * scale_y,
    );
    point.is_finite().then_some(point)
}
