//! Generic pointer and touch event types.
//!
//! Positions are raw display (CSS) pixel coordinates. Each event carries
//! the on-screen rectangle of the surface at the time it fired, because the
//! displayed size can change between gestures (window resize, zoom).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// On-screen bounding rectangle of the surface's visual element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle at the origin displaying the surface at 1:1.
    pub fn identity(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, f64::from(width), f64::from(height))
    }
}

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// Primary button (draws)
    #[default]
    Left,
    /// Secondary button (ignored)
    Right,
    /// Middle button (ignored)
    Middle,
}

/// A mouse or pen pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
    pub button: MouseButton,
    pub rect: DisplayRect,
    /// Event time relative to an arbitrary, monotonic origin.
    pub timestamp: Duration,
}

impl PointerEvent {
    pub fn new(client_x: f64, client_y: f64, rect: DisplayRect, timestamp: Duration) -> Self {
        Self {
            client_x,
            client_y,
            button: MouseButton::Left,
            rect,
            timestamp,
        }
    }
}

/// One active contact point of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub client_x: f64,
    pub client_y: f64,
}

/// A touch sample listing every contact currently on the surface.
///
/// On touch end the list holds the contacts that remain down, so a
/// completed single-finger gesture ends with an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub touches: Vec<TouchPoint>,
    pub rect: DisplayRect,
    pub timestamp: Duration,
}

impl TouchEvent {
    pub fn single(client_x: f64, client_y: f64, rect: DisplayRect, timestamp: Duration) -> Self {
        Self {
            touches: vec![TouchPoint { client_x, client_y }],
            rect,
            timestamp,
        }
    }

    /// More than one simultaneous contact (palm or pinch).
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }
}

/// What the platform should do with its own handling of an event.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAction {
    /// Let the platform scroll/zoom as usual (no form on screen)
    Allow,
    /// Suppress platform scroll/zoom while interacting with the surface
    Prevent,
}
