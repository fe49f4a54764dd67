//! Input handling and the stroke state machine.
//!
//! This module translates pointer and touch samples into drawing on the
//! annotation surface. It maps display coordinates into surface pixels,
//! names the available tools, and runs the per-gesture renderer that turns
//! samples into smoothed segments or tap dots.

pub mod events;
pub mod mapper;
pub mod stroke;
pub mod tool;

pub use events::{DefaultAction, DisplayRect, MouseButton, PointerEvent, TouchEvent, TouchPoint};
pub use mapper::map_to_surface;
pub use stroke::{GestureKind, SampleOutcome, StrokeRenderer, StrokeSettings, StrokeState};
pub use tool::Tool;
