//! Raster primitives for the annotation layer (Cairo-based).
//!
//! This module defines the core drawing types:
//! - [`Color`]: RGBA color representation with the preset palette
//! - [`Surface`] / [`Snapshot`]: the mutable raster and its immutable copies
//! - [`StrokeStyle`]: tool policy resolved into a concrete blend mode, opacity, and width
//! - Rendering functions for strokes, dots, and text

pub mod color;
pub mod font;
pub mod render;
pub mod style;
pub mod surface;

pub use color::Color;
pub use font::FontDescriptor;
pub use render::{render_dot, render_segment, render_text};
pub use style::{CompositeMode, StrokeStyle};
pub use surface::{Rgba8, Snapshot, Surface, SurfaceError};
