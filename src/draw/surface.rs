//! Pixel surfaces and immutable snapshots.
//!
//! A [`Surface`] wraps a Cairo ARGB32 image surface sized to a form's natural
//! resolution. [`Snapshot`]s are owned copies of its pixel buffer that can be
//! painted back verbatim.

use std::io::{Read, Write};
use thiserror::Error;

const FORMAT: cairo::Format = cairo::Format::ARgb32;

/// Errors raised while creating, reading, or restoring a surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("pixel buffer has {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("snapshot is {snapshot_width}x{snapshot_height}, surface is {width}x{height}")]
    SnapshotMismatch {
        snapshot_width: u32,
        snapshot_height: u32,
        width: u32,
        height: u32,
    },

    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("surface data unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("PNG stream error: {0}")]
    Png(#[from] cairo::IoError),
}

/// Unpremultiplied 8-bit RGBA pixel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

/// Mutable raster bitmap, pixel-addressable.
pub struct Surface {
    inner: cairo::ImageSurface,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Immutable copy of a surface's pixel buffer at one instant.
///
/// The buffer is never exposed mutably, so a snapshot cannot change after
/// capture.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    stride: i32,
    data: Box<[u8]>,
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Snapshot {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn to_image_surface(&self) -> Result<cairo::ImageSurface, SurfaceError> {
        Ok(cairo::ImageSurface::create_for_data(
            self.data.to_vec(),
            FORMAT,
            self.width as i32,
            self.height as i32,
            self.stride,
        )?)
    }
}

impl Surface {
    /// Creates a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        check_dimensions(width, height)?;
        let inner = cairo::ImageSurface::create(FORMAT, width as i32, height as i32)?;
        Ok(Self { inner })
    }

    /// Creates a surface from tightly packed, unpremultiplied RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, SurfaceError> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(SurfaceError::BufferSize {
                expected,
                actual: rgba.len(),
            });
        }

        let stride = FORMAT.stride_for_width(width)?;
        let row_bytes = width as usize * 4;
        let mut data = vec![0u8; stride as usize * height as usize];
        for (src_row, dst_row) in rgba
            .chunks_exact(row_bytes)
            .zip(data.chunks_exact_mut(stride as usize))
        {
            for (src, dst) in src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(4)) {
                dst.copy_from_slice(&premultiply(src[0], src[1], src[2], src[3]).to_ne_bytes());
            }
        }

        let inner =
            cairo::ImageSurface::create_for_data(data, FORMAT, width as i32, height as i32, stride)?;
        Ok(Self { inner })
    }

    /// Decodes a PNG stream into a surface.
    pub fn from_png<R: Read>(reader: &mut R) -> Result<Self, SurfaceError> {
        let inner = cairo::ImageSurface::create_from_png(reader)?;
        Ok(Self { inner })
    }

    pub fn width(&self) -> u32 {
        self.inner.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.inner.height() as u32
    }

    /// Returns a fresh Cairo context targeting this surface.
    ///
    /// Contexts must be dropped before the surface is snapshotted so Cairo
    /// flushes pending drawing.
    pub fn context(&mut self) -> Result<cairo::Context, SurfaceError> {
        Ok(cairo::Context::new(&self.inner)?)
    }

    pub(crate) fn as_cairo(&self) -> &cairo::ImageSurface {
        &self.inner
    }

    /// Copies the entire pixel buffer into an immutable snapshot.
    pub fn snapshot(&self) -> Result<Snapshot, SurfaceError> {
        let mut copy = Vec::new();
        self.inner.with_data(|data| copy.extend_from_slice(data))?;
        Ok(Snapshot {
            width: self.width(),
            height: self.height(),
            stride: self.inner.stride(),
            data: copy.into_boxed_slice(),
        })
    }

    /// Replaces every pixel with the snapshot's content.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SurfaceError> {
        if snapshot.width != self.width() || snapshot.height != self.height() {
            return Err(SurfaceError::SnapshotMismatch {
                snapshot_width: snapshot.width,
                snapshot_height: snapshot.height,
                width: self.width(),
                height: self.height(),
            });
        }

        let source = snapshot.to_image_surface()?;
        let ctx = self.context()?;
        ctx.set_operator(cairo::Operator::Source);
        ctx.set_source_surface(&source, 0.0, 0.0)?;
        ctx.paint()?;
        Ok(())
    }

    /// Erases every pixel to transparent.
    pub fn clear(&mut self) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        ctx.set_operator(cairo::Operator::Clear);
        ctx.paint()?;
        Ok(())
    }

    /// Reads one pixel, unpremultiplied. Returns `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let offset = y as usize * self.inner.stride() as usize + x as usize * 4;
        let mut pixel = None;
        self.inner
            .with_data(|data| {
                if let Some(bytes) = data.get(offset..offset + 4) {
                    let argb = u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                    pixel = Some(unpremultiply(argb));
                }
            })
            .ok()?;
        pixel
    }

    /// Encodes the surface as PNG.
    pub fn write_png<W: Write>(&self, writer: &mut W) -> Result<(), SurfaceError> {
        self.inner.write_to_png(writer)?;
        Ok(())
    }

    /// Encodes the surface as PNG into a new buffer.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut bytes = Vec::new();
        self.write_png(&mut bytes)?;
        Ok(bytes)
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), SurfaceError> {
    if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(SurfaceError::InvalidDimensions { width, height });
    }
    Ok(())
}

fn premultiply(r: u8, g: u8, b: u8, a: u8) -> u32 {
    let scale = |c: u8| (u32::from(c) * u32::from(a) + 127) / 255;
    (u32::from(a) << 24) | (scale(r) << 16) | (scale(g) << 8) | scale(b)
}

fn unpremultiply(argb: u32) -> Rgba8 {
    let a = (argb >> 24) & 0xff;
    if a == 0 {
        return Rgba8::TRANSPARENT;
    }
    let channel = |shift: u32| {
        let c = (argb >> shift) & 0xff;
        ((c * 255 + a / 2) / a).min(255) as u8
    };
    Rgba8 {
        r: channel(16),
        g: channel(8),
        b: channel(0),
        a: a as u8,
    }
}
