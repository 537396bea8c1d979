#![forbid(unsafe_code)]

//! Zero-copy views over engine frames.

use std::fmt;

use simhost_core::{PixelBuffer, SurfaceSize};

/// Why a byte or word buffer cannot be used as a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Width or height is zero.
    Empty,
    /// The buffer length does not match the claimed dimensions.
    LengthMismatch { expected: usize, actual: usize },
    /// The claimed dimensions overflow the address space.
    TooLarge,
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "frame has zero area"),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "frame length {actual} does not match expected {expected}")
            }
            Self::TooLarge => write!(f, "frame dimensions overflow"),
        }
    }
}

impl std::error::Error for BufferError {}

/// A validated, opaque image borrowed from an engine frame.
///
/// The length is checked once on construction, so pixel access never fails
/// for in-range coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Image<'a> {
    bytes: &'a [u8],
    size: SurfaceSize,
}

impl<'a> Image<'a> {
    /// Build an image from an engine frame.
    pub fn from_buffer(buffer: PixelBuffer<'a>) -> Result<Self, BufferError> {
        let size = buffer.size();
        if size.is_empty() {
            return Err(BufferError::Empty);
        }
        let expected = buffer.expected_len().ok_or(BufferError::TooLarge)?;
        let bytes = buffer.bytes();
        if bytes.len() != expected {
            return Err(BufferError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self { bytes, size })
    }

    /// Image dimensions.
    #[inline]
    pub const fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Packed bytes of row `y`, top row first.
    #[inline]
    pub fn row(&self, y: u32) -> &'a [u8] {
        let stride = self.size.width as usize * PixelBuffer::BYTES_PER_PIXEL;
        let start = y as usize * stride;
        &self.bytes[start..start + stride]
    }

    /// Pixel at `(x, y)` as `0x00RRGGBB`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        let row = self.row(y);
        let i = x as usize * PixelBuffer::BYTES_PER_PIXEL;
        pack(&row[i..i + PixelBuffer::BYTES_PER_PIXEL])
    }
}

/// Pack one `[X, R, G, B]` quad, discarding the padding byte.
#[inline]
pub(crate) fn pack(quad: &[u8]) -> u32 {
    u32::from_be_bytes([0, quad[1], quad[2], quad[3]])
}
