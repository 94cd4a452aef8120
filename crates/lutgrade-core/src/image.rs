//! Owned RGBA8 image buffer.
//!
//! [`ImageBuf`] is the single pixel container the whole pipeline works on:
//! interleaved 8-bit RGBA, row-major, no padding between rows. Construction
//! validates dimensions so downstream code can index without overflow
//! checks.
//!
//! # Usage
//!
//! ```rust
//! use lutgrade_core::ImageBuf;
//!
//! let mut img = ImageBuf::new(1920, 1080).unwrap();
//! img.set_pixel(100, 100, [255, 128, 64, 255]).unwrap();
//! let px = img.pixel(100, 100).unwrap();
//! assert_eq!(px[0], 255);
//! ```

use crate::{Error, Result};

/// Number of interleaved channels per pixel (RGBA).
pub const CHANNELS: usize = 4;

/// A single RGBA pixel, `[r, g, b, a]`.
pub type Rgba8 = [u8; CHANNELS];

/// Owned 8-bit RGBA image buffer.
///
/// Pixel data is stored in a contiguous `Vec<u8>` with no row padding, so
/// `data.len() == width * height * 4` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuf {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl ImageBuf {
    /// Creates a new image filled with transparent black.
    ///
    /// Fails with [`Error::InvalidDimensions`] if either dimension is zero
    /// or the buffer size would overflow `usize`.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = Self::buffer_len(width, height)?;
        Ok(Self {
            data: vec![0; len],
            width,
            height,
        })
    }

    /// Wraps an existing RGBA byte buffer.
    ///
    /// Fails with [`Error::BufferSize`] if `data` doesn't match the
    /// declared dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = Self::buffer_len(width, height)?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                got: data.len(),
                width,
                height,
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    fn buffer_len(width: u32, height: u32) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(
                width,
                height,
                "dimensions must be non-zero",
            ));
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflow"))
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Bytes per row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// Raw interleaved RGBA bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw interleaved RGBA bytes.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the buffer, returning the raw bytes.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Returns the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Result<Rgba8> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        Ok([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Sets the pixel at `(x, y)`.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba8) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        self.data[i..i + CHANNELS].copy_from_slice(&px);
        Ok(())
    }

    /// Fills the whole image with one pixel value.
    pub fn fill(&mut self, px: Rgba8) {
        for chunk in self.data.chunks_exact_mut(CHANNELS) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Creates an image of the given size filled with `px`.
    pub fn filled(width: u32, height: u32, px: Rgba8) -> Result<Self> {
        let mut img = Self::new(width, height)?;
        img.fill(px);
        Ok(img)
    }

    /// Iterator over pixel rows (each `width * 4` bytes).
    #[inline]
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.row_bytes())
    }

    /// Mutable iterator over pixel rows.
    #[inline]
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        let rb = self.row_bytes();
        self.data.chunks_exact_mut(rb)
    }
}
