//! The primary/secondary LUT store.
//!
//! Grading uses up to two LUTs at once: a primary look and an optional
//! secondary look blended on top. [`LutStore`] owns both slots and hands
//! out [`LutSnapshot`]s - cheap `Arc` clones taken at task submission so
//! an in-flight grade never races a concurrent reload.

use crate::{cube, threedl, Lut3D, LutError, LutResult};
use std::io::{Cursor, Read};
use std::sync::Arc;
use tracing::{debug, warn};

/// Owns the loaded LUTs. At most two live at once: primary and secondary.
#[derive(Debug, Default)]
pub struct LutStore {
    primary: Option<Arc<Lut3D>>,
    secondary: Option<Arc<Lut3D>>,
}

/// An immutable snapshot of the store taken at task submission.
///
/// Holds `Arc` references, so a reload into the store after the snapshot
/// was taken does not affect a running task.
#[derive(Debug, Clone, Default)]
pub struct LutSnapshot {
    /// Primary grading LUT.
    pub primary: Option<Arc<Lut3D>>,
    /// Secondary grading LUT, blended after the primary.
    pub secondary: Option<Arc<Lut3D>>,
}

impl LutStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the primary LUT from a byte stream, replacing any existing
    /// primary.
    ///
    /// The stream may be `.cube` or `.3dl`; the format is sniffed from
    /// the content. Fails with [`LutError::EmptyInput`] on a zero-length
    /// stream and [`LutError::ParseError`] / [`LutError::InvalidSize`] on
    /// malformed grids.
    pub fn load<R: Read>(&mut self, reader: R) -> LutResult<()> {
        let lut = parse_stream(reader)?;
        debug!(size = lut.size(), "primary LUT loaded");
        self.primary = Some(Arc::new(lut));
        Ok(())
    }

    /// Loads the secondary LUT from a byte stream.
    ///
    /// Returns `Ok(false)` - not an error - when the stream decodes to an
    /// unusable result, so the caller can proceed with single-LUT grading.
    /// Only I/O failures surface as errors.
    pub fn load_secondary<R: Read>(&mut self, reader: R) -> LutResult<bool> {
        match parse_stream(reader) {
            Ok(lut) => {
                debug!(size = lut.size(), "secondary LUT loaded");
                self.secondary = Some(Arc::new(lut));
                Ok(true)
            }
            Err(LutError::Io(e)) => Err(LutError::Io(e)),
            Err(e) => {
                warn!(error = %e, "secondary LUT unusable, continuing single-LUT");
                self.secondary = None;
                Ok(false)
            }
        }
    }

    /// Releases both LUTs.
    ///
    /// A grade submitted afterwards fails fast with a no-LUT error rather
    /// than silently passing the image through.
    pub fn clear(&mut self) {
        self.primary = None;
        self.secondary = None;
    }

    /// The loaded primary LUT, if any.
    #[inline]
    pub fn primary(&self) -> Option<&Arc<Lut3D>> {
        self.primary.as_ref()
    }

    /// The loaded secondary LUT, if any.
    #[inline]
    pub fn secondary(&self) -> Option<&Arc<Lut3D>> {
        self.secondary.as_ref()
    }

    /// Takes a snapshot of both slots for a task about to be submitted.
    pub fn snapshot(&self) -> LutSnapshot {
        LutSnapshot {
            primary: self.primary.clone(),
            secondary: self.secondary.clone(),
        }
    }
}

/// Reads the whole stream and parses it, sniffing the format.
fn parse_stream<R: Read>(mut reader: R) -> LutResult<Lut3D> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    if bytes.is_empty() {
        return Err(LutError::EmptyInput);
    }

    let text = String::from_utf8_lossy(&bytes);
    let lower = text.to_lowercase();

    if lower.contains("lut_3d_size") {
        cube::parse(Cursor::new(bytes.as_slice()))
    } else if lower.contains("3dl") || text.contains('\t') {
        threedl::parse(Cursor::new(bytes.as_slice()))
    } else {
        // Headerless: try cube first, then 3dl, like the formats' tooling
        // tends to.
        cube::parse(Cursor::new(bytes.as_slice()))
            .or_else(|_| threedl::parse(Cursor::new(bytes.as_slice())))
    }
}
