//! Autodesk/Assimilate .3dl LUT format support.
//!
//! `.3dl` files list integer RGB triples, tab or space separated, in
//! 10-bit (0-1023), 12-bit (0-4095) or 16-bit (0-65535) range. The grid
//! dimension is not declared; it is inferred as the cube root of the
//! triple count. A leading mesh line (the sampling axis, more than three
//! tokens) is skipped.
//!
//! # Example
//!
//! ```rust,ignore
//! use lutgrade_lut::threedl;
//!
//! let lut = threedl::read("grade.3dl")?;
//! ```

use crate::cube::infer_size;
use crate::{Lut3D, LutError, LutResult};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Reads a 3D LUT from a .3dl file.
pub fn read<P: AsRef<Path>>(path: P) -> LutResult<Lut3D> {
    let file = File::open(path.as_ref())?;
    parse(BufReader::new(file))
}

/// Parses a 3D LUT from a .3dl reader.
pub fn parse<R: BufRead>(reader: R) -> LutResult<Lut3D> {
    let mut data: Vec<[f32; 3]> = Vec::new();
    let mut saw_anything = false;

    for line in reader.lines() {
        let line = line?;
        saw_anything = saw_anything || !line.is_empty();
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        // The mesh/axis line lists one value per grid point.
        if tokens.len() != 3 {
            continue;
        }

        let mut rgb = [0.0f32; 3];
        for (v, token) in rgb.iter_mut().zip(&tokens) {
            let raw = token
                .parse::<f32>()
                .map_err(|_| LutError::ParseError(format!("non-numeric value: {token}")))?;
            *v = normalize(raw);
        }
        data.push(rgb);
    }

    if !saw_anything {
        return Err(LutError::EmptyInput);
    }
    if data.is_empty() {
        return Err(LutError::ParseError("no RGB triples found".into()));
    }

    let size = infer_size(data.len())?;
    debug!(size, entries = data.len(), "parsed 3dl LUT");
    Lut3D::from_data(data, size)
}

/// Normalizes an integer code value by its apparent bit depth.
fn normalize(value: f32) -> f32 {
    if value <= 1.0 {
        value
    } else if value <= 1023.0 {
        value / 1023.0
    } else if value <= 4095.0 {
        value / 4095.0
    } else {
        value / 65535.0
    }
}
