//! Adobe/Resolve .cube LUT format support.
//!
//! The .cube format is a simple text-based LUT format widely supported by
//! DaVinci Resolve, Adobe applications, and many other tools.
//!
//! # Format
//!
//! ```text
//! # Comment
//! TITLE "LUT Name"
//! LUT_3D_SIZE 33
//! DOMAIN_MIN 0.0 0.0 0.0
//! DOMAIN_MAX 1.0 1.0 1.0
//! 0.0 0.0 0.0
//! ...
//! 1.0 1.0 1.0
//! ```
//!
//! Streams without a `LUT_3D_SIZE` header are still accepted: the grid
//! dimension is inferred as the cube root of the triple count, and streams
//! whose count is not a perfect cube are rejected.
//!
//! # Example
//!
//! ```rust,ignore
//! use lutgrade_lut::cube;
//!
//! let lut = cube::read("grade.cube")?;
//! let rgb = lut.apply([0.5, 0.3, 0.2]);
//! ```

use crate::{Lut3D, LutError, LutResult};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Reads a 3D LUT from a .cube file.
pub fn read<P: AsRef<Path>>(path: P) -> LutResult<Lut3D> {
    let file = File::open(path.as_ref())?;
    parse(BufReader::new(file))
}

/// Parses a 3D LUT from a reader.
///
/// Fails with [`LutError::EmptyInput`] on a zero-length stream,
/// [`LutError::ParseError`] on malformed rows, and
/// [`LutError::InvalidSize`] when a headerless stream's triple count is
/// not a perfect cube.
pub fn parse<R: BufRead>(reader: R) -> LutResult<Lut3D> {
    let mut size: Option<usize> = None;
    let mut title: Option<String> = None;
    let mut data: Vec<[f32; 3]> = Vec::new();
    let mut saw_anything = false;

    for line in reader.lines() {
        let line = line?;
        saw_anything = saw_anything || !line.is_empty();
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Parse keywords
        if let Some(rest) = line.strip_prefix("TITLE") {
            title = Some(rest.trim().trim_matches('"').to_string());
        } else if line.starts_with("LUT_3D_SIZE") {
            size = Some(parse_size(line)?);
        } else if line.starts_with("LUT_1D_SIZE") {
            return Err(LutError::ParseError("expected 3D LUT, found 1D".into()));
        } else if line.starts_with("DOMAIN_MIN") || line.starts_with("DOMAIN_MAX") {
            // Grading works in the normalized [0,1] domain; validate the
            // row but keep the default domain.
            parse_triple(line.split_whitespace().skip(1))?;
        } else {
            data.push(parse_rgb(line)?);
        }
    }

    if !saw_anything {
        return Err(LutError::EmptyInput);
    }

    let size = match size {
        Some(n) => {
            let expected = n * n * n;
            if data.len() != expected {
                return Err(LutError::ParseError(format!(
                    "expected {} values for LUT_3D_SIZE {}, found {}",
                    expected,
                    n,
                    data.len()
                )));
            }
            n
        }
        // Headerless stream: the grid dimension is the cube root of the
        // triple count.
        None => infer_size(data.len())?,
    };

    debug!(size, entries = data.len(), "parsed cube LUT");

    let mut lut = Lut3D::from_data(data, size)?;
    if let Some(t) = title {
        lut = lut.with_title(t);
    }
    Ok(lut)
}

/// Infers the grid dimension from a triple count, rejecting non-cubes.
pub(crate) fn infer_size(count: usize) -> LutResult<usize> {
    if count == 0 {
        return Err(LutError::EmptyInput);
    }
    let n = (count as f64).cbrt().round() as usize;
    if n < 2 || n * n * n != count {
        return Err(LutError::InvalidSize(format!(
            "{count} entries is not a perfect cube"
        )));
    }
    Ok(n)
}

/// Parses a `LUT_3D_SIZE N` line.
fn parse_size(line: &str) -> LutResult<usize> {
    let mut parts = line.split_whitespace();
    parts.next(); // keyword
    let value = parts
        .next()
        .ok_or_else(|| LutError::ParseError("missing size value".into()))?;
    value
        .parse::<usize>()
        .map_err(|_| LutError::ParseError(format!("invalid size value: {value}")))
}

/// Parses a data row of exactly three floats.
fn parse_rgb(line: &str) -> LutResult<[f32; 3]> {
    let mut tokens = line.split_whitespace();
    let rgb = parse_triple(&mut tokens)?;
    if tokens.next().is_some() {
        return Err(LutError::ParseError(format!(
            "expected 3 values per row, got more: {line}"
        )));
    }
    Ok(rgb)
}

fn parse_triple<'a>(mut tokens: impl Iterator<Item = &'a str>) -> LutResult<[f32; 3]> {
    let mut rgb = [0.0f32; 3];
    for v in &mut rgb {
        let token = tokens
            .next()
            .ok_or_else(|| LutError::ParseError("expected 3 values per row".into()))?;
        *v = token
            .parse::<f32>()
            .map_err(|_| LutError::ParseError(format!("non-numeric value: {token}")))?;
    }
    Ok(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn identity_cube_text(size: usize, header: bool) -> String {
        let mut s = String::new();
        if header {
            s.push_str("# test LUT\n");
            s.push_str("TITLE \"identity\"\n");
            s.push_str(&format!("LUT_3D_SIZE {size}\n"));
        }
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    let n = (size - 1) as f32;
                    s.push_str(&format!(
                        "{} {} {}\n",
                        r as f32 / n,
                        g as f32 / n,
                        b as f32 / n
                    ));
                }
            }
        }
        s
    }

    #[test]
    fn test_parse_with_header() {
        let lut = parse(Cursor::new(identity_cube_text(4, true))).unwrap();
        assert_eq!(lut.size(), 4);
        assert_eq!(lut.title(), Some("identity"));
        let mid = lut.apply([0.5, 0.5, 0.5]);
        assert!((mid[0] - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_parse_headerless_infers_size() {
        let lut = parse(Cursor::new(identity_cube_text(3, false))).unwrap();
        assert_eq!(lut.size(), 3);
    }

    #[test]
    fn test_non_cube_count_rejected() {
        let mut text = identity_cube_text(3, false);
        text.push_str("0.5 0.5 0.5\n"); // 28 triples, not a cube
        assert!(matches!(
            parse(Cursor::new(text)),
            Err(LutError::InvalidSize(_))
        ));
    }

    #[test]
    fn test_header_count_mismatch_rejected() {
        let mut text = identity_cube_text(3, true);
        text.push_str("0.5 0.5 0.5\n");
        assert!(matches!(
            parse(Cursor::new(text)),
            Err(LutError::ParseError(_))
        ));
    }

    #[test]
    fn test_empty_stream() {
        assert!(matches!(
            parse(Cursor::new("")),
            Err(LutError::EmptyInput)
        ));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let text = "0.0 0.0 0.0\nfoo 0.5 0.5\n";
        assert!(matches!(
            parse(Cursor::new(text)),
            Err(LutError::ParseError(_))
        ));
    }

    #[test]
    fn test_wrong_token_count_rejected() {
        let text = "0.0 0.0\n";
        assert!(matches!(
            parse(Cursor::new(text)),
            Err(LutError::ParseError(_))
        ));
    }

    #[test]
    fn test_1d_header_rejected() {
        let text = "LUT_1D_SIZE 1024\n";
        assert!(matches!(
            parse(Cursor::new(text)),
            Err(LutError::ParseError(_))
        ));
    }
}
