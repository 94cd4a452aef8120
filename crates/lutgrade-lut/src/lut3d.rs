//! 3-dimensional lookup table.
//!
//! A 3D LUT maps RGB input to RGB output through a cube of color values.
//! lutgrade uses it as the core of film-look color grading.

use crate::{LutError, LutResult};

/// A 3-dimensional lookup table.
///
/// Stores a cube of RGB values indexed by input RGB. Standard sizes are
/// 17x17x17, 33x33x33, or 65x65x65.
///
/// # Structure
///
/// - `size^3` entries, each containing normalized RGB output values
/// - Stored in R-major order: R varies fastest, then G, then B (the order
///   `.cube` files list their rows in)
/// - Trilinear interpolation for lookup; query coordinates are clamped to
///   the grid, never wrapped
///
/// # Example
///
/// ```rust
/// use lutgrade_lut::Lut3D;
///
/// let lut = Lut3D::identity(33);
/// let output = lut.apply([0.5, 0.3, 0.2]);
/// assert!((output[0] - 0.5).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct Lut3D {
    /// LUT data, flattened R-fastest: `[(r0,g0,b0), (r1,g0,b0), ...]`
    data: Vec<[f32; 3]>,
    /// Cube size (typically 17, 33, or 65)
    size: usize,
    /// Optional title from the source file (`TITLE` keyword).
    title: Option<String>,
}

impl Lut3D {
    /// Creates an identity (pass-through) 3D LUT.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lutgrade_lut::Lut3D;
    ///
    /// let lut = Lut3D::identity(17);
    /// let result = lut.apply([0.5, 0.3, 0.8]);
    /// assert!((result[0] - 0.5).abs() < 0.01);
    /// ```
    pub fn identity(size: usize) -> Self {
        let total = size * size * size;
        let mut data = Vec::with_capacity(total);

        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    let rf = r as f32 / (size - 1) as f32;
                    let gf = g as f32 / (size - 1) as f32;
                    let bf = b as f32 / (size - 1) as f32;
                    data.push([rf, gf, bf]);
                }
            }
        }

        Self {
            data,
            size,
            title: None,
        }
    }

    /// Creates a 3D LUT from raw data.
    ///
    /// Data must be in R-major order with exactly `size^3` entries and
    /// `size >= 2` (a single grid point cannot be interpolated).
    pub fn from_data(data: Vec<[f32; 3]>, size: usize) -> LutResult<Self> {
        if size < 2 {
            return Err(LutError::InvalidSize(format!(
                "grid dimension {size} is below the interpolable minimum of 2"
            )));
        }
        let expected = size * size * size;
        if data.len() != expected {
            return Err(LutError::InvalidSize(format!(
                "expected {} entries for size {}, got {}",
                expected,
                size,
                data.len()
            )));
        }
        Ok(Self {
            data,
            size,
            title: None,
        })
    }

    /// Sets the LUT title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Grid dimension N. Immutable after load.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Title from the source file, if any.
    #[inline]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Total number of entries in the cube.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.size * self.size * self.size
    }

    /// Returns the index for a given (r, g, b) grid position.
    #[inline]
    fn index(&self, r: usize, g: usize, b: usize) -> usize {
        b * self.size * self.size + g * self.size + r
    }

    /// Gets the value at grid position (r, g, b).
    #[inline]
    fn get(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        self.data[self.index(r, g, b)]
    }

    /// Applies the LUT to a normalized RGB value via trilinear
    /// interpolation.
    ///
    /// Input channels are clamped to [0, 1] before lookup.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let r = rgb[0].clamp(0.0, 1.0);
        let g = rgb[1].clamp(0.0, 1.0);
        let b = rgb[2].clamp(0.0, 1.0);
        let n = (self.size - 1) as f32;

        // Grid coordinates, clamped so cell + 1 stays in range
        let ri = ((r * n).floor() as usize).min(self.size - 2);
        let gi = ((g * n).floor() as usize).min(self.size - 2);
        let bi = ((b * n).floor() as usize).min(self.size - 2);

        // Fractional parts
        let rf = r * n - ri as f32;
        let gf = g * n - gi as f32;
        let bf = b * n - bi as f32;

        // Get the 8 corner values
        let c000 = self.get(ri, gi, bi);
        let c100 = self.get(ri + 1, gi, bi);
        let c010 = self.get(ri, gi + 1, bi);
        let c110 = self.get(ri + 1, gi + 1, bi);
        let c001 = self.get(ri, gi, bi + 1);
        let c101 = self.get(ri + 1, gi, bi + 1);
        let c011 = self.get(ri, gi + 1, bi + 1);
        let c111 = self.get(ri + 1, gi + 1, bi + 1);

        // Interpolate along r, then g, then b
        let mut result = [0.0f32; 3];
        for i in 0..3 {
            let c00 = c000[i] * (1.0 - rf) + c100[i] * rf;
            let c01 = c001[i] * (1.0 - rf) + c101[i] * rf;
            let c10 = c010[i] * (1.0 - rf) + c110[i] * rf;
            let c11 = c011[i] * (1.0 - rf) + c111[i] * rf;

            let c0 = c00 * (1.0 - gf) + c10 * gf;
            let c1 = c01 * (1.0 - gf) + c11 * gf;

            result[i] = c0 * (1.0 - bf) + c1 * bf;
        }

        result
    }

    /// Human-readable description: grid size, entry count, memory use.
    pub fn describe(&self) -> String {
        let entries = self.entry_count();
        let kib = entries * 3 * std::mem::size_of::<f32>() / 1024;
        match &self.title {
            Some(t) => format!(
                "{t}: {0}x{0}x{0}, {entries} entries, {kib} KiB",
                self.size
            ),
            None => format!("{0}x{0}x{0}, {entries} entries, {kib} KiB", self.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity() {
        let lut = Lut3D::identity(17);
        let result = lut.apply([0.5, 0.3, 0.8]);
        assert_relative_eq!(result[0], 0.5, epsilon = 0.01);
        assert_relative_eq!(result[1], 0.3, epsilon = 0.01);
        assert_relative_eq!(result[2], 0.8, epsilon = 0.01);
    }

    #[test]
    fn test_corners() {
        let lut = Lut3D::identity(33);

        let black = lut.apply([0.0, 0.0, 0.0]);
        assert!(black[0].abs() < 0.01);

        let white = lut.apply([1.0, 1.0, 1.0]);
        assert_relative_eq!(white[0], 1.0, epsilon = 0.01);

        let red = lut.apply([1.0, 0.0, 0.0]);
        assert_relative_eq!(red[0], 1.0, epsilon = 0.01);
        assert!(red[1].abs() < 0.01);
    }

    #[test]
    fn test_out_of_range_clamped() {
        let lut = Lut3D::identity(8);
        let over = lut.apply([1.5, -0.5, 2.0]);
        assert_relative_eq!(over[0], 1.0, epsilon = 1e-6);
        assert!(over[1].abs() < 1e-6);
        assert_relative_eq!(over[2], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_from_data() {
        let data: Vec<[f32; 3]> = (0..8).map(|_| [0.5, 0.5, 0.5]).collect();
        let lut = Lut3D::from_data(data, 2).unwrap();
        let result = lut.apply([0.25, 0.75, 0.5]);
        assert_eq!(result, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_from_data_wrong_count() {
        let data: Vec<[f32; 3]> = (0..7).map(|_| [0.0; 3]).collect();
        assert!(matches!(
            Lut3D::from_data(data, 2),
            Err(LutError::InvalidSize(_))
        ));
    }

    #[test]
    fn test_degenerate_size_rejected() {
        assert!(Lut3D::from_data(vec![[0.0; 3]], 1).is_err());
    }

    #[test]
    fn test_describe() {
        let lut = Lut3D::identity(2).with_title("test look");
        let desc = lut.describe();
        assert!(desc.contains("test look"));
        assert!(desc.contains("2x2x2"));
        assert!(desc.contains("8 entries"));
    }
}
