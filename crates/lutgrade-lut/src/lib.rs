//! # lutgrade-lut
//!
//! 3D Look-Up Table types and parsing for the lutgrade grading pipeline.
//!
//! # LUT Model
//!
//! A [`Lut3D`] is an N x N x N cube of RGB triples in normalized [0, 1]
//! range (N typically 32 or 64). Grading samples the cube with trilinear
//! interpolation; query coordinates outside the grid are clamped, never
//! wrapped.
//!
//! # Supported Formats
//!
//! - `.cube` - Adobe/Resolve LUT format ([`cube`] module). Streams without
//!   a `LUT_3D_SIZE` header are accepted when their triple count is a
//!   perfect cube.
//! - `.3dl` - Autodesk/Assimilate integer LUTs ([`threedl`] module).
//!
//! # The Store
//!
//! [`LutStore`] owns at most two loaded LUTs (primary, secondary) behind
//! `Arc` so a grading task can snapshot them at submission time without
//! racing a concurrent reload.
//!
//! # Usage
//!
//! ```rust
//! use lutgrade_lut::{Lut3D, LutStore};
//!
//! let lut = Lut3D::identity(33);
//! let rgb = lut.apply([0.5, 0.3, 0.2]);
//!
//! let mut store = LutStore::new();
//! assert!(store.primary().is_none());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod lut3d;
mod store;
pub mod cube;
pub mod threedl;

pub use error::{LutError, LutResult};
pub use lut3d::Lut3D;
pub use store::{LutSnapshot, LutStore};
