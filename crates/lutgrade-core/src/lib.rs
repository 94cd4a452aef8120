//! # lutgrade-core
//!
//! Core types for the lutgrade color grading pipeline.
//!
//! This crate provides the foundational types used throughout lutgrade:
//!
//! - [`ImageBuf`] - Owned 8-bit RGBA image buffer
//! - [`Error`] - Unified error type for buffer operations
//!
//! ## Design
//!
//! The grading engine works on display-referred 8-bit RGBA throughout
//! (the format photographs arrive in and leave as), so the buffer type is
//! deliberately concrete: interleaved RGBA8, row-major, top-to-bottom.
//!
//! ```text
//! Memory: [R G B A R G B A ...]  <- Row 0
//!         [R G B A R G B A ...]  <- Row 1
//! ```
//!
//! ## Crate Structure
//!
//! This crate is the foundation and has no internal dependencies.
//! All other lutgrade crates depend on it:
//!
//! ```text
//! lutgrade-core (this crate)
//!    ^
//!    |
//!    +-- lutgrade-lut (LUT types and parsing)
//!    +-- lutgrade-engine (grading, backends, scheduling)
//!    +-- lutgrade-io (image I/O)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;

pub use error::{Error, Result};
pub use image::{ImageBuf, Rgba8, CHANNELS};
