//! # lutgrade-io
//!
//! PNG and JPEG reading and writing for graded images, plus format
//! detection. Everything decodes to and encodes from the RGBA8
//! [`ImageBuf`]; conversions between source layouts (RGB, grayscale,
//! CMYK) and RGBA happen at the boundary.

#![warn(missing_docs)]

mod detect;
mod error;
pub mod jpeg;
pub mod png;

pub use detect::Format;
pub use error::{IoError, IoResult};
pub use jpeg::JpegWriterOptions;

use lutgrade_core::ImageBuf;
use std::path::Path;
use tracing::debug;

/// Reads an image, dispatching on the detected format.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageBuf> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    debug!(path = %path.display(), ?format, "reading image");
    match format {
        Format::Png => png::read(path),
        Format::Jpeg => jpeg::read(path),
        Format::Unknown => Err(IoError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Writes an image, dispatching on the target extension.
///
/// `quality` only applies to JPEG output.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageBuf, quality: u8) -> IoResult<()> {
    let path = path.as_ref();
    let format = Format::from_extension(path);
    debug!(path = %path.display(), ?format, "writing image");
    match format {
        Format::Png => png::write(path, image),
        Format::Jpeg => jpeg::write(path, image, &JpegWriterOptions { quality }),
        Format::Unknown => Err(IoError::UnsupportedFormat(path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_roundtrip_png() {
        let mut image = ImageBuf::new(8, 8).unwrap();
        image.fill([5, 6, 7, 255]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        write(&path, &image, 90).unwrap();
        let loaded = read(&path).unwrap();
        assert_eq!(loaded.as_bytes(), image.as_bytes());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let image = ImageBuf::new(2, 2).unwrap();
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            write(dir.path().join("out.bmp"), &image, 90),
            Err(IoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_detect_ignores_misleading_extension() {
        // A PNG saved with a .jpg name still reads as PNG.
        let mut image = ImageBuf::new(4, 4).unwrap();
        image.fill([9, 9, 9, 255]);
        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("real.png");
        png::write(&png_path, &image).unwrap();
        let lying = dir.path().join("lying.jpg");
        std::fs::copy(&png_path, &lying).unwrap();
        let loaded = read(&lying).unwrap();
        assert_eq!(loaded.as_bytes(), image.as_bytes());
    }
}
