//! JPEG reading and writing.
//!
//! Reads RGB, grayscale and CMYK JPEGs, expanding everything to RGBA
//! with opaque alpha. Writing strips alpha and encodes RGB at a caller
//! chosen quality; this is the lossy path the memory guard protects.

use crate::{IoError, IoResult};
use lutgrade_core::ImageBuf;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Options for writing JPEG files.
#[derive(Debug, Clone, Copy)]
pub struct JpegWriterOptions {
    /// Quality level 1-100. Higher is better quality and larger files.
    pub quality: u8,
}

impl Default for JpegWriterOptions {
    fn default() -> Self {
        Self { quality: 90 }
    }
}

/// Reads a JPEG file into an RGBA buffer.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageBuf> {
    let file = File::open(path.as_ref())?;
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

    let rgba: Vec<u8> = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect(),
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        jpeg_decoder::PixelFormat::L16 => pixels
            .chunks_exact(2)
            .flat_map(|l16| {
                let g = l16[0]; // high byte
                [g, g, g, 255]
            })
            .collect(),
        jpeg_decoder::PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|cmyk| {
                let c = cmyk[0] as f32 / 255.0;
                let m = cmyk[1] as f32 / 255.0;
                let y = cmyk[2] as f32 / 255.0;
                let k = cmyk[3] as f32 / 255.0;
                [
                    ((1.0 - c) * (1.0 - k) * 255.0) as u8,
                    ((1.0 - m) * (1.0 - k) * 255.0) as u8,
                    ((1.0 - y) * (1.0 - k) * 255.0) as u8,
                    255,
                ]
            })
            .collect(),
    };

    Ok(ImageBuf::from_raw(
        info.width as u32,
        info.height as u32,
        rgba,
    )?)
}

/// Encodes an RGBA buffer as JPEG bytes, stripping alpha.
pub fn write_to_memory(image: &ImageBuf, options: &JpegWriterOptions) -> IoResult<Vec<u8>> {
    use jpeg_encoder::{ColorType, Encoder};

    if image.width() > u16::MAX as u32 || image.height() > u16::MAX as u32 {
        return Err(IoError::EncodeError(format!(
            "{}x{} exceeds the JPEG dimension limit",
            image.width(),
            image.height()
        )));
    }

    let rgb: Vec<u8> = image
        .as_bytes()
        .chunks_exact(4)
        .flat_map(|rgba| [rgba[0], rgba[1], rgba[2]])
        .collect();

    let mut buffer = Vec::new();
    let encoder = Encoder::new(&mut buffer, options.quality.clamp(1, 100));
    encoder
        .encode(
            &rgb,
            image.width() as u16,
            image.height() as u16,
            ColorType::Rgb,
        )
        .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;
    Ok(buffer)
}

/// Writes an RGBA buffer to a JPEG file.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageBuf, options: &JpegWriterOptions) -> IoResult<()> {
    let data = write_to_memory(image, options)?;
    std::fs::write(path.as_ref(), data)?;
    Ok(())
}
