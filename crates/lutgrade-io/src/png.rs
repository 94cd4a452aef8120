//! PNG reading and writing.
//!
//! Reads 8-bit PNGs in any of the common color types, expanding them to
//! RGBA. 16-bit files are truncated to 8 bits on read. Writes are always
//! 8-bit RGBA with an sRGB chunk.

use crate::{IoError, IoResult};
use lutgrade_core::ImageBuf;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Reads a PNG file into an RGBA buffer.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageBuf> {
    let file = File::open(path.as_ref())?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    let bytes = &buf[..info.buffer_size()];

    let rgba: Vec<u8> = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgba, png::BitDepth::Eight) => bytes.to_vec(),
        (png::ColorType::Rgb, png::BitDepth::Eight) => bytes
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect(),
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            bytes.iter().flat_map(|&g| [g, g, g, 255]).collect()
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => bytes
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        (png::ColorType::Rgba, png::BitDepth::Sixteen) => bytes
            .chunks_exact(2)
            .map(|be| be[0]) // high byte
            .collect(),
        (png::ColorType::Rgb, png::BitDepth::Sixteen) => bytes
            .chunks_exact(6)
            .flat_map(|rgb| [rgb[0], rgb[2], rgb[4], 255])
            .collect(),
        (color_type, bit_depth) => {
            return Err(IoError::DecodeError(format!(
                "unsupported PNG layout: {color_type:?} {bit_depth:?}"
            )));
        }
    };

    Ok(ImageBuf::from_raw(info.width, info.height, rgba)?)
}

/// Writes an RGBA buffer as an 8-bit PNG.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageBuf) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(image.as_bytes())
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(())
}
