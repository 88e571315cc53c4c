//! JPEG image format support
//!
//! Decoding uses `jpeg-decoder`, encoding uses `jpeg-encoder`. Grayscale
//! images stay single-channel; CMYK and 16-bit inputs are rejected.

use crate::{IoError, IoResult};
use edgebench_core::{Pix, PixelDepth};
use jpeg_decoder::{Decoder, PixelFormat};
use jpeg_encoder::{ColorType, Encoder};
use std::io::{Read, Write};

/// Highest quality setting accepted by the encoder.
pub const MAX_QUALITY: u8 = 100;

/// Read a JPEG image from a reader.
///
/// Returns an 8-bpp `Pix` for grayscale files and a 32-bpp `Pix` for RGB.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    let data = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;

    let depth = match info.pixel_format {
        PixelFormat::L8 => PixelDepth::Bit8,
        PixelFormat::RGB24 => PixelDepth::Bit32,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported JPEG pixel format: {:?}",
                other
            )));
        }
    };

    Ok(Pix::from_raw(
        info.width as u32,
        info.height as u32,
        depth,
        data,
    )?)
}

/// Write a JPEG image at the given quality (1..=100).
pub fn write_jpeg<W: Write>(pix: &Pix, writer: W, quality: u8) -> IoResult<()> {
    let (width, height) = match (u16::try_from(pix.width()), u16::try_from(pix.height())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(IoError::EncodeError(format!(
                "image {}x{} exceeds JPEG limits",
                pix.width(),
                pix.height()
            )));
        }
    };
    let color_type = match pix.depth() {
        PixelDepth::Bit8 => ColorType::Luma,
        PixelDepth::Bit32 => ColorType::Rgb,
    };

    let encoder = Encoder::new(writer, quality.clamp(1, MAX_QUALITY));
    encoder
        .encode(pix.data(), width, height, color_type)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))
}
