//! TIFF image format support
//!
//! Reads the first page of single-image files with 8- or 16-bit gray, gray
//! with alpha, RGB or RGBA samples, and 1-bit bilevel images. 16-bit
//! samples keep their high byte; alpha is dropped. Writes uncompressed
//! 8-bit gray or RGB.

use crate::{IoError, IoResult};
use edgebench_core::{Pix, PixelDepth};
use std::io::{Cursor, Read, Seek, Write};
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::TiffEncoder;
use tiff::encoder::colortype::{Gray8, RGB8};
use tiff::tags::Tag;

/// PhotometricInterpretation value for inverted grayscale
const WHITE_IS_ZERO: u32 = 0;

fn decode_err(what: &str, e: tiff::TiffError) -> IoError {
    IoError::DecodeError(format!("TIFF {}: {}", what, e))
}

/// Read a TIFF image
pub fn read_tiff<R: Read + Seek>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader).map_err(|e| decode_err("header", e))?;
    let (width, height) = decoder
        .dimensions()
        .map_err(|e| decode_err("dimensions", e))?;
    let color_type = decoder
        .colortype()
        .map_err(|e| decode_err("color type", e))?;
    let white_is_zero = decoder
        .get_tag_u32(Tag::PhotometricInterpretation)
        .is_ok_and(|v| v == WHITE_IS_ZERO);

    let (depth, channels) = match color_type {
        ColorType::Gray(1 | 8 | 16) => (PixelDepth::Bit8, 1),
        ColorType::GrayA(8 | 16) => (PixelDepth::Bit8, 2),
        ColorType::RGB(8 | 16) => (PixelDepth::Bit32, 3),
        ColorType::RGBA(8 | 16) => (PixelDepth::Bit32, 4),
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "TIFF color type {:?}",
                other
            )));
        }
    };

    let samples = match decoder
        .read_image()
        .map_err(|e| decode_err("image data", e))?
    {
        DecodingResult::U8(data) => data,
        DecodingResult::U16(data) => data.iter().map(|&v| (v >> 8) as u8).collect(),
        _ => {
            return Err(IoError::UnsupportedFormat(
                "TIFF sample format other than unsigned integer".to_string(),
            ));
        }
    };

    let mut data = if matches!(color_type, ColorType::Gray(1)) {
        unpack_bilevel(&samples, width, height)?
    } else {
        let needed = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels))
            .filter(|&n| n <= samples.len())
            .ok_or_else(|| IoError::InvalidData("short TIFF strip data".to_string()))?;
        let keep = depth.spp() as usize;
        if keep == channels {
            samples[..needed].to_vec()
        } else {
            samples[..needed]
                .chunks_exact(channels)
                .flat_map(|px| px[..keep].iter().copied())
                .collect()
        }
    };

    if white_is_zero && depth == PixelDepth::Bit8 {
        data.iter_mut().for_each(|v| *v = !*v);
    }

    Ok(Pix::from_raw(width, height, depth, data)?)
}

/// Expand 1-bit rows (padded to whole bytes) to 0/255 samples.
fn unpack_bilevel(packed: &[u8], width: u32, height: u32) -> IoResult<Vec<u8>> {
    let row_bytes = width.div_ceil(8) as usize;
    if packed.len() < row_bytes * height as usize {
        return Err(IoError::InvalidData("short TIFF bilevel data".to_string()));
    }
    let mut data = Vec::with_capacity(width as usize * height as usize);
    for row in packed.chunks_exact(row_bytes).take(height as usize) {
        for x in 0..width as usize {
            let bit = (row[x / 8] >> (7 - x % 8)) & 1;
            data.push(if bit != 0 { 255 } else { 0 });
        }
    }
    Ok(data)
}

/// Write an uncompressed TIFF image.
///
/// The encoder needs to seek, so the file is assembled in memory first.
pub fn write_tiff<W: Write>(pix: &Pix, mut writer: W) -> IoResult<()> {
    let encode_err = |e: tiff::TiffError| IoError::EncodeError(format!("TIFF write error: {}", e));
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut buf).map_err(encode_err)?;
        match pix.depth() {
            PixelDepth::Bit8 => {
                encoder.write_image::<Gray8>(pix.width(), pix.height(), pix.data())
            }
            PixelDepth::Bit32 => {
                encoder.write_image::<RGB8>(pix.width(), pix.height(), pix.data())
            }
        }
        .map_err(encode_err)?;
    }
    writer.write_all(buf.get_ref())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiff_roundtrip_gray() {
        let data: Vec<u8> = (0..12).map(|v| v * 20).collect();
        let pix = Pix::from_raw(4, 3, PixelDepth::Bit8, data).unwrap();
        let mut buf = Vec::new();
        write_tiff(&pix, &mut buf).unwrap();
        assert!(buf.starts_with(b"II*\0") || buf.starts_with(b"MM\0*"));
        let back = read_tiff(Cursor::new(buf)).unwrap();
        assert_eq!(back.depth(), PixelDepth::Bit8);
        assert_eq!(back.data(), pix.data());
    }

    #[test]
    fn test_tiff_roundtrip_rgb() {
        let data: Vec<u8> = (0..18).map(|v| v * 13).collect();
        let pix = Pix::from_raw(3, 2, PixelDepth::Bit32, data).unwrap();
        let mut buf = Vec::new();
        write_tiff(&pix, &mut buf).unwrap();
        let back = read_tiff(Cursor::new(buf)).unwrap();
        assert_eq!(back.depth(), PixelDepth::Bit32);
        assert_eq!(back.data(), pix.data());
    }

    #[test]
    fn test_unpack_bilevel() {
        let data = unpack_bilevel(&[0b1010_0000, 0b0110_0000], 3, 2).unwrap();
        assert_eq!(data, vec![255, 0, 255, 0, 255, 255]);
        assert!(unpack_bilevel(&[0], 3, 2).is_err());
    }

    #[test]
    fn test_tiff_garbage() {
        assert!(read_tiff(Cursor::new(b"II*\0garbage".to_vec())).is_err());
    }
}
