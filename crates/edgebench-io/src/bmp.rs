//! BMP image format support
//!
//! Reads uncompressed Windows bitmaps at 1, 4, 8, 24 and 32 bits per
//! pixel. Palette images whose entries are all gray decode to 8-bit
//! grayscale, everything else to RGB; alpha is dropped. Writes 8-bit
//! grayscale with a gray ramp palette and RGB as 24-bit.

use crate::{IoError, IoResult};
use edgebench_core::{Pix, PixelDepth};
use std::io::{self, Read, Write};

/// BMP file header size
const FILE_HEADER_SIZE: usize = 14;

/// BITMAPINFOHEADER size, the smallest info header accepted
const INFO_HEADER_SIZE: u32 = 40;

/// BI_RGB
const COMPRESSION_NONE: u32 = 0;
/// BI_BITFIELDS, accepted for 32-bit files laid out as BGRA
const COMPRESSION_BITFIELDS: u32 = 3;

fn le_u16(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

fn le_u32(b: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fn le_i32(b: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fn skip<R: Read>(reader: &mut R, count: u64) -> IoResult<()> {
    let skipped = io::copy(&mut reader.take(count), &mut io::sink())?;
    if skipped != count {
        return Err(IoError::InvalidData("truncated BMP header".to_string()));
    }
    Ok(())
}

/// Bytes per stored row; rows are padded to 4 bytes.
fn row_stride(width: u32, bits_per_pixel: u16) -> Option<usize> {
    (width as usize)
        .checked_mul(bits_per_pixel as usize)?
        .checked_add(31)
        .map(|bits| bits / 32 * 4)
}

/// Read a BMP image
pub fn read_bmp<R: Read>(mut reader: R) -> IoResult<Pix> {
    let mut file_header = [0u8; FILE_HEADER_SIZE];
    reader.read_exact(&mut file_header)?;
    if &file_header[0..2] != b"BM" {
        return Err(IoError::InvalidData("not a BMP file".to_string()));
    }
    let pixel_offset = le_u32(&file_header, 10) as u64;

    let mut info = [0u8; INFO_HEADER_SIZE as usize];
    reader.read_exact(&mut info)?;
    let header_size = le_u32(&info, 0);
    if header_size < INFO_HEADER_SIZE {
        return Err(IoError::UnsupportedFormat(format!(
            "BMP core header ({} bytes)",
            header_size
        )));
    }
    let raw_width = le_i32(&info, 4);
    let raw_height = le_i32(&info, 8);
    let planes = le_u16(&info, 12);
    let bits_per_pixel = le_u16(&info, 14);
    let compression = le_u32(&info, 16);
    let colors_used = le_u32(&info, 32);

    if planes != 1 {
        return Err(IoError::InvalidData(format!(
            "unsupported number of planes: {}",
            planes
        )));
    }
    let compression_ok = compression == COMPRESSION_NONE
        || (compression == COMPRESSION_BITFIELDS && bits_per_pixel == 32);
    if !compression_ok {
        return Err(IoError::UnsupportedFormat(format!(
            "BMP compression {} at {} bpp",
            compression, bits_per_pixel
        )));
    }
    if !matches!(bits_per_pixel, 1 | 4 | 8 | 24 | 32) {
        return Err(IoError::UnsupportedFormat(format!(
            "BMP bit depth {}",
            bits_per_pixel
        )));
    }
    if raw_width <= 0 || raw_height == 0 {
        return Err(IoError::InvalidData(format!(
            "BMP dimensions {}x{}",
            raw_width, raw_height
        )));
    }
    let width = raw_width.unsigned_abs();
    let top_down = raw_height < 0;
    let height = raw_height.unsigned_abs();

    skip(&mut reader, (header_size - INFO_HEADER_SIZE) as u64)?;

    // Palette entries are stored as B, G, R, reserved.
    let palette: Vec<[u8; 3]> = if bits_per_pixel <= 8 {
        let full = 1u32 << bits_per_pixel;
        let count = if colors_used == 0 || colors_used > full {
            full
        } else {
            colors_used
        };
        let mut raw = vec![0u8; count as usize * 4];
        reader.read_exact(&mut raw)?;
        raw.chunks_exact(4).map(|e| [e[2], e[1], e[0]]).collect()
    } else {
        Vec::new()
    };

    let consumed = FILE_HEADER_SIZE as u64 + header_size as u64 + palette.len() as u64 * 4;
    if pixel_offset > consumed {
        skip(&mut reader, pixel_offset - consumed)?;
    }

    let too_large =
        || IoError::InvalidData(format!("BMP dimensions {}x{} are too large", width, height));
    let stride = row_stride(width, bits_per_pixel).ok_or_else(too_large)?;
    let raster_len = stride
        .checked_mul(height as usize)
        .filter(|&n| n <= isize::MAX as usize)
        .ok_or_else(too_large)?;
    let mut raster = Vec::new();
    reader.take(raster_len as u64).read_to_end(&mut raster)?;
    if raster.len() != raster_len {
        return Err(IoError::InvalidData(format!(
            "truncated BMP raster: expected {} bytes, got {}",
            raster_len,
            raster.len()
        )));
    }

    let gray_palette = !palette.is_empty() && palette.iter().all(|&[r, g, b]| r == g && g == b);
    let depth = if gray_palette {
        PixelDepth::Bit8
    } else {
        PixelDepth::Bit32
    };

    let mut data = Vec::with_capacity(width as usize * height as usize * depth.spp() as usize);
    for y in 0..height as usize {
        let src_row = if top_down { y } else { height as usize - 1 - y };
        let row = &raster[src_row * stride..(src_row + 1) * stride];
        for x in 0..width as usize {
            let rgb = match bits_per_pixel {
                1 => lookup(&palette, (row[x / 8] >> (7 - x % 8)) & 1),
                4 => lookup(&palette, (row[x / 2] >> if x % 2 == 0 { 4 } else { 0 }) & 0xf),
                8 => lookup(&palette, row[x]),
                24 => [row[x * 3 + 2], row[x * 3 + 1], row[x * 3]],
                _ => [row[x * 4 + 2], row[x * 4 + 1], row[x * 4]],
            };
            if gray_palette {
                data.push(rgb[0]);
            } else {
                data.extend_from_slice(&rgb);
            }
        }
    }

    Ok(Pix::from_raw(width, height, depth, data)?)
}

/// Out-of-range indices read as black.
fn lookup(palette: &[[u8; 3]], index: u8) -> [u8; 3] {
    palette.get(index as usize).copied().unwrap_or([0, 0, 0])
}

/// Write a BMP image
pub fn write_bmp<W: Write>(pix: &Pix, mut writer: W) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();
    let (bits_per_pixel, palette_len): (u16, usize) = match pix.depth() {
        PixelDepth::Bit8 => (8, 256),
        PixelDepth::Bit32 => (24, 0),
    };

    let too_large = || {
        IoError::EncodeError(format!("image {}x{} exceeds BMP limits", width, height))
    };
    let stride = row_stride(width, bits_per_pixel).ok_or_else(too_large)?;
    let pixel_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE as usize + palette_len * 4;
    let raster_len = stride.checked_mul(height as usize).ok_or_else(too_large)?;
    let file_size = raster_len
        .checked_add(pixel_offset)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(too_large)?;
    let raw_width = i32::try_from(width).map_err(|_| too_large())?;
    let raw_height = i32::try_from(height).map_err(|_| too_large())?;

    // File header
    writer.write_all(b"BM")?;
    writer.write_all(&file_size.to_le_bytes())?;
    writer.write_all(&[0u8; 4])?;
    writer.write_all(&(pixel_offset as u32).to_le_bytes())?;

    // Info header, bottom-up rows
    writer.write_all(&INFO_HEADER_SIZE.to_le_bytes())?;
    writer.write_all(&raw_width.to_le_bytes())?;
    writer.write_all(&raw_height.to_le_bytes())?;
    writer.write_all(&1u16.to_le_bytes())?;
    writer.write_all(&bits_per_pixel.to_le_bytes())?;
    writer.write_all(&COMPRESSION_NONE.to_le_bytes())?;
    writer.write_all(&(raster_len as u32).to_le_bytes())?;
    writer.write_all(&[0u8; 16])?; // resolution, colors used, colors important

    for i in 0..palette_len {
        let v = i as u8;
        writer.write_all(&[v, v, v, 0])?;
    }

    let spp = pix.spp() as usize;
    let mut row_buffer = vec![0u8; stride];
    for y in (0..height).rev() {
        let src = pix.row_data(y);
        if spp == 1 {
            row_buffer[..src.len()].copy_from_slice(src);
        } else {
            for (dst, px) in row_buffer.chunks_exact_mut(3).zip(src.chunks_exact(3)) {
                dst.copy_from_slice(&[px[2], px[1], px[0]]);
            }
        }
        writer.write_all(&row_buffer)?;
    }
    writer.flush()?;
    Ok(())
}
