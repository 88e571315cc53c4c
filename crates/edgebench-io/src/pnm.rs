//! PNM (Portable Any Map) format support
//!
//! Reads and writes PGM (P5 binary) and PPM (P6 binary) with a maximum
//! sample value of 255. Comment lines in the header are skipped.

use crate::{IoError, IoResult};
use edgebench_core::{Pix, PixelDepth};
use std::io::{BufRead, Read, Write};

/// Read a PNM image (P5/P6) from a reader.
pub fn read_pnm<R: BufRead>(mut reader: R) -> IoResult<Pix> {
    let magic = next_token(&mut reader)?;
    let depth = match magic.as_str() {
        "P5" => PixelDepth::Bit8,
        "P6" => PixelDepth::Bit32,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNM variant: {}",
                other
            )));
        }
    };
    let width = parse_header_value(&next_token(&mut reader)?)?;
    let height = parse_header_value(&next_token(&mut reader)?)?;
    let maxval = parse_header_value(&next_token(&mut reader)?)?;
    if maxval != 255 {
        return Err(IoError::UnsupportedFormat(format!(
            "PNM maxval {} (only 255 supported)",
            maxval
        )));
    }

    let len = raster_len(width, height, depth)?;
    let mut data = Vec::new();
    reader.take(len as u64).read_to_end(&mut data)?;
    if data.len() != len {
        return Err(IoError::InvalidData(format!(
            "truncated PNM raster: expected {} bytes, got {}",
            len,
            data.len()
        )));
    }
    Ok(Pix::from_raw(width, height, depth, data)?)
}

/// Sample count claimed by a header, rejected if it does not fit in memory.
fn raster_len(width: u32, height: u32, depth: PixelDepth) -> IoResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(depth.spp() as usize))
        .filter(|&n| n <= isize::MAX as usize)
        .ok_or_else(|| {
            IoError::InvalidData(format!("PNM dimensions {}x{} are too large", width, height))
        })
}

/// Write a `Pix` as binary PNM: P5 for grayscale, P6 for RGB.
pub fn write_pnm<W: Write>(pix: &Pix, mut writer: W) -> IoResult<()> {
    let magic = match pix.depth() {
        PixelDepth::Bit8 => "P5",
        PixelDepth::Bit32 => "P6",
    };
    write!(writer, "{}\n{} {}\n255\n", magic, pix.width(), pix.height())?;
    writer.write_all(pix.data())?;
    writer.flush()?;
    Ok(())
}

/// Read the next whitespace-delimited header token.
///
/// Consumes exactly one whitespace byte after the token, which is what
/// separates the maxval from the raster.
fn next_token<R: BufRead>(reader: &mut R) -> IoResult<String> {
    let mut token = String::new();
    let mut byte = [0u8; 1];
    loop {
        if reader.read(&mut byte)? == 0 {
            if token.is_empty() {
                return Err(IoError::InvalidData("truncated PNM header".to_string()));
            }
            return Ok(token);
        }
        let c = byte[0];
        if c == b'#' && token.is_empty() {
            let mut comment = Vec::new();
            reader.read_until(b'\n', &mut comment)?;
            continue;
        }
        if c.is_ascii_whitespace() {
            if token.is_empty() {
                continue;
            }
            return Ok(token);
        }
        token.push(c as char);
    }
}

fn parse_header_value(token: &str) -> IoResult<u32> {
    token
        .parse()
        .map_err(|_| IoError::InvalidData(format!("bad PNM header value: {:?}", token)))
}
