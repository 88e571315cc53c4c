//! edgebench-io - Image I/O
//!
//! Reads input images by sniffing their magic bytes and writes output
//! images in the format implied by the target file extension.
//!
//! | format | read | write | feature |
//! |---|---|---|---|
//! | PNG | yes | yes | `png-format` |
//! | JPEG | yes | yes (quality 1-100) | `jpeg` |
//! | PNM (P5/P6) | yes | yes | `pnm` |
//! | BMP | 1/4/8/24/32 bpp, uncompressed | 8-bit gray, 24-bit RGB | `bmp` |
//! | TIFF | 1/8/16-bit gray, RGB(A), first page | uncompressed | `tiff-format` |

#[cfg(feature = "bmp")]
pub mod bmp;
mod error;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;
#[cfg(feature = "tiff-format")]
pub mod tiff;

pub use edgebench_core::ImageFormat;
pub use error::{IoError, IoResult};
pub use format::{detect_format_from_bytes, format_from_path};

use edgebench_core::Pix;
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

/// Encoder settings for [`write_image_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// JPEG quality, 1..=100. Ignored for lossless formats.
    pub jpeg_quality: u8,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { jpeg_quality: 100 }
    }
}

/// Read an image from a file path.
///
/// The decoded image records its source format in [`Pix::informat`].
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let bytes = std::fs::read(path)?;
    read_image_mem(&bytes)
}

/// Decode an image held in memory.
pub fn read_image_mem(bytes: &[u8]) -> IoResult<Pix> {
    let format = detect_format_from_bytes(bytes)?;
    let pix = match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(Cursor::new(bytes))?,
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(bytes)?,
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::read_pnm(Cursor::new(bytes))?,
        #[cfg(feature = "bmp")]
        ImageFormat::Bmp => bmp::read_bmp(bytes)?,
        #[cfg(feature = "tiff-format")]
        ImageFormat::Tiff => tiff::read_tiff(Cursor::new(bytes))?,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "reading {:?} is not enabled",
                other
            )));
        }
    };
    let mut pm = pix.into_mut();
    pm.set_informat(format);
    Ok(pm.into())
}

/// Write an image to a file path with default options.
pub fn write_image<P: AsRef<Path>>(pix: &Pix, path: P, format: ImageFormat) -> IoResult<()> {
    write_image_with(pix, path, format, &WriteOptions::default())
}

/// Write an image to a file path.
///
/// The file is created (or truncated) before encoding starts, so an
/// encoder failure can leave a partial file behind.
pub fn write_image_with<P: AsRef<Path>>(
    pix: &Pix,
    path: P,
    format: ImageFormat,
    options: &WriteOptions,
) -> IoResult<()> {
    if format == ImageFormat::Unknown {
        return Err(IoError::UnsupportedFormat(format!(
            "no encoder for {}",
            path.as_ref().display()
        )));
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_image_to(pix, &mut writer, format, options)?;
    writer.flush()?;
    Ok(())
}

/// Encode an image into any writer.
pub fn write_image_to<W: Write>(
    pix: &Pix,
    writer: W,
    format: ImageFormat,
    options: &WriteOptions,
) -> IoResult<()> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(pix, writer),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::write_jpeg(pix, writer, options.jpeg_quality),
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::write_pnm(pix, writer),
        #[cfg(feature = "bmp")]
        ImageFormat::Bmp => bmp::write_bmp(pix, writer),
        #[cfg(feature = "tiff-format")]
        ImageFormat::Tiff => tiff::write_tiff(pix, writer),
        other => Err(IoError::UnsupportedFormat(format!(
            "writing {:?} is not enabled",
            other
        ))),
    }
}
