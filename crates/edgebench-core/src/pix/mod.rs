//! PIX - The main image container
//!
//! A `Pix` is a 2-D grid of 8-bit samples, either one sample per pixel
//! (grayscale, [`PixelDepth::Bit8`]) or three interleaved RGB samples per
//! pixel (color, [`PixelDepth::Bit32`]).
//!
//! # Pixel layout
//!
//! - Samples are stored row-major with no row padding
//! - Color pixels are stored as `R, G, B` byte triples
//!
//! # Ownership model
//!
//! `Pix` uses `Arc` for cheap cloning (shared ownership). To modify pixel
//! data, convert to `PixMut` via [`Pix::try_into_mut`] or [`Pix::to_mut`],
//! then convert back with `Into<Pix>`.

mod access;
pub mod arith;
pub mod convert;
mod mask;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Pixel depth (bits per pixel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelDepth {
    /// 8-bit grayscale
    Bit8 = 8,
    /// 24-bit RGB held in a 32-bit pixel word
    Bit32 = 32,
}

impl PixelDepth {
    /// Create `PixelDepth` from a raw bit count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`] if `bits` is not 8 or 32.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(PixelDepth::Bit8),
            32 => Ok(PixelDepth::Bit32),
            _ => Err(Error::InvalidDepth(bits)),
        }
    }

    /// Get the number of bits per pixel.
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Samples stored per pixel at this depth.
    pub fn spp(self) -> u32 {
        match self {
            PixelDepth::Bit8 => 1,
            PixelDepth::Bit32 => 3,
        }
    }
}

/// Image file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    /// Unknown format
    #[default]
    Unknown,
    /// JFIF JPEG format
    Jpeg,
    /// PNG format
    Png,
    /// Binary PNM (PGM/PPM)
    Pnm,
    /// Windows bitmap
    Bmp,
    /// TIFF
    Tiff,
}

impl ImageFormat {
    /// Get the canonical file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Unknown => "dat",
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Pnm => "pnm",
            Self::Bmp => "bmp",
            Self::Tiff => "tif",
        }
    }

    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "jpe" | "jfif" => Self::Jpeg,
            "png" => Self::Png,
            "pnm" | "pgm" | "ppm" => Self::Pnm,
            "bmp" | "dib" => Self::Bmp,
            "tif" | "tiff" => Self::Tiff,
            _ => Self::Unknown,
        }
    }

    /// Whether the encoding discards information.
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg)
    }
}

/// Internal PIX data
#[derive(Debug)]
struct PixData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Depth in bits per pixel
    depth: PixelDepth,
    /// Format the image was decoded from
    informat: ImageFormat,
    /// Sample data, row-major
    data: Vec<u8>,
}

impl PixData {
    fn copy(&self) -> Self {
        PixData {
            width: self.width,
            height: self.height,
            depth: self.depth,
            informat: self.informat,
            data: self.data.clone(),
        }
    }
}

/// PIX - Main image container
///
/// # Examples
///
/// ```
/// use edgebench_core::{Pix, PixelDepth};
///
/// let pix = Pix::new(640, 480, PixelDepth::Bit32).unwrap();
/// assert_eq!(pix.spp(), 3);
/// assert_eq!(pix.data().len(), 640 * 480 * 3);
/// ```
#[derive(Debug, Clone)]
pub struct Pix {
    inner: Arc<PixData>,
}

impl Pix {
    /// Create a new PIX with the specified dimensions and depth.
    ///
    /// The image data is initialized to zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0, or if
    /// the sample count overflows.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = Self::sample_len(width, height, depth)?;
        Ok(Self::from_data(PixData {
            width,
            height,
            depth,
            informat: ImageFormat::Unknown,
            data: vec![0u8; len],
        }))
    }

    /// Wrap an existing sample buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for a zero-sized image and
    /// [`Error::BufferLength`] when `data` does not hold exactly
    /// `width * height * spp` samples.
    pub fn from_raw(width: u32, height: u32, depth: PixelDepth, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = Self::sample_len(width, height, depth)?;
        if data.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self::from_data(PixData {
            width,
            height,
            depth,
            informat: ImageFormat::Unknown,
            data,
        }))
    }

    fn from_data(data: PixData) -> Self {
        Pix {
            inner: Arc::new(data),
        }
    }

    fn sample_len(width: u32, height: u32, depth: PixelDepth) -> Result<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(depth.spp() as usize))
            .filter(|&n| n <= isize::MAX as usize)
            .ok_or(Error::InvalidDimension { width, height })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Samples per pixel (1 for grayscale, 3 for RGB).
    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.depth.spp()
    }

    /// Format this image was decoded from, if any.
    pub fn informat(&self) -> ImageFormat {
        self.inner.informat
    }

    /// Raw sample data.
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Number of `Pix` handles sharing this buffer.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row_data(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.inner.data[start..start + stride]
    }

    /// Samples per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.width as usize * self.spp() as usize
    }

    /// True if both images have the same width and height.
    pub fn sizes_equal(&self, other: &Pix) -> bool {
        self.inner.width == other.inner.width && self.inner.height == other.inner.height
    }

    /// Create a zeroed image with the same geometry and depth.
    pub fn create_template(&self) -> Self {
        Self::from_data(PixData {
            width: self.inner.width,
            height: self.inner.height,
            depth: self.inner.depth,
            informat: self.inner.informat,
            data: vec![0u8; self.inner.data.len()],
        })
    }

    /// Create a deep copy of this PIX.
    ///
    /// Unlike `clone()` which shares data via Arc, this creates
    /// a completely independent copy.
    pub fn deep_clone(&self) -> Self {
        Self::from_data(self.inner.copy())
    }

    /// Try to get mutable access to the image data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<PixMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(PixMut { inner: data }),
            Err(arc) => Err(Pix { inner: arc }),
        }
    }

    /// Create a mutable copy of this PIX.
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: self.inner.copy(),
        }
    }

    /// Mutable access without a copy when this handle is the only owner.
    pub fn into_mut(self) -> PixMut {
        match self.try_into_mut() {
            Ok(pix_mut) => pix_mut,
            Err(shared) => shared.to_mut(),
        }
    }
}

/// Mutable PIX
///
/// Allows modification of image data. Convert back to an immutable
/// [`Pix`] using `Into<Pix>`.
#[derive(Debug)]
pub struct PixMut {
    inner: PixData,
}

impl PixMut {
    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Samples per pixel.
    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.depth.spp()
    }

    /// Record the format the samples were decoded from.
    pub fn set_informat(&mut self, format: ImageFormat) {
        self.inner.informat = format;
    }

    /// Raw sample data.
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Mutable raw sample data.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }

    /// Mutable samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row_data_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.inner.width as usize * self.spp() as usize;
        let start = y as usize * stride;
        &mut self.inner.data[start..start + stride]
    }

    /// Set every sample to zero.
    pub fn clear(&mut self) {
        self.inner.data.fill(0);
    }
}

impl From<PixMut> for Pix {
    fn from(pix_mut: PixMut) -> Self {
        Pix {
            inner: Arc::new(pix_mut.inner),
        }
    }
}
