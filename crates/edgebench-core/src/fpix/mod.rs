//! FPix - Floating-point image
//!
//! `FPix` is a 2D array of `f32` values, used for intermediate results
//! (derivatives, filter responses) that do not fit in 8 bits.
//!
//! # Examples
//!
//! ```
//! use edgebench_core::FPix;
//!
//! let mut fpix = FPix::new(100, 100).unwrap();
//! fpix.set_pixel(10, 20, -0.5).unwrap();
//! assert_eq!(fpix.get_pixel(10, 20).unwrap(), -0.5);
//! assert_eq!(fpix.min_max(), (-0.5, 0.0));
//! ```

use crate::error::{Error, Result};
use crate::pix::convert::saturate_u8;
use crate::pix::{Pix, PixelDepth};

/// How to handle negative values when converting FPix to Pix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativeHandling {
    /// Clip negative values to zero
    #[default]
    ClipToZero,
    /// Take the absolute value
    TakeAbsValue,
}

/// Floating-point image
///
/// Data is stored in row-major order with no padding. The pixel at (x, y)
/// is at index `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct FPix {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl FPix {
    /// Create a new FPix with all pixels set to zero
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let size = (width as usize) * (height as usize);
        Ok(FPix {
            width,
            height,
            data: vec![0.0f32; size],
        })
    }

    /// Create a FPix from raw data
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferLength` if `data.len() != width * height`.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(FPix {
            width,
            height,
            data,
        })
    }

    /// Lift an 8-bit grayscale image into floating point.
    pub fn from_pix(pix: &Pix) -> Result<Self> {
        if pix.depth() != PixelDepth::Bit8 {
            return Err(Error::UnsupportedDepth(pix.depth().bits()));
        }
        let data = pix.data().iter().map(|&v| v as f32).collect();
        Self::from_data(pix.width(), pix.height(), data)
    }

    /// Width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel data, row-major
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable pixel data, row-major
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Get the value at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<f32> {
        let idx = self.index(x, y)?;
        Ok(self.data[idx])
    }

    /// Set the value at (x, y)
    pub fn set_pixel(&mut self, x: u32, y: u32, value: f32) -> Result<()> {
        let idx = self.index(x, y)?;
        self.data[idx] = value;
        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::InvalidParameter(format!(
                "pixel ({x}, {y}) outside {}x{}",
                self.width, self.height
            )));
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    /// Smallest and largest value.
    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Linearly rescale so the minimum maps to `lo` and the maximum to `hi`.
    ///
    /// A constant image has no range to stretch and maps to `lo` everywhere.
    pub fn normalize_min_max(&self, lo: f32, hi: f32) -> FPix {
        let (min, max) = self.min_max();
        let range = max - min;
        let data = if range > f32::EPSILON {
            let scale = (hi - lo) / range;
            self.data.iter().map(|&v| (v - min) * scale + lo).collect()
        } else {
            vec![lo; self.data.len()]
        };
        FPix {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Convert to an 8-bit grayscale image, computing `v * scale + delta`
    /// before saturation.
    pub fn to_pix(&self, scale: f32, delta: f32, neg: NegativeHandling) -> Result<Pix> {
        let data = self
            .data
            .iter()
            .map(|&v| {
                let v = v * scale + delta;
                match neg {
                    NegativeHandling::ClipToZero => saturate_u8(v),
                    NegativeHandling::TakeAbsValue => saturate_u8(v.abs()),
                }
            })
            .collect();
        Pix::from_raw(self.width, self.height, PixelDepth::Bit8, data)
    }

    /// `|v * scale + delta|` saturated to 8 bits.
    pub fn convert_scale_abs(&self, scale: f32, delta: f32) -> Result<Pix> {
        self.to_pix(scale, delta, NegativeHandling::TakeAbsValue)
    }
}
