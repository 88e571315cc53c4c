//! Depth conversion and tonal inversion

use super::{Pix, PixelDepth};
use crate::color;
use crate::error::Result;

/// Round to nearest (ties to even) and saturate into `0..=255`.
///
/// Matches the rounding used when float intermediates are stored back
/// into 8-bit images.
#[inline]
pub fn saturate_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round_ties_even().clamp(0.0, 255.0) as u8
}

impl Pix {
    /// Convert to 8-bit grayscale.
    ///
    /// Color images are reduced with BT.601 luma weights; grayscale images
    /// are returned as a shared clone.
    pub fn convert_to_gray(&self) -> Result<Pix> {
        match self.depth() {
            PixelDepth::Bit8 => Ok(self.clone()),
            PixelDepth::Bit32 => {
                let data = self
                    .data()
                    .chunks_exact(3)
                    .map(|px| color::luma(px[0], px[1], px[2]))
                    .collect();
                Pix::from_raw(self.width(), self.height(), PixelDepth::Bit8, data)
            }
        }
    }

    /// Expand a grayscale image to RGB; color images are returned as a clone.
    pub fn convert_to_color(&self) -> Result<Pix> {
        match self.depth() {
            PixelDepth::Bit32 => Ok(self.clone()),
            PixelDepth::Bit8 => {
                let data = self.data().iter().flat_map(|&v| [v, v, v]).collect();
                Pix::from_raw(self.width(), self.height(), PixelDepth::Bit32, data)
            }
        }
    }

    /// Bitwise tonal inverse: every sample `v` becomes `255 - v`.
    pub fn invert(&self) -> Pix {
        let mut pm = self.to_mut();
        for s in pm.data_mut() {
            *s = !*s;
        }
        pm.into()
    }
}
