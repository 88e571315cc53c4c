//! Masked copies

use super::{Pix, PixelDepth};
use crate::error::{Error, Result};

impl Pix {
    /// Copy this image through an 8-bit mask.
    ///
    /// Output pixels take this image's value wherever `mask` is non-zero
    /// and are zero elsewhere.
    pub fn copy_masked(&self, mask: &Pix) -> Result<Pix> {
        if mask.depth() != PixelDepth::Bit8 {
            return Err(Error::UnsupportedDepth(mask.depth().bits()));
        }
        if !self.sizes_equal(mask) {
            return Err(Error::DimensionMismatch {
                expected: (self.width(), self.height()),
                actual: (mask.width(), mask.height()),
            });
        }

        let spp = self.spp() as usize;
        let mut out = self.create_template().into_mut();
        for ((dst, src), &m) in out
            .data_mut()
            .chunks_exact_mut(spp)
            .zip(self.data().chunks_exact(spp))
            .zip(mask.data())
        {
            if m != 0 {
                dst.copy_from_slice(src);
            }
        }
        Ok(out.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_masked() {
        let src = Pix::from_raw(4, 1, PixelDepth::Bit8, vec![10, 20, 30, 40]).unwrap();
        let mask = Pix::from_raw(4, 1, PixelDepth::Bit8, vec![0, 255, 0, 1]).unwrap();
        let out = src.copy_masked(&mask).unwrap();
        assert_eq!(out.data(), &[0, 20, 0, 40]);
    }

    #[test]
    fn test_copy_masked_rejects_color_mask() {
        let src = Pix::new(2, 2, PixelDepth::Bit8).unwrap();
        let mask = Pix::new(2, 2, PixelDepth::Bit32).unwrap();
        assert!(src.copy_masked(&mask).is_err());
    }
}
