//! Pixel arithmetic between two images

use super::Pix;
use super::convert::saturate_u8;
use crate::error::{Error, Result};

/// Weighted sum `alpha * a + beta * b + gamma`, saturated to 8 bits.
///
/// Both images must have the same geometry and depth.
pub fn add_weighted(a: &Pix, alpha: f32, b: &Pix, beta: f32, gamma: f32) -> Result<Pix> {
    check_same_shape(a, b)?;
    let data = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&va, &vb)| saturate_u8(va as f32 * alpha + vb as f32 * beta + gamma))
        .collect();
    Pix::from_raw(a.width(), a.height(), a.depth(), data)
}

pub(crate) fn check_same_shape(a: &Pix, b: &Pix) -> Result<()> {
    if !a.sizes_equal(b) {
        return Err(Error::DimensionMismatch {
            expected: (a.width(), a.height()),
            actual: (b.width(), b.height()),
        });
    }
    if a.depth() != b.depth() {
        return Err(Error::UnsupportedDepth(b.depth().bits()));
    }
    Ok(())
}
