//! Convolution operations
//!
//! Implements correlation of images with arbitrary kernels. Samples
//! outside the image are synthesized by a [`Border`] rule.

use crate::{FilterError, FilterResult, Kernel};
use edgebench_core::pix::convert::saturate_u8;
use edgebench_core::{FPix, Pix, PixelDepth};

/// How samples outside the image boundary are synthesized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Border {
    /// Mirror without repeating the edge sample: `dcb|abcd|cba`
    #[default]
    Reflect101,
    /// Repeat the nearest edge sample: `aaa|abcd|ddd`
    Replicate,
}

impl Border {
    /// Map a possibly out-of-range coordinate into `0..len`.
    #[inline]
    pub fn index(self, i: i64, len: i64) -> usize {
        if len <= 1 {
            return 0;
        }
        match self {
            Border::Replicate => i.clamp(0, len - 1) as usize,
            Border::Reflect101 => {
                let mut i = i;
                // kernels wider than the image need repeated reflection
                loop {
                    if i < 0 {
                        i = -i;
                    } else if i >= len {
                        i = 2 * (len - 1) - i;
                    } else {
                        break i as usize;
                    }
                }
            }
        }
    }
}

/// Correlate one plane of `width * height` samples.
///
/// `sample(x, y)` must accept any in-range coordinate.
fn correlate_plane<F>(
    width: u32,
    height: u32,
    kernel: &Kernel,
    border: Border,
    sample: F,
) -> Vec<f32>
where
    F: Fn(usize, usize) -> f32,
{
    let w = width as i64;
    let h = height as i64;
    let kw = kernel.width() as i64;
    let kh = kernel.height() as i64;
    let kcx = kernel.center_x() as i64;
    let kcy = kernel.center_y() as i64;
    let weights = kernel.data();

    // Column lookups are shared by every row.
    let cols: Vec<Vec<usize>> = (0..w)
        .map(|x| (0..kw).map(|kx| border.index(x + kx - kcx, w)).collect())
        .collect();

    let mut out = Vec::with_capacity((width * height) as usize);
    for y in 0..h {
        let rows: Vec<usize> = (0..kh).map(|ky| border.index(y + ky - kcy, h)).collect();
        for col in &cols {
            let mut sum = 0.0f32;
            for (ky, &sy) in rows.iter().enumerate() {
                let krow = &weights[ky * kw as usize..(ky + 1) * kw as usize];
                for (&k, &sx) in krow.iter().zip(col) {
                    if k != 0.0 {
                        sum += sample(sx, sy) * k;
                    }
                }
            }
            out.push(sum);
        }
    }
    out
}

/// Correlate an 8-bit grayscale image with a kernel, keeping the
/// unclamped floating-point response.
pub fn convolve_gray(pix: &Pix, kernel: &Kernel, border: Border) -> FilterResult<FPix> {
    check_grayscale(pix)?;
    let w = pix.width() as usize;
    let data = pix.data();
    let out = correlate_plane(pix.width(), pix.height(), kernel, border, |x, y| {
        data[y * w + x] as f32
    });
    Ok(FPix::from_data(pix.width(), pix.height(), out)?)
}

/// Correlate a floating-point image with a kernel.
pub fn convolve_fpix(fpix: &FPix, kernel: &Kernel, border: Border) -> FilterResult<FPix> {
    let w = fpix.width() as usize;
    let data = fpix.data();
    let out = correlate_plane(fpix.width(), fpix.height(), kernel, border, |x, y| {
        data[y * w + x]
    });
    Ok(FPix::from_data(fpix.width(), fpix.height(), out)?)
}

/// Correlate an image with a kernel, channel by channel, saturating the
/// result back to 8 bits.
///
/// Works for both grayscale and color images; the output has the
/// input's depth and geometry.
pub fn convolve(pix: &Pix, kernel: &Kernel, border: Border) -> FilterResult<Pix> {
    let spp = pix.spp() as usize;
    let w = pix.width() as usize;
    let data = pix.data();
    let mut out = vec![0u8; data.len()];

    for c in 0..spp {
        let plane = correlate_plane(pix.width(), pix.height(), kernel, border, |x, y| {
            data[(y * w + x) * spp + c] as f32
        });
        for (i, v) in plane.into_iter().enumerate() {
            out[i * spp + c] = saturate_u8(v);
        }
    }

    Ok(Pix::from_raw(pix.width(), pix.height(), pix.depth(), out)?)
}

pub(crate) fn check_grayscale(pix: &Pix) -> FilterResult<()> {
    if pix.depth() != PixelDepth::Bit8 {
        return Err(FilterError::UnsupportedDepth {
            expected: "8-bpp grayscale",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}
