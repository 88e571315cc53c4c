//! Edge detectors
//!
//! Gradient-based detectors returning 8-bpp edge maps:
//!
//! - [`sobel`]: blended absolute first derivatives
//! - [`laplacian`]: absolute second derivative
//! - [`canny`] / [`canny_masked`]: thin edges with hysteresis, returned as
//!   a masked copy of the source grayscale image

use crate::convolve::{Border, check_grayscale, convolve_gray};
use crate::{FilterError, FilterResult, Kernel};
use edgebench_core::pix::arith::add_weighted;
use edgebench_core::{FPix, Pix, PixelDepth};

/// Scale and offset applied to each Sobel derivative
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SobelParams {
    pub scale: f32,
    pub delta: f32,
}

impl Default for SobelParams {
    fn default() -> Self {
        SobelParams {
            scale: 1.0,
            delta: 0.0,
        }
    }
}

/// Laplacian aperture, scale and offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaplacianParams {
    /// Aperture size, 1 or 3
    pub ksize: u32,
    pub scale: f32,
    pub delta: f32,
}

impl Default for LaplacianParams {
    fn default() -> Self {
        LaplacianParams {
            ksize: 3,
            scale: 1.0,
            delta: 0.0,
        }
    }
}

/// Canny thresholds and gradient aperture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CannyParams {
    /// Lower hysteresis threshold
    pub low_threshold: f32,
    /// Upper threshold is `low_threshold * ratio`
    pub ratio: f32,
    /// Sobel aperture; only 3 is supported
    pub aperture: u32,
}

impl Default for CannyParams {
    fn default() -> Self {
        CannyParams {
            low_threshold: 0.0,
            ratio: 3.0,
            aperture: 3,
        }
    }
}

impl CannyParams {
    /// Upper hysteresis threshold.
    pub fn high_threshold(&self) -> f32 {
        self.low_threshold * self.ratio
    }
}

fn to_gray(pix: &Pix) -> FilterResult<Pix> {
    match pix.depth() {
        PixelDepth::Bit8 => Ok(pix.clone()),
        PixelDepth::Bit32 => Ok(pix.convert_to_gray()?),
    }
}

/// Horizontal and vertical Sobel derivatives of a grayscale image.
pub fn sobel_gradients(gray: &Pix, border: Border) -> FilterResult<(FPix, FPix)> {
    let dx = convolve_gray(gray, &Kernel::sobel_x(), border)?;
    let dy = convolve_gray(gray, &Kernel::sobel_y(), border)?;
    Ok((dx, dy))
}

/// Sobel edge magnitude.
///
/// Color input is reduced to gray first. Each derivative is scaled,
/// offset and absolute-saturated to 8 bits; the two are then averaged.
pub fn sobel(pix: &Pix, params: &SobelParams) -> FilterResult<Pix> {
    let gray = to_gray(pix)?;
    let (dx, dy) = sobel_gradients(&gray, Border::Reflect101)?;
    let abs_x = dx.convert_scale_abs(params.scale, params.delta)?;
    let abs_y = dy.convert_scale_abs(params.scale, params.delta)?;
    Ok(add_weighted(&abs_x, 0.5, &abs_y, 0.5, 0.0)?)
}

/// Laplacian edge magnitude.
///
/// Color input is reduced to gray first; the response is
/// `|v * scale + delta|` saturated to 8 bits.
pub fn laplacian(pix: &Pix, params: &LaplacianParams) -> FilterResult<Pix> {
    let gray = to_gray(pix)?;
    let kernel = Kernel::laplacian(params.ksize)?;
    let response = convolve_gray(&gray, &kernel, Border::Reflect101)?;
    Ok(response.convert_scale_abs(params.scale, params.delta)?)
}

// tan(22.5) and tan(67.5), bounds of the horizontal and vertical sectors
const TAN_22_5: f32 = 0.414_213_57;
const TAN_67_5: f32 = 2.414_213_6;

const NOT_EDGE: u8 = 0;
const WEAK: u8 = 1;
const STRONG: u8 = 2;

/// Canny edge map: 255 on edge pixels, 0 elsewhere.
///
/// Gradients come from 3x3 Sobel kernels with replicated borders and an
/// L1 magnitude. Non-maximum suppression keeps pixels that dominate their
/// neighbors along the quantized gradient direction; hysteresis then keeps
/// weak pixels (magnitude above the low threshold) only when 8-connected
/// to a strong one (above the high threshold).
pub fn canny_edges(gray: &Pix, params: &CannyParams) -> FilterResult<Pix> {
    check_grayscale(gray)?;
    if params.aperture != 3 {
        return Err(FilterError::InvalidParameters(format!(
            "canny aperture {} (supported: 3)",
            params.aperture
        )));
    }
    if !(params.ratio.is_finite() && params.low_threshold.is_finite()) {
        return Err(FilterError::InvalidParameters(
            "canny thresholds must be finite".to_string(),
        ));
    }
    let mut low = params.low_threshold.floor();
    let mut high = params.high_threshold().floor();
    if low > high {
        std::mem::swap(&mut low, &mut high);
    }

    let w = gray.width() as usize;
    let h = gray.height() as usize;
    let (dx, dy) = sobel_gradients(gray, Border::Replicate)?;
    let (dx, dy) = (dx.data(), dy.data());
    let mag: Vec<f32> = dx.iter().zip(dy).map(|(a, b)| a.abs() + b.abs()).collect();

    // Magnitude outside the image reads as zero.
    let at = |x: isize, y: isize| -> f32 {
        if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
            0.0
        } else {
            mag[y as usize * w + x as usize]
        }
    };

    let mut state = vec![NOT_EDGE; w * h];
    let mut stack = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let m = mag[i];
            if m <= low {
                continue;
            }
            let (gx, gy) = (dx[i], dy[i]);
            let (ax, ay) = (gx.abs(), gy.abs());
            let (xi, yi) = (x as isize, y as isize);
            let is_max = if ay < ax * TAN_22_5 {
                m > at(xi - 1, yi) && m >= at(xi + 1, yi)
            } else if ay > ax * TAN_67_5 {
                m > at(xi, yi - 1) && m >= at(xi, yi + 1)
            } else {
                let s: isize = if (gx < 0.0) != (gy < 0.0) { -1 } else { 1 };
                m > at(xi - s, yi - 1) && m > at(xi + s, yi + 1)
            };
            if !is_max {
                continue;
            }
            if m > high {
                state[i] = STRONG;
                stack.push(i);
            } else {
                state[i] = WEAK;
            }
        }
    }

    while let Some(i) = stack.pop() {
        let (x, y) = ((i % w) as isize, (i / w) as isize);
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let j = ny as usize * w + nx as usize;
                if state[j] == WEAK {
                    state[j] = STRONG;
                    stack.push(j);
                }
            }
        }
    }

    let data = state
        .into_iter()
        .map(|s| if s == STRONG { 255 } else { 0 })
        .collect();
    Ok(Pix::from_raw(gray.width(), gray.height(), PixelDepth::Bit8, data)?)
}

/// Detect edges on `detect_on` and copy `source` through the edge mask.
///
/// Both images must be 8-bpp grayscale of equal size.
pub fn canny_masked(source: &Pix, detect_on: &Pix, params: &CannyParams) -> FilterResult<Pix> {
    check_grayscale(source)?;
    let edges = canny_edges(detect_on, params)?;
    Ok(source.copy_masked(&edges)?)
}

/// Canny detection returning the input's values on edge pixels, 0 elsewhere.
pub fn canny(gray: &Pix, params: &CannyParams) -> FilterResult<Pix> {
    canny_masked(gray, gray, params)
}
