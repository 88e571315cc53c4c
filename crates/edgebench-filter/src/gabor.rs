//! Gabor texture response
//!
//! A Gabor kernel is a Gaussian envelope modulating a cosine carrier:
//!
//! ```text
//! x' =  x cos(theta) + y sin(theta)
//! y' = -x sin(theta) + y cos(theta)
//! g(x, y) = exp(-(x'^2 + gamma^2 y'^2) / (2 sigma^2)) * cos(2 pi x' / lambda + psi)
//! ```
//!
//! The kernel is stored rotated by 180 degrees so that correlation with it
//! matches convolution with `g`.

use crate::convolve::{Border, check_grayscale, convolve_fpix};
use crate::{FilterError, FilterResult, Kernel};
use edgebench_core::{FPix, NegativeHandling, Pix};
use std::f64::consts::PI;

/// Gabor kernel and bank parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaborParams {
    /// Odd kernel size
    pub ksize: u32,
    /// Standard deviation of the Gaussian envelope
    pub sigma: f64,
    /// Orientation of the first kernel in the bank
    pub theta: f64,
    /// Wavelength of the carrier
    pub lambda: f64,
    /// Spatial aspect ratio
    pub gamma: f64,
    /// Phase offset
    pub psi: f64,
    /// Bank angles are generated while below this bound
    pub bank_limit: f64,
    /// Angle increment between bank entries
    pub bank_step: f64,
}

impl Default for GaborParams {
    fn default() -> Self {
        GaborParams {
            ksize: 31,
            sigma: 4.0,
            theta: PI / 16.0,
            lambda: 10.0,
            gamma: 0.5,
            psi: 0.0,
            bank_limit: PI / 16.0,
            bank_step: PI / 2.0,
        }
    }
}

impl GaborParams {
    /// Orientations of the kernel bank.
    ///
    /// Entries are counted by stepping an angle from 0 by `bank_step` while
    /// it stays below `bank_limit`; entry `k` is oriented at
    /// `theta + k * bank_step`. The defaults step past the limit at once,
    /// so the bank holds a single kernel at `theta`.
    pub fn orientations(&self) -> FilterResult<Vec<f64>> {
        if !(self.bank_step > 0.0 && self.bank_step.is_finite()) {
            return Err(FilterError::InvalidParameters(format!(
                "gabor bank step {} must be positive",
                self.bank_step
            )));
        }
        let mut angles = Vec::new();
        let mut angle = 0.0;
        let mut k = 0.0;
        while angle < self.bank_limit {
            angles.push(self.theta + k * self.bank_step);
            angle += self.bank_step;
            k += 1.0;
        }
        Ok(angles)
    }
}

/// Build one Gabor kernel.
pub fn gabor_kernel(
    ksize: u32,
    sigma: f64,
    theta: f64,
    lambda: f64,
    gamma: f64,
    psi: f64,
) -> FilterResult<Kernel> {
    if ksize == 0 || ksize % 2 == 0 {
        return Err(FilterError::InvalidKernel(format!(
            "gabor size {} must be odd and positive",
            ksize
        )));
    }
    if sigma <= 0.0 || lambda == 0.0 || gamma == 0.0 {
        return Err(FilterError::InvalidParameters(format!(
            "gabor sigma={} lambda={} gamma={}",
            sigma, lambda, gamma
        )));
    }

    let half = (ksize / 2) as i32;
    let sigma_x = sigma;
    let sigma_y = sigma / gamma;
    let ex = -0.5 / (sigma_x * sigma_x);
    let ey = -0.5 / (sigma_y * sigma_y);
    let carrier = 2.0 * PI / lambda;
    let (s, c) = theta.sin_cos();

    let mut kernel = Kernel::new(ksize, ksize)?;
    for y in -half..=half {
        for x in -half..=half {
            let (xf, yf) = (x as f64, y as f64);
            let xr = xf * c + yf * s;
            let yr = -xf * s + yf * c;
            let v = (ex * xr * xr + ey * yr * yr).exp() * (carrier * xr + psi).cos();
            kernel.set((half - x) as u32, (half - y) as u32, v as f32);
        }
    }
    Ok(kernel)
}

/// Build every kernel of the bank described by `params`.
pub fn gabor_bank(params: &GaborParams) -> FilterResult<Vec<Kernel>> {
    params
        .orientations()?
        .into_iter()
        .map(|theta| {
            gabor_kernel(
                params.ksize,
                params.sigma,
                theta,
                params.lambda,
                params.gamma,
                params.psi,
            )
        })
        .collect()
}

/// Gabor texture response of a grayscale image.
///
/// The bank's kernels are applied in sequence to one working buffer. After
/// each kernel the response is stretched to [0, 255] and saturated to 8
/// bits, so the next kernel sees the quantized result. A flat response
/// stretches to all zeros.
pub fn gabor(gray: &Pix, params: &GaborParams) -> FilterResult<Pix> {
    check_grayscale(gray)?;
    let bank = gabor_bank(params)?;
    log::debug!("gabor bank of {} kernel(s), size {}", bank.len(), params.ksize);

    let mut working = gray.clone();
    for kernel in &bank {
        let input = FPix::from_pix(&working)?;
        let response = convolve_fpix(&input, kernel, Border::Reflect101)?;
        working = response
            .normalize_min_max(0.0, 255.0)
            .to_pix(1.0, 0.0, NegativeHandling::ClipToZero)?;
    }
    Ok(working)
}
