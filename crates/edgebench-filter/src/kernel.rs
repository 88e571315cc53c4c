//! Convolution kernels
//!
//! A [`Kernel`] is a small dense matrix of `f32` weights with a center
//! point. Filtering in this crate is correlation: the weight at
//! `(kx, ky)` multiplies the source sample at
//! `(x + kx - cx, y + ky - cy)`.

use crate::{FilterError, FilterResult};

/// A 2D convolution kernel
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Width of the kernel
    width: u32,
    /// Height of the kernel
    height: u32,
    /// X coordinate of the center
    cx: u32,
    /// Y coordinate of the center
    cy: u32,
    /// Kernel data (row-major order)
    data: Vec<f32>,
}

/// Fixed smoothing taps used when no sigma is given, sizes 1, 3, 5, 7.
const SMALL_GAUSSIAN: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

impl Kernel {
    /// Create a zero kernel with the given dimensions, centered.
    pub fn new(width: u32, height: u32) -> FilterResult<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "kernel size {}x{} must be positive",
                width, height
            )));
        }
        Ok(Kernel {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            data: vec![0.0; (width * height) as usize],
        })
    }

    /// Create a centered kernel from row-major values.
    pub fn from_slice(width: u32, height: u32, data: &[f32]) -> FilterResult<Self> {
        let mut kernel = Self::new(width, height)?;
        if data.len() != kernel.data.len() {
            return Err(FilterError::InvalidKernel(format!(
                "expected {} values for a {}x{} kernel, got {}",
                kernel.data.len(),
                width,
                height,
                data.len()
            )));
        }
        kernel.data.copy_from_slice(data);
        Ok(kernel)
    }

    /// Create a square box kernel.
    ///
    /// With `normalize` every weight is `1/(size*size)`; without it every
    /// weight is 1 and the filter sums its neighborhood.
    pub fn box_kernel(size: u32, normalize: bool) -> FilterResult<Self> {
        check_odd(size)?;
        let weight = if normalize {
            1.0 / (size * size) as f32
        } else {
            1.0
        };
        Self::from_slice(size, size, &vec![weight; (size * size) as usize])
    }

    /// Create a square Gaussian kernel.
    ///
    /// A `sigma <= 0` is derived from the size as
    /// `0.3 * ((size - 1) * 0.5 - 1) + 0.8`; for sizes up to 7 the fixed
    /// binomial-like taps are used instead, so a 3x3 kernel is exactly
    /// `[1 2 1]^T [1 2 1] / 16`.
    pub fn gaussian(size: u32, sigma: f32) -> FilterResult<Self> {
        let taps = gaussian_taps(size, sigma)?;
        let mut data = Vec::with_capacity((size * size) as usize);
        for &wy in &taps {
            for &wx in &taps {
                data.push(wx * wy);
            }
        }
        Self::from_slice(size, size, &data)
    }

    /// 3x3 Sobel kernel for the x derivative.
    pub fn sobel_x() -> Self {
        Self::fixed3([-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0])
    }

    /// 3x3 Sobel kernel for the y derivative.
    pub fn sobel_y() -> Self {
        Self::fixed3([-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0])
    }

    /// Laplacian kernel for aperture 1 or 3.
    ///
    /// Aperture 1 is the 4-neighbour stencil; aperture 3 is
    /// `[[2,0,2],[0,-8,0],[2,0,2]]`.
    pub fn laplacian(aperture: u32) -> FilterResult<Self> {
        match aperture {
            1 => Ok(Self::fixed3([0.0, 1.0, 0.0, 1.0, -4.0, 1.0, 0.0, 1.0, 0.0])),
            3 => Ok(Self::fixed3([2.0, 0.0, 2.0, 0.0, -8.0, 0.0, 2.0, 0.0, 2.0])),
            other => Err(FilterError::InvalidParameters(format!(
                "laplacian aperture {} (supported: 1, 3)",
                other
            ))),
        }
    }

    fn fixed3(data: [f32; 9]) -> Self {
        Kernel {
            width: 3,
            height: 3,
            cx: 1,
            cy: 1,
            data: data.to_vec(),
        }
    }

    /// Get the kernel width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the kernel height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the center X coordinate.
    #[inline]
    pub fn center_x(&self) -> u32 {
        self.cx
    }

    /// Get the center Y coordinate.
    #[inline]
    pub fn center_y(&self) -> u32 {
        self.cy
    }

    /// Set the center coordinates.
    pub fn set_center(&mut self, cx: u32, cy: u32) -> FilterResult<()> {
        if cx >= self.width || cy >= self.height {
            return Err(FilterError::InvalidKernel(format!(
                "center ({}, {}) outside {}x{} kernel",
                cx, cy, self.width, self.height
            )));
        }
        self.cx = cx;
        self.cy = cy;
        Ok(())
    }

    /// Get the kernel data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get a value at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[(y * self.width + x) as usize])
    }

    /// Set a value at (x, y). Out-of-range writes are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = value;
        }
    }

    /// Normalize the kernel so that values sum to 1.
    ///
    /// Kernels summing to zero (derivative kernels) are left unchanged.
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum.abs() > f32::EPSILON {
            for v in &mut self.data {
                *v /= sum;
            }
        }
    }

    /// Get the sum of all kernel values.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}

fn check_odd(size: u32) -> FilterResult<()> {
    if size == 0 || size % 2 == 0 {
        return Err(FilterError::InvalidKernel(format!(
            "kernel size {} must be odd and positive",
            size
        )));
    }
    Ok(())
}

/// 1-D Gaussian taps of length `size`, summing to 1.
pub fn gaussian_taps(size: u32, sigma: f32) -> FilterResult<Vec<f32>> {
    check_odd(size)?;
    if sigma <= 0.0 && size <= 7 {
        return Ok(SMALL_GAUSSIAN[(size / 2) as usize].to_vec());
    }
    let sigma = if sigma > 0.0 {
        sigma as f64
    } else {
        0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let scale = -0.5 / (sigma * sigma);
    let half = (size / 2) as f64;
    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - half;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    Ok(raw.into_iter().map(|v| (v / sum) as f32).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_kernel() {
        let k = Kernel::box_kernel(3, true).unwrap();
        assert!((k.sum() - 1.0).abs() < 1e-6);
        let k = Kernel::box_kernel(3, false).unwrap();
        assert_eq!(k.sum(), 9.0);
        assert!(Kernel::box_kernel(4, true).is_err());
    }

    #[test]
    fn test_gaussian_3x3_is_binomial() {
        let k = Kernel::gaussian(3, 0.0).unwrap();
        assert_eq!(k.get(1, 1), Some(0.25));
        assert_eq!(k.get(0, 0), Some(0.0625));
        assert_eq!(k.get(1, 0), Some(0.125));
        assert!((k.sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_gaussian_explicit_sigma() {
        let taps = gaussian_taps(9, 2.0).unwrap();
        assert_eq!(taps.len(), 9);
        assert!((taps.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!(taps[4] > taps[3] && taps[3] > taps[2]);
        assert!((taps[0] - taps[8]).abs() < 1e-7);
    }

    #[test]
    fn test_derivative_kernels_sum_to_zero() {
        assert_eq!(Kernel::sobel_x().sum(), 0.0);
        assert_eq!(Kernel::sobel_y().sum(), 0.0);
        assert_eq!(Kernel::laplacian(3).unwrap().sum(), 0.0);
        assert_eq!(Kernel::laplacian(1).unwrap().sum(), 0.0);
        assert!(Kernel::laplacian(5).is_err());
    }

    #[test]
    fn test_set_center() {
        let mut k = Kernel::new(3, 5).unwrap();
        assert_eq!((k.center_x(), k.center_y()), (1, 2));
        assert!(k.set_center(0, 4).is_ok());
        assert!(k.set_center(3, 0).is_err());
    }

    #[test]
    fn test_normalize() {
        let mut k = Kernel::from_slice(3, 1, &[1.0, 2.0, 1.0]).unwrap();
        k.normalize();
        assert_eq!(k.data(), &[0.25, 0.5, 0.25]);
        let mut d = Kernel::sobel_x();
        d.normalize();
        assert_eq!(d, Kernel::sobel_x());
    }
}
