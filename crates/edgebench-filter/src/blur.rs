//! Smoothing filters applied ahead of edge detection
//!
//! Every filter works on grayscale and color images alike and returns an
//! image of the same geometry and depth. Borders use [`Border::Reflect101`].

use crate::convolve::{Border, convolve};
use crate::{FilterResult, Kernel};
use edgebench_core::Pix;

/// Smoothing filter selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Gaussian blur, sigma derived from the aperture
    Gaussian,
    /// Mean over the aperture
    NormalizedBox,
    /// Box filter; sums the aperture unless [`BlurParams::box_normalize`]
    Box,
}

impl FilterKind {
    /// All filters in catalog order.
    pub const ALL: [FilterKind; 3] = [
        FilterKind::Gaussian,
        FilterKind::NormalizedBox,
        FilterKind::Box,
    ];

    /// Short lowercase token used in output file names.
    pub fn token(self) -> &'static str {
        match self {
            FilterKind::Gaussian => "gaussian",
            FilterKind::NormalizedBox => "normalized",
            FilterKind::Box => "box",
        }
    }

    /// Human-readable name used in reports.
    pub fn label(self) -> &'static str {
        match self {
            FilterKind::Gaussian => "Gaussian",
            FilterKind::NormalizedBox => "Normalized",
            FilterKind::Box => "Box",
        }
    }
}

/// Aperture and normalization settings shared by all filters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurParams {
    /// Odd square aperture size
    pub ksize: u32,
    /// Gaussian sigma; `<= 0` derives it from `ksize`
    pub sigma: f32,
    /// Divide the box filter by its area
    pub box_normalize: bool,
}

impl Default for BlurParams {
    fn default() -> Self {
        BlurParams {
            ksize: 3,
            sigma: 0.0,
            box_normalize: false,
        }
    }
}

/// Build the kernel a filter applies.
pub fn filter_kernel(kind: FilterKind, params: &BlurParams) -> FilterResult<Kernel> {
    match kind {
        FilterKind::Gaussian => Kernel::gaussian(params.ksize, params.sigma),
        FilterKind::NormalizedBox => Kernel::box_kernel(params.ksize, true),
        FilterKind::Box => Kernel::box_kernel(params.ksize, params.box_normalize),
    }
}

/// Apply a filter with default parameters (3x3 aperture, summing box).
pub fn apply_filter(kind: FilterKind, pix: &Pix) -> FilterResult<Pix> {
    apply_filter_with(kind, pix, &BlurParams::default())
}

/// Apply a filter with explicit parameters.
pub fn apply_filter_with(kind: FilterKind, pix: &Pix, params: &BlurParams) -> FilterResult<Pix> {
    let kernel = filter_kernel(kind, params)?;
    convolve(pix, &kernel, Border::Reflect101)
}

/// Gaussian blur with an odd aperture.
pub fn gaussian_blur(pix: &Pix, ksize: u32, sigma: f32) -> FilterResult<Pix> {
    let kernel = Kernel::gaussian(ksize, sigma)?;
    convolve(pix, &kernel, Border::Reflect101)
}

/// Mean filter with an odd aperture.
pub fn box_blur(pix: &Pix, ksize: u32) -> FilterResult<Pix> {
    let kernel = Kernel::box_kernel(ksize, true)?;
    convolve(pix, &kernel, Border::Reflect101)
}
