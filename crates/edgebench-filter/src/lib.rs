//! edgebench-filter - Smoothing filters and edge detectors
//!
//! This crate provides the image operations the benchmark times:
//!
//! - Correlation with arbitrary kernels and selectable borders
//! - Smoothing filters (Gaussian, normalized box, summing box)
//! - Edge detectors (Canny, Laplacian, Sobel, Gabor)
//!
//! All operations are pure: they borrow their inputs and return new
//! images.
//!
//! # Example
//!
//! ```
//! use edgebench_core::{Pix, PixelDepth};
//! use edgebench_filter::{FilterKind, LaplacianParams, apply_filter, laplacian};
//!
//! let pix = Pix::new(16, 16, PixelDepth::Bit32).unwrap();
//! let smoothed = apply_filter(FilterKind::Gaussian, &pix).unwrap();
//! let edges = laplacian(&smoothed, &LaplacianParams::default()).unwrap();
//! assert_eq!(edges.count_pixels(), 0);
//! ```

pub mod blur;
pub mod convolve;
pub mod edge;
mod error;
pub mod gabor;
pub mod kernel;

pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

// Re-export commonly used functions
pub use blur::{BlurParams, FilterKind, apply_filter, apply_filter_with, box_blur, gaussian_blur};
pub use convolve::{Border, convolve, convolve_fpix, convolve_gray};
pub use edge::{
    CannyParams, LaplacianParams, SobelParams, canny, canny_edges, canny_masked, laplacian,
    sobel, sobel_gradients,
};
pub use gabor::{GaborParams, gabor, gabor_bank, gabor_kernel};
