//! edgebench - Edge-detection pipeline benchmark
//!
//! Times edge detectors (Canny, Laplacian, Sobel, Gabor) behind smoothing
//! filters (Gaussian, normalized box, box) over a set of images, for a
//! number of trials, and records the timings in a text report and a CSV
//! table next to the detected edge images.
//!
//! # Overview
//!
//! - [`io`]: PNG, JPEG and PNM decode/encode
//! - [`filter`]: kernels, smoothing filters and edge detectors
//! - [`harness`]: pipeline catalog, timing, recording and orchestration
//!
//! # Example
//!
//! ```
//! use edgebench::{Pix, PixelDepth};
//! use edgebench::filter::{CannyParams, canny};
//!
//! let pix = Pix::new(32, 32, PixelDepth::Bit8).unwrap();
//! let edges = canny(&pix, &CannyParams::default()).unwrap();
//! assert_eq!(edges.count_pixels(), 0);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use edgebench_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use edgebench_filter as filter;
pub use edgebench_harness as harness;
pub use edgebench_io as io;
