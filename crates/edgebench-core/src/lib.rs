//! edgebench-core - Image containers for the edge-detection harness
//!
//! This crate provides the data structures every other edgebench crate
//! passes around:
//!
//! - [`Pix`] / [`PixMut`] - 8-bit image container (immutable / mutable)
//! - [`FPix`] - Floating-point image for intermediate results
//! - [`PixelDepth`] - Grayscale (8 bpp) or RGB color (32 bpp)
//! - [`ImageFormat`] - On-disk encodings known to `edgebench-io`
//!
//! # Example
//!
//! ```
//! use edgebench_core::{Pix, PixelDepth};
//!
//! let pix = Pix::new(64, 48, PixelDepth::Bit8).unwrap();
//! assert_eq!(pix.width(), 64);
//! assert_eq!(pix.spp(), 1);
//! ```

pub mod error;
pub mod fpix;
pub mod pix;

pub use error::{Error, Result};
pub use fpix::{FPix, NegativeHandling};
pub use pix::{ImageFormat, Pix, PixMut, PixelDepth};

/// Helpers for packed RGB pixel words.
///
/// # Pixel format
///
/// [`Pix::get_pixel`] on a color image returns `0xRRGGBB00`
/// (red in the most significant byte, low byte unused).
pub mod color {
    /// Shift amounts for extracting color channels
    pub const RED_SHIFT: u32 = 24;
    pub const GREEN_SHIFT: u32 = 16;
    pub const BLUE_SHIFT: u32 = 8;

    /// Compose a packed pixel word from its red, green and blue components.
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        ((r as u32) << RED_SHIFT) | ((g as u32) << GREEN_SHIFT) | ((b as u32) << BLUE_SHIFT)
    }

    /// Split a packed pixel word into red, green and blue.
    #[inline]
    pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
        (
            ((pixel >> RED_SHIFT) & 0xff) as u8,
            ((pixel >> GREEN_SHIFT) & 0xff) as u8,
            ((pixel >> BLUE_SHIFT) & 0xff) as u8,
        )
    }

    /// Luma of an RGB triple, ITU-R BT.601 weights.
    ///
    /// Fixed-point with 14 fractional bits so that the result is exact and
    /// reproducible across platforms.
    #[inline]
    pub fn luma(r: u8, g: u8, b: u8) -> u8 {
        const R_W: u32 = 4899; // 0.299 * 2^14
        const G_W: u32 = 9617; // 0.587 * 2^14
        const B_W: u32 = 1868; // 0.114 * 2^14
        ((r as u32 * R_W + g as u32 * G_W + b as u32 * B_W + (1 << 13)) >> 14) as u8
    }

}
