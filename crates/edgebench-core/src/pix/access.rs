//! Pixel access
//!
//! Grayscale pixels read back as their 8-bit value; color pixels read back
//! as a packed word built with [`color::compose_rgb`].

use super::{Pix, PixMut, PixelDepth};
use crate::color;

#[inline]
fn read_pixel(data: &[u8], width: u32, depth: PixelDepth, x: u32, y: u32) -> u32 {
    let idx = (y as usize * width as usize + x as usize) * depth.spp() as usize;
    match depth {
        PixelDepth::Bit8 => data[idx] as u32,
        PixelDepth::Bit32 => color::compose_rgb(data[idx], data[idx + 1], data[idx + 2]),
    }
}

impl Pix {
    /// Get the pixel value at (x, y), or `None` outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get the pixel value at (x, y) without a range check.
    ///
    /// # Panics
    ///
    /// Panics if (x, y) lies outside the image.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        read_pixel(self.data(), self.width(), self.depth(), x, y)
    }

    /// Get the RGB components at (x, y).
    ///
    /// Grayscale images report the same value in all three components.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        let v = self.get_pixel(x, y)?;
        Some(match self.depth() {
            PixelDepth::Bit8 => (v as u8, v as u8, v as u8),
            PixelDepth::Bit32 => color::extract_rgb(v),
        })
    }

    /// Count pixels with any non-zero sample.
    pub fn count_pixels(&self) -> usize {
        let spp = self.spp() as usize;
        self.data()
            .chunks_exact(spp)
            .filter(|px| px.iter().any(|&s| s != 0))
            .count()
    }
}

impl PixMut {
    /// Get the pixel value at (x, y), or `None` outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(read_pixel(self.data(), self.width(), self.depth(), x, y))
    }

    /// Set the pixel value at (x, y).
    ///
    /// Returns `false` (and writes nothing) outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u32) -> bool {
        if x >= self.width() || y >= self.height() {
            return false;
        }
        self.set_pixel_unchecked(x, y, value);
        true
    }

    /// Set the pixel value at (x, y) without a range check.
    ///
    /// For grayscale images only the low byte of `value` is stored.
    ///
    /// # Panics
    ///
    /// Panics if (x, y) lies outside the image.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, value: u32) {
        let depth = self.depth();
        let idx = (y as usize * self.width() as usize + x as usize) * depth.spp() as usize;
        let data = self.data_mut();
        match depth {
            PixelDepth::Bit8 => data[idx] = (value & 0xff) as u8,
            PixelDepth::Bit32 => {
                let (r, g, b) = color::extract_rgb(value);
                data[idx] = r;
                data[idx + 1] = g;
                data[idx + 2] = b;
            }
        }
    }

    /// Set an RGB pixel. Grayscale images store the luma.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> bool {
        match self.depth() {
            PixelDepth::Bit8 => self.set_pixel(x, y, color::luma(r, g, b) as u32),
            PixelDepth::Bit32 => self.set_pixel(x, y, color::compose_rgb(r, g, b)),
        }
    }
}
