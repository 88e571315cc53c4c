//! Deterministic synthetic test images
//!
//! All generators are pure functions of their arguments so tests can
//! compare outputs across runs byte for byte.

use crate::TestResult;
use edgebench_core::{Pix, PixelDepth};

/// Horizontal 8-bit ramp from 0 at the left edge to 255 at the right.
pub fn gray_gradient(width: u32, height: u32) -> TestResult<Pix> {
    let denom = (width.max(2) - 1) as f32;
    let mut data = Vec::with_capacity((width * height) as usize);
    for _ in 0..height {
        for x in 0..width {
            data.push((x as f32 * 255.0 / denom).round() as u8);
        }
    }
    Ok(Pix::from_raw(width, height, PixelDepth::Bit8, data)?)
}

/// Grayscale image filled with a single value.
pub fn gray_constant(width: u32, height: u32, value: u8) -> TestResult<Pix> {
    Ok(Pix::from_raw(
        width,
        height,
        PixelDepth::Bit8,
        vec![value; (width * height) as usize],
    )?)
}

/// Grayscale checkerboard with `cell`-pixel squares of 32 and 224.
pub fn checkerboard(width: u32, height: u32, cell: u32) -> TestResult<Pix> {
    let cell = cell.max(1);
    let mut data = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let on = ((x / cell) + (y / cell)) % 2 == 0;
            data.push(if on { 224 } else { 32 });
        }
    }
    Ok(Pix::from_raw(width, height, PixelDepth::Bit8, data)?)
}

/// RGB scene: dark blue background with a bright orange square in the
/// middle half and a green bar along the bottom quarter.
pub fn color_scene(width: u32, height: u32) -> TestResult<Pix> {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let in_square =
                x >= width / 4 && x < 3 * width / 4 && y >= height / 4 && y < height / 2;
            let in_bar = y >= 3 * height / 4;
            let rgb = if in_square {
                [250, 160, 40]
            } else if in_bar {
                [30, 200, 60]
            } else {
                [20, 30, 90]
            };
            data.extend_from_slice(&rgb);
        }
    }
    Ok(Pix::from_raw(width, height, PixelDepth::Bit32, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_endpoints() {
        let pix = gray_gradient(16, 2).unwrap();
        assert_eq!(pix.get_pixel(0, 1), Some(0));
        assert_eq!(pix.get_pixel(15, 1), Some(255));
    }

    #[test]
    fn test_color_scene_regions() {
        let pix = color_scene(40, 40).unwrap();
        assert_eq!(pix.get_rgb(0, 0), Some((20, 30, 90)));
        assert_eq!(pix.get_rgb(20, 12), Some((250, 160, 40)));
        assert_eq!(pix.get_rgb(5, 35), Some((30, 200, 60)));
    }

    #[test]
    fn test_checkerboard_cells() {
        let pix = checkerboard(8, 8, 4).unwrap();
        assert_eq!(pix.get_pixel(0, 0), Some(224));
        assert_eq!(pix.get_pixel(4, 0), Some(32));
        assert_eq!(pix.get_pixel(4, 4), Some(224));
    }
}
