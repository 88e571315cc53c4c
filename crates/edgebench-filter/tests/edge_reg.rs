//! Edge detection regression test
//!
//! Runs Canny, Laplacian, Sobel and Gabor on synthetic scenes and checks
//! output geometry, where edges land, and detector-specific invariants.

use edgebench_core::{ImageFormat, PixelDepth};
use edgebench_filter::{
    CannyParams, FilterKind, GaborParams, LaplacianParams, SobelParams, apply_filter, canny,
    canny_edges, canny_masked, gabor, laplacian, sobel,
};
use edgebench_test::{RegParams, synth};

#[test]
fn edge_reg() {
    let mut rp = RegParams::new("edge");

    let color = synth::color_scene(64, 48).expect("scene");
    let gray = color.convert_to_gray().expect("gray");
    let (w, h) = (color.width(), color.height());

    // --- Test 1: Laplacian and Sobel accept color, return gray ---
    let lap = laplacian(&color, &LaplacianParams::default()).expect("laplacian");
    let sob = sobel(&color, &SobelParams::default()).expect("sobel");
    for out in [&lap, &sob] {
        rp.compare_values(w as f64, out.width() as f64, 0.0);
        rp.compare_values(h as f64, out.height() as f64, 0.0);
        rp.check(out.depth() == PixelDepth::Bit8, "8-bpp edge map");
        rp.write_pix(out, ImageFormat::Png).expect("write");
    }

    // --- Test 2: responses sit on region boundaries only ---
    // square spans x in [16, 48), y in [12, 24)
    rp.compare_values(0.0, lap.get_pixel(4, 4).unwrap_or(1) as f64, 0.0);
    rp.compare_values(0.0, sob.get_pixel(32, 18).unwrap_or(1) as f64, 0.0);
    rp.check(sob.get_pixel(16, 18).unwrap_or(0) > 0, "sobel on left side");
    rp.check(sob.get_pixel(32, 12).unwrap_or(0) > 0, "sobel on top side");
    rp.check(lap.get_pixel(15, 18).unwrap_or(0) > 0, "laplacian on left side");

    // --- Test 3: Canny edges are thin and binary ---
    let edges = canny_edges(&gray, &CannyParams::default()).expect("canny_edges");
    rp.check(
        edges.data().iter().all(|&v| v == 0 || v == 255),
        "canny map is binary",
    );
    let row: usize = (0..w)
        .filter(|&x| edges.get_pixel(x, 18).unwrap_or(0) == 255)
        .count();
    eprintln!("  canny edges on row 18: {}", row);
    rp.compare_values(2.0, row as f64, 0.0);

    // --- Test 4: masked copy carries source values ---
    let masked = canny(&gray, &CannyParams::default()).expect("canny");
    let consistent = masked
        .data()
        .iter()
        .zip(edges.data())
        .zip(gray.data())
        .all(|((&m, &e), &g)| if e == 255 { m == g } else { m == 0 });
    rp.check(consistent, "masked copy follows the edge map");

    // --- Test 5: detect on the blurred image, copy the unblurred one ---
    let blurred = apply_filter(FilterKind::Gaussian, &gray).expect("blur");
    let out = canny_masked(&gray, &blurred, &CannyParams::default()).expect("canny_masked");
    let edges_blurred = canny_edges(&blurred, &CannyParams::default()).expect("edges");
    let from_source = out
        .data()
        .iter()
        .zip(edges_blurred.data())
        .zip(gray.data())
        .all(|((&m, &e), &g)| if e == 255 { m == g } else { m == 0 });
    rp.check(from_source, "mask applied to source gray");

    // --- Test 6: Gabor stretches to the full range, flat input to zero ---
    let gab = gabor(&gray, &GaborParams::default()).expect("gabor");
    rp.write_pix(&gab, ImageFormat::Png).expect("write");
    let min = gab.data().iter().copied().min().unwrap_or(1);
    let max = gab.data().iter().copied().max().unwrap_or(0);
    rp.compare_values(0.0, min as f64, 0.0);
    rp.compare_values(255.0, max as f64, 0.0);
    let flat = synth::gray_constant(20, 20, 200).expect("flat");
    let gab = gabor(&flat, &GaborParams::default()).expect("gabor flat");
    rp.compare_values(0.0, gab.count_pixels() as f64, 0.0);

    // --- Test 7: depth requirements ---
    rp.check(canny(&color, &CannyParams::default()).is_err(), "canny needs gray");
    rp.check(gabor(&color, &GaborParams::default()).is_err(), "gabor needs gray");

    assert!(rp.cleanup(), "edge regression test failed");
}
