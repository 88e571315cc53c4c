//! End-to-end harness regression test
//!
//! Drives the orchestrator over synthetic inputs and checks the report,
//! the CSV table and the written images.

use edgebench_core::{ImageFormat, Pix};
use edgebench_filter::{FilterKind, LaplacianParams, apply_filter, laplacian};
use edgebench_harness::{
    CATALOG_LEN, CSV_HEADER, ContextPolicy, HarnessConfig, HarnessError, HarnessState,
    Orchestrator, RunSettings, catalog,
};
use edgebench_io::{read_image, write_image};
use edgebench_test::{RegParams, init_logging, scratch_dir, synth};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

fn write_input(dir: &Path, name: &str, pix: &Pix) -> PathBuf {
    let path = dir.join(name);
    let format = edgebench_io::format_from_path(&path);
    write_image(pix, &path, format).expect("write input");
    path
}

fn settings(dir: &Path, trials: u32, files: Vec<PathBuf>) -> RunSettings {
    RunSettings::new(
        dir.join("report.txt").display().to_string(),
        dir.join("times.csv").display().to_string(),
        trials,
        files,
    )
}

fn read_text(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).expect("read text")
}

fn listed(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect()
}

/// Drop the numeric part of timing lines so two runs compare equal.
fn without_timings(report: &str) -> String {
    report
        .lines()
        .filter(|l| !l.starts_with("Report file name:"))
        .map(|l| {
            if l.ends_with(" ms") || l.ends_with(" ms to complete.") {
                l.chars().filter(|c| !c.is_ascii_digit() && *c != '.').collect()
            } else {
                l.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn harness_two_trials_reg() {
    init_logging();
    let mut rp = RegParams::new("harness_two_trials");
    let dir = scratch_dir("harness_two_trials").expect("scratch");
    let out = dir.join("out");
    fs::create_dir_all(&out).expect("out dir");

    let scene = synth::color_scene(40, 32).expect("scene");
    let input = write_input(&dir, "photo.png", &scene);
    let settings = settings(&dir, 2, vec![input.clone()]);

    let mut harness = Orchestrator::new(HarnessConfig::default().with_output_dir(&out));
    let summary = harness.run(&settings).expect("run");
    rp.check(harness.state() == HarnessState::Done, "state is Done");
    rp.compare_values(2.0, summary.trials as f64, 0.0);
    rp.compare_values((2 * CATALOG_LEN) as f64, summary.runs as f64, 0.0);
    rp.compare_values(0.0, summary.failures as f64, 0.0);
    rp.compare_values((4 * CATALOG_LEN) as f64, summary.images_written as f64, 0.0);

    // --- Report markers ---
    let report = read_text(&settings.report_name);
    rp.check(
        report.starts_with("Edge Detection Analysis Data: \nReport file name: "),
        "report header",
    );
    let starts = report.lines().filter(|l| l.starts_with("Starting trial ")).count();
    rp.compare_values(2.0, starts as f64, 0.0);
    rp.check(report.contains("Trial #0 ended.\n\n"), "trial 0 trailer");
    rp.check(report.contains("Trial #1 ended.\n\n"), "trial 1 trailer");
    let took = report.lines().filter(|l| l.ends_with(" ms to complete.")).count();
    rp.compare_values((2 * CATALOG_LEN) as f64, took as f64, 0.0);
    rp.check(!report.contains("Error Code"), "no errors reported");

    // --- CSV shape ---
    let csv = read_text(&settings.csv_name);
    let lines: Vec<&str> = csv.lines().collect();
    rp.check(lines[0] == CSV_HEADER, "csv header exact");
    let data: Vec<&str> = lines[1..].iter().copied().filter(|l| !l.is_empty()).collect();
    let blanks = lines[1..].iter().filter(|l| l.is_empty()).count();
    rp.compare_values(2.0, data.len() as f64, 0.0);
    rp.compare_values(2.0, blanks as f64, 0.0);
    rp.check(data[0].starts_with("Trial #0 File #1, "), "first row label");
    rp.check(data[1].starts_with("Trial #1 File #1, "), "second row label");
    for row in &data {
        let cells: Vec<&str> = row.split(", ").skip(1).collect();
        rp.compare_values(CATALOG_LEN as f64, cells.len() as f64, 0.0);
        rp.check(
            cells.iter().all(|c| c.parse::<f64>().is_ok_and(|v| v >= 0.0)),
            "numeric cells",
        );
    }

    // --- Output names ---
    let mut expected = BTreeSet::new();
    for trial in 0..2 {
        for spec in catalog(&harness.config().params) {
            expected.insert(spec.base_name(trial, "photo.png"));
            expected.insert(spec.inverse_name(trial, "photo.png"));
        }
    }
    let written = listed(&out);
    rp.compare_values(40.0, written.len() as f64, 0.0);
    rp.check(written == expected, "output name set");

    // --- Inverse files are exact complements ---
    for spec in catalog(&harness.config().params) {
        let edge = read_image(out.join(spec.base_name(1, "photo.png"))).expect("edge");
        let inv = read_image(out.join(spec.inverse_name(1, "photo.png"))).expect("inverse");
        rp.compare_pix(&edge.invert(), &inv);
    }

    assert!(rp.cleanup(), "harness two-trial regression test failed");
}

#[test]
fn harness_idempotence_reg() {
    init_logging();
    let mut rp = RegParams::new("harness_idempotence");
    let dir = scratch_dir("harness_idempotence").expect("scratch");
    let input = write_input(&dir, "scene.png", &synth::color_scene(36, 28).expect("scene"));

    let mut reports = Vec::new();
    for run in ["a", "b"] {
        let run_dir = dir.join(run);
        fs::create_dir_all(&run_dir).expect("run dir");
        let settings = settings(&run_dir, 1, vec![input.clone()]);
        let mut harness = Orchestrator::new(HarnessConfig::default().with_output_dir(&run_dir));
        harness.run(&settings).expect("run");
        reports.push(without_timings(&read_text(&settings.report_name)));
    }
    rp.check(reports[0] == reports[1], "report identical modulo timings");

    for spec in catalog(&HarnessConfig::default().params) {
        for name in [spec.base_name(0, "scene.png"), spec.inverse_name(0, "scene.png")] {
            let a = fs::read(dir.join("a").join(&name)).expect("a");
            let b = fs::read(dir.join("b").join(&name)).expect("b");
            rp.compare_strings(&a, &b);
        }
    }

    assert!(rp.cleanup(), "harness idempotence regression test failed");
}

#[test]
fn harness_boundaries_reg() {
    init_logging();
    let mut rp = RegParams::new("harness_boundaries");
    let dir = scratch_dir("harness_boundaries").expect("scratch");
    let input = write_input(&dir, "in.png", &synth::checkerboard(24, 24, 6).expect("board"));

    // --- trial_count = 0: headers only, success ---
    let zero = settings(&dir, 0, vec![input.clone()]);
    let summary = Orchestrator::new(HarnessConfig::default().with_output_dir(&dir))
        .run(&zero)
        .expect("zero trials");
    rp.compare_values(0.0, summary.runs as f64, 0.0);
    rp.check(read_text(&zero.csv_name) == format!("{}\n", CSV_HEADER), "csv header only");
    rp.check(
        read_text(&zero.report_name) == format!("Edge Detection Analysis Data: \nReport file name: {}\n\n\n", zero.report_name),
        "report header only",
    );
    rp.compare_values(3.0, listed(&dir).len() as f64, 0.0);

    // --- no input files: improper invocation ---
    let mut harness = Orchestrator::new(HarnessConfig::default());
    let err = harness.run(&settings(&dir, 1, Vec::new())).unwrap_err();
    rp.compare_values(-2.0, err.exit_code() as f64, 0.0);
    rp.check(harness.state() == HarnessState::Failed(-2), "failed(-2)");

    // --- report cannot be created ---
    let bad = RunSettings::new(
        dir.join("missing/report.txt").display().to_string(),
        dir.join("times.csv").display().to_string(),
        1,
        vec![input.clone()],
    );
    let err = Orchestrator::new(HarnessConfig::default()).run(&bad).unwrap_err();
    rp.check(matches!(err, HarnessError::Setup { .. }), "setup error");
    rp.compare_values(-3.0, err.exit_code() as f64, 0.0);

    assert!(rp.cleanup(), "harness boundaries regression test failed");
}

#[test]
fn harness_failures_reg() {
    init_logging();
    let mut rp = RegParams::new("harness_failures");
    let dir = scratch_dir("harness_failures").expect("scratch");

    // --- unreadable input: -1, no CSV row ---
    let garbage = dir.join("broken.png");
    fs::write(&garbage, b"not an image at all").expect("garbage");
    let s = settings(&dir, 1, vec![garbage]);
    let mut harness = Orchestrator::new(HarnessConfig::default().with_output_dir(&dir));
    let err = harness.run(&s).unwrap_err();
    rp.compare_values(-1.0, err.exit_code() as f64, 0.0);
    rp.check(harness.state() == HarnessState::Failed(-1), "failed(-1)");
    let report = read_text(&s.report_name);
    rp.check(
        report.contains("Error Code: -1\nThis means: Error loading file.\n"),
        "load error block",
    );
    rp.check(!report.contains("Processing File"), "file never processed");
    rp.check(read_text(&s.csv_name) == format!("{}\n", CSV_HEADER), "no csv rows");

    // --- PNM header claiming an impossible raster: -1, not a crash ---
    let oversized = dir.join("oversized.ppm");
    fs::write(&oversized, b"P6\n4294967295 4294967295\n255\n\0\0\0").expect("oversized");
    let s = settings(&dir, 1, vec![oversized]);
    let mut harness = Orchestrator::new(HarnessConfig::default().with_output_dir(&dir));
    let err = harness.run(&s).unwrap_err();
    rp.check(matches!(err, HarnessError::Load { .. }), "load error");
    rp.compare_values(-1.0, err.exit_code() as f64, 0.0);
    rp.check(
        read_text(&s.report_name).contains("Error Code: -1\nThis means: Error loading file.\n"),
        "oversized header reported as load error",
    );

    // --- output directory missing: -3 per pipeline, cells still present ---
    let input = write_input(&dir, "ok.png", &synth::color_scene(24, 24).expect("scene"));
    let s = settings(&dir, 1, vec![input]);
    let config = HarnessConfig::default().with_output_dir(dir.join("no/such/dir"));
    let summary = Orchestrator::new(config).run(&s).expect("run continues");
    rp.compare_values(CATALOG_LEN as f64, summary.write_failures as f64, 0.0);
    rp.compare_values(0.0, summary.images_written as f64, 0.0);
    let report = read_text(&s.report_name);
    let blocks = report.matches("Error Code: -3\nThis means: Unable to output to image.\n").count();
    rp.compare_values(CATALOG_LEN as f64, blocks as f64, 0.0);
    let csv = read_text(&s.csv_name);
    let row = csv.lines().nth(1).unwrap_or("");
    rp.compare_values(CATALOG_LEN as f64, row.split(", ").skip(1).count() as f64, 0.0);

    assert!(rp.cleanup(), "harness failures regression test failed");
}

#[test]
fn harness_input_formats_reg() {
    init_logging();
    let mut rp = RegParams::new("harness_input_formats");
    let dir = scratch_dir("harness_input_formats").expect("scratch");
    let out = dir.join("out");
    fs::create_dir_all(&out).expect("out dir");
    let scene = synth::color_scene(32, 24).expect("scene");
    let files: Vec<PathBuf> = ["scene.bmp", "scene.tif"]
        .iter()
        .map(|name| write_input(&dir, name, &scene))
        .collect();

    let summary = Orchestrator::new(HarnessConfig::default().with_output_dir(&out))
        .run(&settings(&dir, 1, files))
        .expect("bmp and tiff inputs load");
    rp.compare_values((2 * CATALOG_LEN) as f64, summary.runs as f64, 0.0);
    rp.compare_values(0.0, summary.failures as f64, 0.0);
    rp.compare_values((4 * CATALOG_LEN) as f64, summary.images_written as f64, 0.0);

    // Outputs keep the input's format.
    let spec = catalog(&HarnessConfig::default().params)[4];
    for (name, format) in [("scene.bmp", ImageFormat::Bmp), ("scene.tif", ImageFormat::Tiff)] {
        let edge = read_image(out.join(spec.base_name(0, name))).expect("edge");
        let inv = read_image(out.join(spec.inverse_name(0, name))).expect("inverse");
        rp.check(edge.informat() == format, "output format follows input");
        rp.compare_pix(&edge.invert(), &inv);
    }

    assert!(rp.cleanup(), "harness input formats regression test failed");
}

#[test]
fn harness_context_policy_reg() {
    init_logging();
    let mut rp = RegParams::new("harness_context_policy");
    let dir = scratch_dir("harness_context_policy").expect("scratch");
    let scene = synth::color_scene(32, 32).expect("scene");
    let input = write_input(&dir, "s.png", &scene);

    // Laplacian after the box filter: in isolation it sees the decoded
    // image; in a cascade it sees the Gaussian and normalized passes too.
    let isolated_expected = {
        let boxed = apply_filter(FilterKind::Box, &scene).expect("box");
        laplacian(&boxed, &LaplacianParams::default()).expect("laplacian")
    };
    let name = catalog(&HarnessConfig::default().params)[2].base_name(0, "s.png");

    for (policy, sub) in [(ContextPolicy::Isolated, "iso"), (ContextPolicy::Cascade, "cas")] {
        let out = dir.join(sub);
        fs::create_dir_all(&out).expect("out");
        let config = HarnessConfig::default()
            .with_output_dir(&out)
            .with_context_policy(policy);
        Orchestrator::new(config)
            .run(&settings(&out, 1, vec![input.clone()]))
            .expect("run");
        let got = read_image(out.join(&name)).expect("read");
        let same = got.data() == isolated_expected.data();
        match policy {
            ContextPolicy::Isolated => rp.check(same, "isolated sees decoded input"),
            ContextPolicy::Cascade => rp.check(!same, "cascade sees earlier smoothing"),
        };
        rp.write_pix(&got, ImageFormat::Png).expect("write");
    }

    assert!(rp.cleanup(), "harness context policy regression test failed");
}
