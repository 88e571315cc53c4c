//! Output recorder regression test
//!
//! Feeds hand-built run results to the recorder and checks the report
//! lines, CSV cells and files each outcome produces.

use edgebench_core::{ImageFormat, PixelDepth};
use edgebench_harness::{
    CsvTable, DetectorKind, HarnessConfig, PipelineError, RecordOutcome, Recorder, Report,
    RunResult, catalog,
};
use edgebench_io::{read_image, write_image};
use edgebench_test::{RegParams, scratch_dir, synth};
use std::path::Path;
use std::time::Duration;

fn result(output: Option<edgebench_core::Pix>, error: Option<PipelineError>) -> RunResult {
    RunResult {
        output,
        started_at: Duration::from_millis(10),
        finished_at: Duration::from_millis(25),
        elapsed: Duration::from_millis(15),
        error,
    }
}

#[test]
fn recorder_reg() {
    let mut rp = RegParams::new("recorder");
    let dir = scratch_dir("recorder").expect("scratch");
    let config = HarnessConfig::default().with_output_dir(&dir);
    let specs = catalog(&config.params);
    let edge = synth::checkerboard(16, 16, 4).expect("edge");

    let jpg = dir.join("photo.jpg");
    write_image(&synth::color_scene(16, 16).expect("scene"), &jpg, ImageFormat::Jpeg)
        .expect("input");

    let mut report = Report::new(Vec::new());
    let mut csv = CsvTable::new(Vec::new());
    csv.start_row(3, 1).expect("row");
    {
        let mut recorder = Recorder::new(&config, &mut report, &mut csv);

        // --- Success: both images written in the input's format ---
        let outcome = recorder
            .record(&specs[4], &result(Some(edge.clone()), None), &jpg, 3)
            .expect("record");
        match outcome {
            RecordOutcome::Written { edge: e, inverse } => {
                rp.check(
                    e == dir.join("trial_3_canny_normalized_photo.jpg"),
                    "edge path",
                );
                rp.check(
                    inverse == dir.join("trial_3_canny_normalized_inv_photo.jpg"),
                    "inverse path",
                );
                let back = read_image(&e).expect("read edge");
                rp.check(back.informat() == ImageFormat::Jpeg, "jpeg output");
                rp.check(back.depth() == PixelDepth::Bit8, "gray output");
                rp.compare_values(16.0, back.width() as f64, 0.0);
            }
            other => {
                rp.check(false, &format!("expected Written, got {:?}", other));
            }
        }

        // --- Failed run: error block, no images ---
        let failure = PipelineError::DetectorFailure {
            detector: DetectorKind::Sobel,
            message: "synthetic".to_string(),
        };
        let outcome = recorder
            .record(&specs[6], &result(None, Some(failure)), &jpg, 3)
            .expect("record");
        rp.check(matches!(outcome, RecordOutcome::Failed), "failed outcome");
        rp.check(
            !dir.join("trial_3_sobel_gaussian_photo.jpg").exists(),
            "nothing written for failure",
        );

        // --- Input vanished: skipped silently ---
        let outcome = recorder
            .record(&specs[9], &result(Some(edge.clone()), None), Path::new("gone.png"), 3)
            .expect("record");
        rp.check(matches!(outcome, RecordOutcome::Skipped), "skipped outcome");
        rp.check(!dir.join("trial_3_gabor_gone.png").exists(), "nothing written when skipped");
    }

    csv.end_row().expect("end row");
    let csv_text = String::from_utf8(csv.into_inner()).expect("utf8");
    rp.check(
        csv_text == "Trial #3 File #1, 15.000, 15.000, 15.000\n",
        "one cell per record call",
    );

    let text = String::from_utf8(report.into_inner()).expect("utf8");
    rp.check(
        text.contains("Starting Canny w/ Normalized Box Filter. Initial Time: 10.000 ms\n"),
        "start line",
    );
    rp.check(
        text.contains("Canny w/ Normalized Box Filter finished. Final Time: 25.000 ms\n"),
        "finish line",
    );
    rp.check(
        text.contains("Canny w/ Normalized Box Filter took 15.000 ms to complete.\n"),
        "took line",
    );
    rp.compare_values(1.0, text.matches("Error Code: -2").count() as f64, 0.0);
    rp.check(!text.contains("Error Code: -3"), "no write failure");
    rp.compare_values(11.0, text.lines().count() as f64, 0.0);

    assert!(rp.cleanup(), "recorder regression test failed");
}
