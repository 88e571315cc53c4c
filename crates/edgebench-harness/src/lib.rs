//! edgebench-harness - Edge-detection benchmark harness
//!
//! Runs every pipeline of a fixed catalog (smoothing filter followed by an
//! edge detector) over a set of input images for a number of trials, and
//! records:
//!
//! - per-run timing lines and error blocks in a text [`Report`]
//! - elapsed milliseconds in a [`CsvTable`], one row per (trial, file)
//! - each edge image and its tonal inverse under deterministic names
//!
//! # Example
//!
//! ```no_run
//! use edgebench_harness::{HarnessConfig, Orchestrator, RunSettings};
//!
//! let settings = RunSettings::new("report.txt", "times.csv", 2, vec!["photo.jpg".into()]);
//! let mut harness = Orchestrator::new(HarnessConfig::default().with_output_dir("out"));
//! match harness.run(&settings) {
//!     Ok(summary) => println!("{} images written", summary.images_written),
//!     Err(e) => std::process::exit(e.exit_code()),
//! }
//! ```

pub mod config;
pub mod context;
pub mod csv;
mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod recorder;
pub mod report;
pub mod runner;

pub use config::{ContextPolicy, HarnessConfig, PipelineParams, RunSettings, parse_trial_count};
pub use context::TrialContext;
pub use csv::CsvTable;
pub use error::{ErrorKind, HarnessError, HarnessResult, PipelineError};
pub use orchestrator::{HarnessState, Orchestrator, RunSummary};
pub use pipeline::{CATALOG_LEN, CSV_HEADER, DetectorKind, PipelineSpec, catalog};
pub use recorder::{RecordOutcome, Recorder};
pub use report::{Report, write_error_block};
pub use runner::{Clock, RunResult, run, run_timed};

use std::io::{self, Write};

/// Usage line printed when no input file is given.
pub const USAGE: &str = "Usage: edgebench imageToLoad";

/// Print the usage line and the improper-invocation error block.
pub fn write_usage<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", USAGE)?;
    write_error_block(out, ErrorKind::ImproperInvocation)
}
