//! Output recorder
//!
//! Turns a [`RunResult`] into report lines, a CSV cell and, on success,
//! the edge image plus its inverse on disk.

use crate::config::HarnessConfig;
use crate::csv::CsvTable;
use crate::error::ErrorKind;
use crate::pipeline::PipelineSpec;
use crate::report::Report;
use crate::runner::RunResult;
use crate::HarnessResult;
use edgebench_io::{IoError, format_from_path, write_image_with};
use std::io::Write;
use std::path::{Path, PathBuf};

/// What happened to the images of one pipeline run
#[derive(Debug)]
pub enum RecordOutcome {
    /// Edge image and inverse were written
    Written { edge: PathBuf, inverse: PathBuf },
    /// The input path vanished (or has no file name); nothing written
    Skipped,
    /// The pipeline failed; nothing written
    Failed,
    /// Writing an image failed
    WriteFailed(IoError),
}

/// Records results into the report, the CSV table and the output directory
pub struct Recorder<'a, R: Write, C: Write> {
    config: &'a HarnessConfig,
    report: &'a mut Report<R>,
    csv: &'a mut CsvTable<C>,
}

impl<'a, R: Write, C: Write> Recorder<'a, R, C> {
    pub fn new(
        config: &'a HarnessConfig,
        report: &'a mut Report<R>,
        csv: &'a mut CsvTable<C>,
    ) -> Self {
        Recorder {
            config,
            report,
            csv,
        }
    }

    /// Record one run.
    ///
    /// Pipeline and image-write failures are written to the report and
    /// returned as outcomes; only failures to write the report itself are
    /// errors.
    pub fn record(
        &mut self,
        spec: &PipelineSpec,
        result: &RunResult,
        input_path: &Path,
        trial: u32,
    ) -> HarnessResult<RecordOutcome> {
        let label = spec.label();
        self.report.pipeline_timing(
            &label,
            result.started_ms(),
            result.finished_ms(),
            result.elapsed_ms(),
        )?;
        self.csv.push_cell(result.elapsed_ms());

        if let Some(err) = &result.error {
            log::warn!("{} failed on {}: {}", label, input_path.display(), err);
            self.report.error(err.kind())?;
            return Ok(RecordOutcome::Failed);
        }
        let Some(edge) = &result.output else {
            return Ok(RecordOutcome::Failed);
        };

        let file_name = match input_path.file_name() {
            Some(name) if input_path.exists() => name.to_string_lossy().into_owned(),
            _ => {
                log::warn!(
                    "{} no longer exists, not writing {} output",
                    input_path.display(),
                    label
                );
                return Ok(RecordOutcome::Skipped);
            }
        };

        let format = format_from_path(input_path);
        let options = self.config.write_options();
        let edge_path = self.config.output_dir.join(spec.base_name(trial, &file_name));
        let inverse_path = self.config.output_dir.join(spec.inverse_name(trial, &file_name));

        let written = write_image_with(edge, &edge_path, format, &options)
            .and_then(|()| write_image_with(&edge.invert(), &inverse_path, format, &options));
        match written {
            Ok(()) => Ok(RecordOutcome::Written {
                edge: edge_path,
                inverse: inverse_path,
            }),
            Err(e) => {
                log::warn!("unable to write {} output: {}", label, e);
                self.report.error(ErrorKind::WriteFailure)?;
                Ok(RecordOutcome::WriteFailed(e))
            }
        }
    }
}
