//! Human-readable run report
//!
//! The report is append-only text. Its line formats are consumed by people
//! and scripts alike, so they are fixed:
//!
//! ```text
//! Edge Detection Analysis Data:
//! Report file name: <name>
//!
//!
//! Starting trial <n>
//! Processing File: <path>
//! Starting <label>. Initial Time: <ms> ms
//! <label> finished. Final Time: <ms> ms
//! <label> took <ms> ms to complete.
//! Trial #<n> ended.
//!
//! ```

use crate::error::ErrorKind;
use crate::{HarnessError, HarnessResult};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Format a millisecond value the way the report and CSV print it.
pub fn format_ms(ms: f64) -> String {
    format!("{:.3}", ms)
}

/// Write the two-line error block for `kind`.
pub fn write_error_block<W: Write>(out: &mut W, kind: ErrorKind) -> io::Result<()> {
    writeln!(
        out,
        "There was an error in processing. Error Code: {}",
        kind.code()
    )?;
    writeln!(out, "This means: {}", kind.meaning())
}

/// Append-only report writer
#[derive(Debug)]
pub struct Report<W: Write> {
    out: W,
}

impl Report<BufWriter<File>> {
    /// Create (or truncate) the report file.
    pub fn create(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| HarnessError::Setup {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Report::new(BufWriter::new(file)))
    }
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Report { out }
    }

    pub fn write_header(&mut self, report_name: &str) -> io::Result<()> {
        writeln!(self.out, "Edge Detection Analysis Data: ")?;
        writeln!(self.out, "Report file name: {}", report_name)?;
        write!(self.out, "\n\n")
    }

    pub fn trial_started(&mut self, trial: u32) -> io::Result<()> {
        writeln!(self.out, "Starting trial {}", trial)
    }

    pub fn file_started(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.out, "Processing File: {}", path.display())
    }

    /// The three timing lines of one pipeline run.
    pub fn pipeline_timing(
        &mut self,
        label: &str,
        started_ms: f64,
        finished_ms: f64,
        elapsed_ms: f64,
    ) -> io::Result<()> {
        writeln!(
            self.out,
            "Starting {}. Initial Time: {} ms",
            label,
            format_ms(started_ms)
        )?;
        writeln!(
            self.out,
            "{} finished. Final Time: {} ms",
            label,
            format_ms(finished_ms)
        )?;
        writeln!(
            self.out,
            "{} took {} ms to complete.",
            label,
            format_ms(elapsed_ms)
        )
    }

    pub fn error(&mut self, kind: ErrorKind) -> io::Result<()> {
        write_error_block(&mut self.out, kind)
    }

    /// Trial trailer followed by a blank line.
    pub fn trial_ended(&mut self, trial: u32) -> io::Result<()> {
        writeln!(self.out, "Trial #{} ended.", trial)?;
        writeln!(self.out)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
