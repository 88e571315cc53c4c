//! CSV timing table
//!
//! One header row, then one row per (trial, file) holding the elapsed
//! milliseconds of every pipeline in catalog order, and an empty row after
//! each trial.

use crate::pipeline::CSV_HEADER;
use crate::report::format_ms;
use crate::{HarnessError, HarnessResult};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Append-only CSV writer that buffers the open row
#[derive(Debug)]
pub struct CsvTable<W: Write> {
    out: W,
    row: Option<Vec<String>>,
    rows_written: usize,
}

impl CsvTable<BufWriter<File>> {
    /// Create (or truncate) the CSV file.
    pub fn create(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| HarnessError::Setup {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(CsvTable::new(BufWriter::new(file)))
    }
}

impl<W: Write> CsvTable<W> {
    pub fn new(out: W) -> Self {
        CsvTable {
            out,
            row: None,
            rows_written: 0,
        }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", CSV_HEADER)
    }

    /// Open the row for one (trial, file) pair. A row still open is ended
    /// first.
    pub fn start_row(&mut self, trial: u32, file_index: usize) -> io::Result<()> {
        self.end_row()?;
        self.row = Some(vec![format!("Trial #{} File #{}", trial, file_index)]);
        Ok(())
    }

    /// Append a timing cell to the open row; ignored when no row is open.
    pub fn push_cell(&mut self, ms: f64) {
        if let Some(row) = self.row.as_mut() {
            row.push(format_ms(ms));
        }
    }

    /// Number of timing cells in the open row.
    pub fn open_cells(&self) -> usize {
        self.row.as_ref().map_or(0, |r| r.len() - 1)
    }

    /// Write out the open row, if any.
    pub fn end_row(&mut self) -> io::Result<()> {
        if let Some(row) = self.row.take() {
            writeln!(self.out, "{}", row.join(", "))?;
            self.rows_written += 1;
        }
        Ok(())
    }

    /// Blank row separating trials.
    pub fn separator(&mut self) -> io::Result<()> {
        self.end_row()?;
        writeln!(self.out)
    }

    /// Data rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
