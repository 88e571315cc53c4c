//! Error types for edgebench-harness
//!
//! Report text and process exit codes are keyed by [`ErrorKind`]; the
//! richer error enums below carry the cause and map onto a kind.

use crate::pipeline::DetectorKind;
use edgebench_filter::{FilterError, FilterKind};
use edgebench_io::IoError;
use std::path::PathBuf;
use thiserror::Error;

/// Closed set of failure classes written to the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An input image could not be decoded
    LoadFailure,
    /// Bad invocation or a pipeline that could not run
    ImproperInvocation,
    /// An output file could not be written
    WriteFailure,
}

impl ErrorKind {
    /// Numeric code printed in the report and used as exit status.
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::LoadFailure => -1,
            ErrorKind::ImproperInvocation => -2,
            ErrorKind::WriteFailure => -3,
        }
    }

    /// Text following `This means: ` in the report.
    pub fn meaning(self) -> &'static str {
        match self {
            ErrorKind::LoadFailure => "Error loading file.",
            ErrorKind::ImproperInvocation => "Improper loading.",
            ErrorKind::WriteFailure => "Unable to output to image.",
        }
    }

    /// Inverse of [`ErrorKind::code`].
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(ErrorKind::LoadFailure),
            -2 => Some(ErrorKind::ImproperInvocation),
            -3 => Some(ErrorKind::WriteFailure),
            _ => None,
        }
    }
}

/// Failure of a single pipeline run; recorded and skipped
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Pre-smoothing failed
    #[error("{filter:?} filter failed: {source}")]
    FilterFailure {
        filter: FilterKind,
        #[source]
        source: FilterError,
    },

    /// Edge detection failed or panicked
    #[error("{detector:?} detector failed: {message}")]
    DetectorFailure {
        detector: DetectorKind,
        message: String,
    },
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ImproperInvocation
    }
}

/// Errors that end a harness run
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Missing input files or an unparsable prompt answer
    #[error("improper invocation: {0}")]
    Input(String),

    /// An input image could not be decoded
    #[error("failed to load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// The report or CSV file could not be created
    #[error("cannot create {}: {source}", .path.display())]
    Setup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the report or CSV failed mid-run
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HarnessError::Input(_) => ErrorKind::ImproperInvocation,
            HarnessError::Load { .. } => ErrorKind::LoadFailure,
            HarnessError::Setup { .. } | HarnessError::Io(_) => ErrorKind::WriteFailure,
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        self.kind().code()
    }
}

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;
