//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while preparing regression fixtures
#[derive(Debug, Error)]
pub enum TestError {
    /// Failed to build a synthetic image
    #[error("failed to build synthetic image: {0}")]
    Synth(#[from] edgebench_core::Error),

    /// Failed to write an image
    #[error("failed to write image '{path}': {message}")]
    ImageWrite { path: String, message: String },

    /// Failed to create or clear a directory
    #[error("failed to prepare directory '{path}': {message}")]
    DirectoryCreate { path: String, message: String },
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
