//! Per-file working buffers
//!
//! A [`TrialContext`] owns the color and grayscale buffers of one input
//! file for one trial. It is built fresh for every file and lent to one
//! pipeline at a time by `&mut`.

use crate::{HarnessError, HarnessResult};
use edgebench_core::Pix;
use edgebench_io::IoError;
use std::path::{Path, PathBuf};

/// Decoded input and the buffers pipelines read and rewrite
#[derive(Debug, Clone)]
pub struct TrialContext {
    trial: u32,
    file_index: usize,
    input_path: PathBuf,
    color: Pix,
    gray: Pix,
    decoded_color: Pix,
    decoded_gray: Pix,
}

impl TrialContext {
    /// Decode `path` and derive the grayscale buffer.
    ///
    /// Grayscale files are expanded to color so every pipeline sees the
    /// same buffer layout.
    pub fn load(trial: u32, file_index: usize, path: impl AsRef<Path>) -> HarnessResult<Self> {
        let path = path.as_ref();
        let load_err = |source: IoError| HarnessError::Load {
            path: path.to_path_buf(),
            source,
        };
        let pix = edgebench_io::read_image(path).map_err(load_err)?;
        Self::from_pix(trial, file_index, path, &pix)
            .map_err(|e| load_err(IoError::Core(e)))
    }

    /// Build a context from an already decoded image.
    pub fn from_pix(
        trial: u32,
        file_index: usize,
        path: impl Into<PathBuf>,
        pix: &Pix,
    ) -> edgebench_core::Result<Self> {
        let color = pix.convert_to_color()?;
        let gray = color.convert_to_gray()?;
        Ok(TrialContext {
            trial,
            file_index,
            input_path: path.into(),
            decoded_color: color.clone(),
            decoded_gray: gray.clone(),
            color,
            gray,
        })
    }

    pub fn trial(&self) -> u32 {
        self.trial
    }

    /// One-based position of the input file on the command line.
    pub fn file_index(&self) -> usize {
        self.file_index
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// Current color buffer.
    pub fn color(&self) -> &Pix {
        &self.color
    }

    /// Current grayscale buffer.
    pub fn gray(&self) -> &Pix {
        &self.gray
    }

    /// Replace the color buffer and regenerate the grayscale buffer from it.
    pub fn set_color(&mut self, color: Pix) -> edgebench_core::Result<()> {
        self.gray = color.convert_to_gray()?;
        self.color = color;
        Ok(())
    }

    /// Restore both buffers to the decoded input.
    pub fn reset(&mut self) {
        self.color = self.decoded_color.clone();
        self.gray = self.decoded_gray.clone();
    }

    /// Whether the buffers still hold the decoded input.
    pub fn is_pristine(&self) -> bool {
        self.color.data() == self.decoded_color.data() && self.gray.data() == self.decoded_gray.data()
    }
}
