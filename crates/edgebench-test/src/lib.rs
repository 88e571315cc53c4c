//! edgebench-test - Regression test framework for edgebench
//!
//! Integration tests across the workspace share three things from here:
//!
//! - [`RegParams`]: numbered checks that accumulate failures instead of
//!   panicking, reported by [`RegParams::cleanup`]
//! - [`synth`]: deterministic synthetic input images
//! - [`scratch_dir`]: a fresh per-test output directory under `target/`
//!
//! # Usage
//!
//! ```ignore
//! use edgebench_test::{RegParams, synth};
//!
//! let mut rp = RegParams::new("blur");
//! let pix = synth::gray_gradient(32, 16).unwrap();
//! rp.compare_values(32.0, pix.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: set to "display" to keep intermediate images

mod error;
mod params;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use std::fs;
use std::path::PathBuf;

/// Get the path to the workspace root
fn workspace_root() -> PathBuf {
    // edgebench-test lives at crates/edgebench-test
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> PathBuf {
    workspace_root().join("target/regout")
}

/// Create an empty scratch directory for one test.
///
/// Any previous contents are removed, so repeated runs start clean.
pub fn scratch_dir(name: &str) -> TestResult<PathBuf> {
    let dir = regout_dir().join(name);
    let describe = |e: std::io::Error| TestError::DirectoryCreate {
        path: dir.display().to_string(),
        message: e.to_string(),
    };
    if dir.exists() {
        fs::remove_dir_all(&dir).map_err(describe)?;
    }
    fs::create_dir_all(&dir).map_err(describe)?;
    Ok(dir)
}

/// Route `log` output through the test harness' captured stderr.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
