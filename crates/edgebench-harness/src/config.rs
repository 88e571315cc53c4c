//! Harness configuration
//!
//! [`HarnessConfig`] holds settings fixed before a run starts (where
//! images go, how they are encoded, detector parameters). [`RunSettings`]
//! holds what the operator supplies per run: report and CSV names, the
//! trial count and the input files.

use crate::{HarnessError, HarnessResult};
use edgebench_filter::{BlurParams, CannyParams, GaborParams, LaplacianParams, SobelParams};
use edgebench_io::WriteOptions;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// How the per-file image buffers are shared between pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextPolicy {
    /// Pipelines see the buffers left behind by earlier pipelines on the
    /// same file (Laplacian and Sobel smooth the color buffer in place).
    #[default]
    Cascade,
    /// Every pipeline starts from the freshly decoded buffers.
    Isolated,
}

/// Parameters of every filter and detector in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PipelineParams {
    pub blur: BlurParams,
    pub canny: CannyParams,
    pub laplacian: LaplacianParams,
    pub sobel: SobelParams,
    pub gabor: GaborParams,
}

/// Settings fixed for the lifetime of a harness run
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Directory receiving edge images
    pub output_dir: PathBuf,
    /// JPEG quality for lossy outputs
    pub jpeg_quality: u8,
    pub context_policy: ContextPolicy,
    pub params: PipelineParams,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            output_dir: PathBuf::from("."),
            jpeg_quality: 100,
            context_policy: ContextPolicy::Cascade,
            params: PipelineParams::default(),
        }
    }
}

impl HarnessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_context_policy(mut self, policy: ContextPolicy) -> Self {
        self.context_policy = policy;
        self
    }

    pub fn with_params(mut self, params: PipelineParams) -> Self {
        self.params = params;
        self
    }

    /// Encoder options derived from this configuration.
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            jpeg_quality: self.jpeg_quality,
        }
    }
}

/// Per-run answers supplied by the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub report_name: String,
    pub csv_name: String,
    pub trials: u32,
    pub files: Vec<PathBuf>,
}

impl RunSettings {
    pub fn new(
        report_name: impl Into<String>,
        csv_name: impl Into<String>,
        trials: u32,
        files: Vec<PathBuf>,
    ) -> Self {
        RunSettings {
            report_name: report_name.into(),
            csv_name: csv_name.into(),
            trials,
            files,
        }
    }

    /// Ask for the report name, CSV name and trial count.
    ///
    /// Each prompt is written to `output` and answered by one line of
    /// `input`.
    pub fn prompt<R: BufRead, W: Write>(
        input: &mut R,
        output: &mut W,
        files: Vec<PathBuf>,
    ) -> HarnessResult<Self> {
        let report_name = ask(input, output, "Enter report file name: ")?;
        let csv_name = ask(input, output, "Enter name of CSV: ")?;
        let answer = ask(input, output, "How many trials do you want?")?;
        let trials = parse_trial_count(&answer)?;
        Ok(Self::new(report_name, csv_name, trials, files))
    }
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> HarnessResult<String> {
    writeln!(output, "{}", question)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).map_err(|e| {
        HarnessError::Input(format!("unable to read answer to {:?}: {}", question.trim(), e))
    })?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Parse the trial count answer; surrounding whitespace is ignored.
pub fn parse_trial_count(text: &str) -> HarnessResult<u32> {
    let text = text.trim();
    text.parse::<u32>()
        .map_err(|e| HarnessError::Input(format!("invalid trial count {:?}: {}", text, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.jpeg_quality, 100);
        assert_eq!(config.context_policy, ContextPolicy::Cascade);
        assert_eq!(config.params.canny.low_threshold, 0.0);
        assert_eq!(config.params.canny.ratio, 3.0);
        assert!(!config.params.blur.box_normalize);
        assert_eq!(config.params.gabor.ksize, 31);
    }

    #[test]
    fn test_builder() {
        let config = HarnessConfig::new()
            .with_output_dir("/tmp/out")
            .with_jpeg_quality(80)
            .with_context_policy(ContextPolicy::Isolated);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.write_options().jpeg_quality, 80);
        assert_eq!(config.context_policy, ContextPolicy::Isolated);
    }

    #[test]
    fn test_parse_trial_count() {
        assert_eq!(parse_trial_count(" 3\n").unwrap(), 3);
        assert_eq!(parse_trial_count("0").unwrap(), 0);
        assert!(parse_trial_count("three").is_err());
        assert!(parse_trial_count("-1").is_err());
        assert!(parse_trial_count("").is_err());
        assert_eq!(parse_trial_count("x").unwrap_err().exit_code(), -2);
    }

    #[test]
    fn test_prompt() {
        let mut input = "report.txt\ntimes.csv\n2\n".as_bytes();
        let mut output = Vec::new();
        let settings =
            RunSettings::prompt(&mut input, &mut output, vec![PathBuf::from("a.png")]).unwrap();
        assert_eq!(settings.report_name, "report.txt");
        assert_eq!(settings.csv_name, "times.csv");
        assert_eq!(settings.trials, 2);
        let shown = String::from_utf8(output).unwrap();
        assert_eq!(
            shown,
            "Enter report file name: \nEnter name of CSV: \nHow many trials do you want?\n"
        );
    }

    #[test]
    fn test_prompt_bad_count() {
        let mut input = "r\nc\nmany\n".as_bytes();
        let err = RunSettings::prompt(&mut input, &mut Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, HarnessError::Input(_)));
    }

    #[test]
    fn test_prompt_unreadable_answer() {
        // read_line rejects invalid UTF-8
        let mut input: &[u8] = &[b'r', b'\n', 0xff, 0xfe, b'\n'];
        let mut output = Vec::new();
        let err = RunSettings::prompt(&mut input, &mut output, Vec::new()).unwrap_err();
        assert!(matches!(err, HarnessError::Input(_)));
        assert_eq!(err.exit_code(), -2);
    }
}
