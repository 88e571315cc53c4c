//! Pipeline catalog
//!
//! A [`PipelineSpec`] pairs an edge detector with an optional smoothing
//! filter and the parameters both use. [`catalog`] returns the fixed set
//! of pipelines in CSV column order; that order is part of the CSV
//! format and must not change.

use crate::config::PipelineParams;
use edgebench_filter::FilterKind;

/// Edge detector family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectorKind {
    Laplacian,
    Canny,
    Sobel,
    Gabor,
}

impl DetectorKind {
    /// Token used in output file names.
    pub fn token(self) -> &'static str {
        match self {
            DetectorKind::Laplacian => "laplace",
            DetectorKind::Canny => "canny",
            DetectorKind::Sobel => "sobel",
            DetectorKind::Gabor => "gabor",
        }
    }

    /// Name used in report lines.
    pub fn label(self) -> &'static str {
        match self {
            DetectorKind::Laplacian => "Laplacian",
            DetectorKind::Canny => "Canny",
            DetectorKind::Sobel => "Sobel",
            DetectorKind::Gabor => "Gabor filter-based edge detector",
        }
    }
}

/// Number of pipelines in the catalog (and timing cells per CSV row).
pub const CATALOG_LEN: usize = 10;

/// CSV header row, without the line terminator.
pub const CSV_HEADER: &str = "Trial #, Laplacian w/ Gaussian Blur, Laplacian w/ Normalized Box Filter, \
Laplacian w/ Box Filter, Canny w/ Gaussian Blur, Canny w/ Normalized Box Filter, Canny w/ Box Filter, \
Sobel w/Gaussian Blur, Sobel w/ Normalized Box Filter, Sobel w/ Box Filter, \
Gabor filter-based edge detector w/ no additional filtering";

/// One (filter, detector, parameters) combination
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSpec {
    pub detector: DetectorKind,
    pub filter: Option<FilterKind>,
    pub params: PipelineParams,
}

impl PipelineSpec {
    pub fn new(detector: DetectorKind, filter: Option<FilterKind>, params: PipelineParams) -> Self {
        PipelineSpec {
            detector,
            filter,
            params,
        }
    }

    /// Human-readable name used in report lines,
    /// e.g. `Canny w/ Normalized Box Filter`.
    pub fn label(&self) -> String {
        let suffix = match self.filter {
            Some(FilterKind::Gaussian) => "Gaussian Blur",
            Some(FilterKind::NormalizedBox) => "Normalized Box Filter",
            Some(FilterKind::Box) => "Box Filter",
            None => "no additional filtering",
        };
        format!("{} w/ {}", self.detector.label(), suffix)
    }

    /// Column title of this pipeline in the CSV header.
    pub fn column(&self) -> String {
        // the header has no space in this one column
        if self.detector == DetectorKind::Sobel && self.filter == Some(FilterKind::Gaussian) {
            return "Sobel w/Gaussian Blur".to_string();
        }
        self.label()
    }

    fn prefix(&self, trial: u32) -> String {
        match self.filter {
            Some(filter) => format!("trial_{}_{}_{}", trial, self.detector.token(), filter.token()),
            None => format!("trial_{}_{}", trial, self.detector.token()),
        }
    }

    /// Output file name of the edge image,
    /// `trial_<t>_<detector>_<filter>_<file name>`.
    pub fn base_name(&self, trial: u32, file_name: &str) -> String {
        format!("{}_{}", self.prefix(trial), file_name)
    }

    /// Output file name of the inverted edge image, with `_inv` after the
    /// pipeline segment.
    pub fn inverse_name(&self, trial: u32, file_name: &str) -> String {
        format!("{}_inv_{}", self.prefix(trial), file_name)
    }
}

/// The pipeline catalog in CSV column order: Laplacian, Canny and Sobel
/// each after Gaussian, normalized box and box smoothing, then Gabor
/// without smoothing.
pub fn catalog(params: &PipelineParams) -> Vec<PipelineSpec> {
    let mut specs = Vec::with_capacity(CATALOG_LEN);
    for detector in [DetectorKind::Laplacian, DetectorKind::Canny, DetectorKind::Sobel] {
        for filter in FilterKind::ALL {
            specs.push(PipelineSpec::new(detector, Some(filter), *params));
        }
    }
    specs.push(PipelineSpec::new(DetectorKind::Gabor, None, *params));
    specs
}
