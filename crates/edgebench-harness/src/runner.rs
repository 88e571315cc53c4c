//! Timed pipeline runner
//!
//! [`run`] brackets the smoothing and detection steps of one pipeline with
//! monotonic timestamps. Nothing else (decoding, writing, reporting) is
//! inside the timed span.

use crate::context::TrialContext;
use crate::error::PipelineError;
use crate::pipeline::{DetectorKind, PipelineSpec};
use edgebench_core::Pix;
use edgebench_filter::{FilterKind, apply_filter_with, canny_masked, gabor, laplacian, sobel};
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

/// Monotonic clock anchored at harness start
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Clock {
            origin: Instant::now(),
        }
    }

    /// Time since the clock was started.
    pub fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::start()
    }
}

/// Outcome of one pipeline execution
#[derive(Debug)]
pub struct RunResult {
    /// Edge image, present on success
    pub output: Option<Pix>,
    /// Offset of the start instant from harness start
    pub started_at: Duration,
    /// Offset of the end instant from harness start
    pub finished_at: Duration,
    pub elapsed: Duration,
    pub error: Option<PipelineError>,
}

impl RunResult {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    pub fn elapsed_ms(&self) -> f64 {
        as_ms(self.elapsed)
    }

    pub fn started_ms(&self) -> f64 {
        as_ms(self.started_at)
    }

    pub fn finished_ms(&self) -> f64 {
        as_ms(self.finished_at)
    }
}

fn as_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Run one pipeline against the context and time it.
///
/// Failures, including panics inside the image operations, come back in
/// [`RunResult::error`]; they never propagate.
pub fn run(spec: &PipelineSpec, ctx: &mut TrialContext, clock: &Clock) -> RunResult {
    run_timed(spec, clock, || execute(spec, ctx))
}

/// Time `body` as the work of `spec`.
///
/// A panic in `body` is caught and reported as a
/// [`PipelineError::DetectorFailure`] carrying the panic message.
pub fn run_timed<F>(spec: &PipelineSpec, clock: &Clock, body: F) -> RunResult
where
    F: FnOnce() -> Result<Pix, PipelineError>,
{
    let started_at = clock.now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(body));
    let finished_at = clock.now();

    let (output, error) = match outcome {
        Ok(Ok(pix)) => (Some(pix), None),
        Ok(Err(e)) => (None, Some(e)),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic".to_string());
            let error = PipelineError::DetectorFailure {
                detector: spec.detector,
                message,
            };
            (None, Some(error))
        }
    };

    log::debug!(
        "{} ran in {:.3} ms{}",
        spec.label(),
        as_ms(finished_at.saturating_sub(started_at)),
        if error.is_some() { " (failed)" } else { "" }
    );

    RunResult {
        output,
        started_at,
        finished_at,
        elapsed: finished_at.saturating_sub(started_at),
        error,
    }
}

fn smooth(filter: FilterKind, spec: &PipelineSpec, pix: &Pix) -> Result<Pix, PipelineError> {
    apply_filter_with(filter, pix, &spec.params.blur)
        .map_err(|source| PipelineError::FilterFailure { filter, source })
}

fn execute(spec: &PipelineSpec, ctx: &mut TrialContext) -> Result<Pix, PipelineError> {
    let detector = spec.detector;
    let failed = |e: &dyn std::fmt::Display| PipelineError::DetectorFailure {
        detector,
        message: e.to_string(),
    };
    let params = &spec.params;

    match detector {
        // Smooth the color buffer in place; later pipelines on this file see it.
        DetectorKind::Laplacian | DetectorKind::Sobel => {
            if let Some(filter) = spec.filter {
                let smoothed = smooth(filter, spec, ctx.color())?;
                ctx.set_color(smoothed).map_err(|e| failed(&e))?;
            }
            let result = if detector == DetectorKind::Laplacian {
                laplacian(ctx.gray(), &params.laplacian)
            } else {
                sobel(ctx.gray(), &params.sobel)
            };
            result.map_err(|e| failed(&e))
        }
        // Detect on a smoothed copy, mask the unsmoothed gray buffer.
        DetectorKind::Canny => {
            let detect_on = match spec.filter {
                Some(filter) => smooth(filter, spec, ctx.gray())?,
                None => ctx.gray().clone(),
            };
            canny_masked(ctx.gray(), &detect_on, &params.canny).map_err(|e| failed(&e))
        }
        DetectorKind::Gabor => {
            let input = match spec.filter {
                Some(filter) => smooth(filter, spec, ctx.gray())?,
                None => ctx.gray().clone(),
            };
            gabor(&input, &params.gabor).map_err(|e| failed(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineParams;
    use crate::pipeline::catalog;
    use edgebench_core::PixelDepth;

    fn scene() -> TrialContext {
        let mut data = Vec::new();
        for y in 0..12u32 {
            for x in 0..12u32 {
                let v = if (4..8).contains(&x) && (4..8).contains(&y) { 200 } else { 30 };
                data.extend_from_slice(&[v, v / 2, v / 3]);
            }
        }
        let pix = Pix::from_raw(12, 12, PixelDepth::Bit32, data).unwrap();
        TrialContext::from_pix(0, 1, "scene.png", &pix).unwrap()
    }

    #[test]
    fn test_every_catalog_entry_succeeds() {
        let clock = Clock::start();
        let mut ctx = scene();
        for spec in catalog(&PipelineParams::default()) {
            let result = run(&spec, &mut ctx, &clock);
            assert!(result.success(), "{}: {:?}", spec.label(), result.error);
            let out = result.output.unwrap();
            assert_eq!((out.width(), out.height()), (12, 12));
            assert_eq!(out.depth(), PixelDepth::Bit8);
            assert!(result.finished_at >= result.started_at);
            assert_eq!(result.elapsed, result.finished_at - result.started_at);
        }
    }

    #[test]
    fn test_laplacian_cascades_into_context() {
        let clock = Clock::start();
        let mut ctx = scene();
        let spec = catalog(&PipelineParams::default())[0];
        run(&spec, &mut ctx, &clock);
        assert!(!ctx.is_pristine());
    }

    #[test]
    fn test_canny_and_gabor_leave_context() {
        let clock = Clock::start();
        let specs = catalog(&PipelineParams::default());
        for spec in specs.iter().filter(|s| {
            matches!(s.detector, DetectorKind::Canny | DetectorKind::Gabor)
        }) {
            let mut ctx = scene();
            run(spec, &mut ctx, &clock);
            assert!(ctx.is_pristine(), "{}", spec.label());
        }
    }

    #[test]
    fn test_filter_failure_reported() {
        let clock = Clock::start();
        let mut params = PipelineParams::default();
        params.blur.ksize = 4;
        let spec = catalog(&params)[3];
        let result = run(&spec, &mut scene(), &clock);
        assert!(!result.success());
        assert!(result.output.is_none());
        assert!(matches!(
            result.error,
            Some(PipelineError::FilterFailure {
                filter: FilterKind::Gaussian,
                ..
            })
        ));
    }

    #[test]
    fn test_detector_failure_reported() {
        let clock = Clock::start();
        let mut params = PipelineParams::default();
        params.gabor.bank_step = 0.0;
        let spec = catalog(&params)[9];
        let result = run(&spec, &mut scene(), &clock);
        assert!(matches!(
            result.error,
            Some(PipelineError::DetectorFailure {
                detector: DetectorKind::Gabor,
                ..
            })
        ));
    }

    #[test]
    fn test_panic_reported_as_detector_failure() {
        let clock = Clock::start();
        let specs = catalog(&PipelineParams::default());
        let result = run_timed(&specs[6], &clock, || panic!("kernel exploded"));
        assert!(!result.success());
        assert!(result.output.is_none());
        match &result.error {
            Some(PipelineError::DetectorFailure { detector, message }) => {
                assert_eq!(*detector, DetectorKind::Sobel);
                assert_eq!(message, "kernel exploded");
            }
            other => panic!("expected DetectorFailure, got {:?}", other),
        }
        assert!(result.finished_at >= result.started_at);

        let formatted = run_timed(&specs[9], &clock, || panic!("bank {} of {}", 2, 1));
        assert!(matches!(
            formatted.error,
            Some(PipelineError::DetectorFailure { ref message, .. }) if message == "bank 2 of 1"
        ));
    }

    #[test]
    fn test_pipelines_after_panic_still_run() {
        let clock = Clock::start();
        let mut ctx = scene();
        let specs = catalog(&PipelineParams::default());
        let first = run_timed(&specs[0], &clock, || panic!("first pipeline"));
        assert!(!first.success());
        assert!(ctx.is_pristine());
        for spec in &specs[1..] {
            let result = run(spec, &mut ctx, &clock);
            assert!(result.success(), "{}: {:?}", spec.label(), result.error);
        }
    }
}
