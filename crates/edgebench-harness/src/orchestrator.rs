//! Trial orchestrator
//!
//! Drives the nested loop trial × input file × pipeline. For every input
//! file a fresh [`TrialContext`] is decoded; every catalog pipeline is run
//! against it and recorded. Only setup and decode failures stop the run.

use crate::config::{ContextPolicy, HarnessConfig, RunSettings};
use crate::context::TrialContext;
use crate::csv::CsvTable;
use crate::error::ErrorKind;
use crate::pipeline::{PipelineSpec, catalog};
use crate::recorder::{RecordOutcome, Recorder};
use crate::report::Report;
use crate::runner::{Clock, run};
use crate::{HarnessError, HarnessResult};
use std::fs::File;
use std::io::BufWriter;

/// Orchestrator progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Idle,
    ReportOpened,
    TrialLoop { trial: u32 },
    FileLoop { trial: u32, file: usize },
    PipelineLoop { trial: u32, file: usize },
    Done,
    /// Stopped with the given exit code
    Failed(i32),
}

/// Counters for one completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub trials: u32,
    pub files: usize,
    pub runs: usize,
    pub failures: usize,
    pub write_failures: usize,
    pub skipped: usize,
    pub images_written: usize,
}

/// Runs the benchmark described by a [`RunSettings`]
#[derive(Debug)]
pub struct Orchestrator {
    config: HarnessConfig,
    catalog: Vec<PipelineSpec>,
    clock: Clock,
    state: HarnessState,
}

impl Orchestrator {
    pub fn new(config: HarnessConfig) -> Self {
        Self::with_clock(config, Clock::start())
    }

    /// Use an existing clock so timestamps count from an earlier start.
    pub fn with_clock(config: HarnessConfig, clock: Clock) -> Self {
        let catalog = catalog(&config.params);
        Orchestrator {
            config,
            catalog,
            clock,
            state: HarnessState::Idle,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn catalog(&self) -> &[PipelineSpec] {
        &self.catalog
    }

    pub fn state(&self) -> HarnessState {
        self.state
    }

    fn transition(&mut self, next: HarnessState) {
        log::debug!("harness state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn fail<T>(&mut self, err: HarnessError) -> HarnessResult<T> {
        self.transition(HarnessState::Failed(err.exit_code()));
        Err(err)
    }

    /// Run every trial.
    ///
    /// The report and CSV are created from `settings` (paths taken as
    /// given); images go to the configured output directory.
    pub fn run(&mut self, settings: &RunSettings) -> HarnessResult<RunSummary> {
        if settings.files.is_empty() {
            return self.fail(HarnessError::Input("no input files".to_string()));
        }

        let (mut report, mut csv) = match open_outputs(settings) {
            Ok(outputs) => outputs,
            Err(e) => return self.fail(e),
        };
        self.transition(HarnessState::ReportOpened);

        match self.trials(settings, &mut report, &mut csv) {
            Ok(summary) => {
                report.flush()?;
                csv.flush()?;
                self.transition(HarnessState::Done);
                log::info!(
                    "{} trial(s) done: {} runs, {} failed, {} images written",
                    summary.trials,
                    summary.runs,
                    summary.failures,
                    summary.images_written
                );
                Ok(summary)
            }
            Err(e) => {
                // Keep what was recorded before the failure.
                let _ = report.flush();
                let _ = csv.flush();
                self.fail(e)
            }
        }
    }

    fn trials(
        &mut self,
        settings: &RunSettings,
        report: &mut Report<BufWriter<File>>,
        csv: &mut CsvTable<BufWriter<File>>,
    ) -> HarnessResult<RunSummary> {
        let mut summary = RunSummary {
            files: settings.files.len(),
            ..RunSummary::default()
        };

        for trial in 0..settings.trials {
            self.transition(HarnessState::TrialLoop { trial });
            log::info!("starting trial {}", trial);
            report.trial_started(trial)?;

            for (i, path) in settings.files.iter().enumerate() {
                let file = i + 1;
                self.transition(HarnessState::FileLoop { trial, file });
                let mut ctx = match TrialContext::load(trial, file, path) {
                    Ok(ctx) => ctx,
                    Err(e) => {
                        log::error!("{}", e);
                        report.error(ErrorKind::LoadFailure)?;
                        return Err(e);
                    }
                };
                report.file_started(path)?;
                csv.start_row(trial, file)?;

                self.transition(HarnessState::PipelineLoop { trial, file });
                let mut recorder = Recorder::new(&self.config, report, csv);
                for spec in &self.catalog {
                    if self.config.context_policy == ContextPolicy::Isolated {
                        ctx.reset();
                    }
                    let result = run(spec, &mut ctx, &self.clock);
                    summary.runs += 1;
                    match recorder.record(spec, &result, path, trial)? {
                        RecordOutcome::Written { .. } => summary.images_written += 2,
                        RecordOutcome::Skipped => summary.skipped += 1,
                        RecordOutcome::Failed => summary.failures += 1,
                        RecordOutcome::WriteFailed(_) => summary.write_failures += 1,
                    }
                }
                csv.end_row()?;
            }

            csv.separator()?;
            report.trial_ended(trial)?;
            summary.trials += 1;
        }
        Ok(summary)
    }
}

fn open_outputs(
    settings: &RunSettings,
) -> HarnessResult<(Report<BufWriter<File>>, CsvTable<BufWriter<File>>)> {
    let mut report = Report::create(&settings.report_name)?;
    let mut csv = CsvTable::create(&settings.csv_name)?;
    report.write_header(&settings.report_name)?;
    csv.write_header()?;
    Ok((report, csv))
}
