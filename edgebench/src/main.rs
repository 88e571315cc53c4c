//! edgebench CLI: prompts for the report name, CSV name and trial count,
//! then benchmarks every pipeline over the images given on the command
//! line.

use clap::Parser;
use edgebench::harness::{Clock, ErrorKind, HarnessConfig, Orchestrator, RunSettings, write_usage};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "edgebench")]
#[command(about = "Benchmark edge-detection pipelines over a set of images")]
#[command(version)]
struct Cli {
    /// Images to process, in CSV row order.
    files: Vec<PathBuf>,
}

fn main() {
    let clock = Clock::start();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    std::process::exit(run(cli, clock));
}

fn run(cli: Cli, clock: Clock) -> i32 {
    if cli.files.is_empty() {
        let mut out = io::stdout().lock();
        if let Err(e) = write_usage(&mut out) {
            log::error!("failed to print usage: {}", e);
        }
        return ErrorKind::ImproperInvocation.code();
    }

    let settings = {
        let mut input = io::stdin().lock();
        let mut output = io::stdout().lock();
        match RunSettings::prompt(&mut input, &mut output, cli.files) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                return e.exit_code();
            }
        }
    };

    let mut harness = Orchestrator::with_clock(HarnessConfig::default(), clock);
    match harness.run(&settings) {
        Ok(summary) => {
            log::info!(
                "report {} and CSV {} complete ({} images, {} write failures)",
                settings.report_name,
                settings.csv_name,
                summary.images_written,
                summary.write_failures
            );
            0
        }
        Err(e) => {
            log::error!("{}", e);
            e.exit_code()
        }
    }
}
