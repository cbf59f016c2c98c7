//! dupewise - duplicate file finder that ranks which copy to keep.
//!
//! Finds byte-identical files with BLAKE3 content hashing, scores every copy
//! with location, naming and recency heuristics, and reports which copy to
//! keep and how much space the others waste.
//!
//! The pipeline is walker → size grouping → hashing → scoring → report; see
//! [`duplicates::DuplicateFinder`] for the library entry point.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{IsTerminal, Write};
use std::sync::Arc;

use anyhow::Context;

use crate::cli::{Cli, Commands, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, TextOutput};
use crate::progress::{Progress, ProgressCallback};

/// Run the command described by `cli` and return the process exit code.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, the scan root is
/// unusable, the scan is interrupted, or the report cannot be written.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Scan(args) => run_scan(&args, cli.quiet),
    }
}

fn run_scan(args: &ScanArgs, quiet: bool) -> anyhow::Result<ExitCode> {
    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    let config = args.apply_to(config);
    log::debug!("Effective configuration: {:?}", config);

    let root = args
        .resolve_root()
        .context("Failed to determine the workspace directory")?;

    let handler = signal::install_handler();
    let show_progress = !quiet && std::io::stderr().is_terminal();
    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(!show_progress));

    let finder_config = FinderConfig::default()
        .with_io_threads(config.io_threads)
        .with_walker_config(config.walker_config())
        .with_shutdown_flag(handler.flag())
        .with_progress_callback(progress);

    let report = DuplicateFinder::new(finder_config)
        .find_duplicates(&root)
        .with_context(|| format!("Failed to scan {}", root.display()))?;

    let exit_code = ExitCode::from_report(&report);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.output {
        OutputFormat::Text => TextOutput::new(&report)
            .write_to(&mut out)
            .context("Failed to write report")?,
        OutputFormat::Json => JsonOutput::new(&report, exit_code)
            .write_to(&mut out, true)
            .context("Failed to write JSON report")?,
        OutputFormat::Csv => CsvOutput::new(&report.groups)
            .write_to(&mut out)
            .context("Failed to write CSV report")?,
    }
    out.flush().context("Failed to flush output")?;

    log::info!("{}", report.summary_line());
    Ok(exit_code)
}
