//! Command-line interface definitions for dupewise.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! The CLI follows standard conventions with global options (verbosity, error format) and
//! a `scan` subcommand.
//!
//! # Example
//!
//! ```bash
//! # Scan the current directory with a text report
//! dupewise scan
//!
//! # Scan a project subdirectory and emit JSON for scripting
//! dupewise scan photos --workspace ~/projects/site --output json
//!
//! # Only consider large media files
//! dupewise scan ~/Downloads --min-size 1MB --ext .mp4 --ext .mkv
//!
//! # Verbose mode for debugging
//! dupewise -v scan ~/Downloads
//! ```

use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::Config;

/// Duplicate file finder that ranks which copy to keep.
///
/// dupewise groups byte-identical files using BLAKE3 content digests and
/// scores every copy with location, naming and recency heuristics.
#[derive(Debug, Parser)]
#[command(name = "dupewise")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory for duplicate files
    Scan(ScanArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan, relative to the workspace root
    #[arg(value_name = "DIRECTORY", default_value = ".")]
    pub directory: PathBuf,

    /// Workspace root that relative directories are resolved against
    ///
    /// Defaults to the current working directory.
    #[arg(long, value_name = "DIR", env = "DUPEWISE_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Minimum file size to consider (e.g., 100, 1KB, 1MiB) [default: 1024]
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Maximum file size to consider
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Only consider files with these extensions (repeatable, or comma separated)
    #[arg(long = "ext", value_name = "EXT", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Maximum directory depth below the scanned directory [default: 64]
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Follow symbolic links during scan
    ///
    /// Warning: May visit the same file twice if links point inside the tree.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Number of I/O threads for hashing [default: 4]
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ScanArgs {
    /// Resolve the scan root from the workspace and directory arguments.
    ///
    /// An absolute `DIRECTORY` is used as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if no workspace was given and the current directory
    /// cannot be determined.
    pub fn resolve_root(&self) -> std::io::Result<PathBuf> {
        if self.directory.is_absolute() {
            return Ok(self.directory.clone());
        }
        let workspace = match &self.workspace {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        Ok(join_directory(&workspace, &self.directory))
    }

    /// Apply the flags given on the command line over `config`.
    #[must_use]
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(min) = self.min_size {
            config.min_size = min;
        }
        if self.max_size.is_some() {
            config.max_size = self.max_size;
        }
        if !self.extensions.is_empty() {
            config.extensions = self.extensions.clone();
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        if self.follow_symlinks {
            config.follow_symlinks = true;
        }
        if let Some(threads) = self.io_threads {
            config.io_threads = threads;
        }
        config
    }
}

fn join_directory(workspace: &Path, directory: &Path) -> PathBuf {
    if directory == Path::new(".") {
        workspace.to_path_buf()
    } else {
        workspace.join(directory)
    }
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets, one row per file
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a size argument such as `4096`, `1KB`, `1.5 MiB` into bytes.
///
/// Decimal (`KB`, `MB`, ...) and binary (`KiB`, `MiB`, ...) units are
/// accepted in any case; a bare number is a byte count.
///
/// ```
/// use dupewise::cli::parse_size;
///
/// assert_eq!(parse_size("4KiB"), Ok(4096));
/// assert_eq!(parse_size("2 mb"), Ok(2_000_000));
/// ```
///
/// # Errors
///
/// Returns a message naming the argument if it is empty, negative, or has
/// an unknown unit.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("size cannot be empty".to_string());
    }
    trimmed
        .parse::<ByteSize>()
        .map(|size| size.as_u64())
        .map_err(|e| format!("invalid size '{trimmed}': {e}"))
}
