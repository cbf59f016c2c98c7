//! Duplicate finder implementation with multi-phase detection.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Walk**: collect candidate files from the root (size/extension filters)
//! 2. **Size grouping**: drop every file whose size is unique
//! 3. **Hashing**: BLAKE3 digest of files inside size buckets, grouped by digest
//! 4. **Scoring**: rank each group's members and suggest an action
//! 5. **Report**: totals and corpus-wide recommendations
//!
//! The walk completes before grouping starts, so bucket membership is final
//! when hashing begins.
//!
//! # Example
//!
//! ```no_run
//! use dupewise::duplicates::{DuplicateFinder, FinderConfig};
//! use dupewise::scanner::WalkerConfig;
//! use std::path::Path;
//!
//! let config = FinderConfig::default()
//!     .with_walker_config(WalkerConfig::default().with_min_size(100))
//!     .with_io_threads(4);
//! let finder = DuplicateFinder::new(config);
//!
//! let report = finder.find_duplicates(Path::new("/some/path")).unwrap();
//! println!("{}", report.summary_line());
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use super::groups::group_by_size;
use super::hashing::{group_by_hash, HashConfig};
use super::report::{aggregate, DuplicateReport, ScanStats};
use super::scoring::{PriorityScorer, ScoringContext};
use crate::progress::ProgressCallback;
use crate::scanner::{FileRecord, Hasher, ScanError, SkipReason, WalkEntry, Walker, WalkerConfig};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of I/O threads for parallel hashing.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Reference time for recency scoring; `None` means "now" at scan start.
    pub reference_time: Option<SystemTime>,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("walker_config", &self.walker_config)
            .field("reference_time", &self.reference_time)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            walker_config: WalkerConfig::default(),
            reference_time: None,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Create a new configuration with custom I/O thread count.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Pin the reference time used by recency rules.
    #[must_use]
    pub fn with_reference_time(mut self, now: SystemTime) -> Self {
        self.reference_time = Some(now);
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn hash_config(&self) -> HashConfig {
        HashConfig {
            io_threads: self.io_threads,
            shutdown_flag: self.shutdown_flag.clone(),
            progress_callback: self.progress_callback.clone(),
        }
    }
}

/// Errors that abort a scan.
///
/// Per-file problems never show up here; they are collected in
/// [`ScanStats::errors`].
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path cannot be read.
    #[error("Access denied: {0}")]
    AccessDenied(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while opening the root.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl FinderError {
    fn from_root_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::PathNotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::AccessDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Duplicate finder that orchestrates the detection pipeline.
///
/// Every call is independent: no state is kept between scans.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new();
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(flag.clone());
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Validate the root and return its canonical form.
    fn resolve_root(path: &Path) -> Result<PathBuf, FinderError> {
        let metadata = std::fs::metadata(path).map_err(|e| FinderError::from_root_io(path, e))?;
        if !metadata.is_dir() {
            return Err(FinderError::NotADirectory(path.to_path_buf()));
        }
        // Opening the directory surfaces permission problems up front.
        std::fs::read_dir(path).map_err(|e| FinderError::from_root_io(path, e))?;
        std::fs::canonicalize(path).map_err(|e| FinderError::from_root_io(path, e))
    }

    fn scoring_context(&self) -> ScoringContext {
        ScoringContext::at(self.config.reference_time.unwrap_or_else(SystemTime::now))
    }

    /// Find all duplicate files below the given root.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - The path does not exist or cannot be read
    /// - The path is not a directory
    /// - The scan is interrupted by shutdown signal
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupewise::duplicates::DuplicateFinder;
    /// use std::path::Path;
    ///
    /// let finder = DuplicateFinder::with_defaults();
    /// match finder.find_duplicates(Path::new(".")) {
    ///     Ok(report) => println!("Can reclaim {} bytes", report.totals.reclaimable_bytes),
    ///     Err(e) => eprintln!("Scan failed: {}", e),
    /// }
    /// ```
    pub fn find_duplicates(&self, path: &Path) -> Result<DuplicateReport, FinderError> {
        let start_time = Instant::now();
        let root = Self::resolve_root(path)?;
        let context = self.scoring_context();

        log::info!("Starting duplicate scan of {}", root.display());

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("walking", 0);
            callback.on_message(&format!("Walking {}", root.display()));
        }

        let mut walker = Walker::new(&root, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }

        let (files, stats) =
            collect_walk(walker.walk(), self.config.progress_callback.as_deref());

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("walking");
        }

        log::info!(
            "Walk complete: {} files examined, {} candidates, {} skipped by size, {} skipped by extension",
            stats.files_scanned,
            stats.candidates,
            stats.skipped_by_size,
            stats.skipped_by_extension
        );

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let mut report = self.process(root, context, files, stats)?;
        report.stats.duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} duplicate groups, {} duplicate files, {} bytes reclaimable",
            report.totals.duplicate_groups,
            report.totals.duplicate_files,
            report.totals.reclaimable_bytes
        );

        Ok(report)
    }

    /// Find duplicates from a pre-collected list of files.
    ///
    /// Use this when records come from another source than the walker. No
    /// filters are applied; `root` is only recorded in the report.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] if shutdown is requested.
    pub fn find_duplicates_from_files(
        &self,
        root: &Path,
        files: Vec<FileRecord>,
    ) -> Result<DuplicateReport, FinderError> {
        let start_time = Instant::now();
        let stats = ScanStats {
            files_scanned: files.len(),
            candidates: files.len(),
            ..Default::default()
        };

        let mut report = self.process(root.to_path_buf(), self.scoring_context(), files, stats)?;
        report.stats.duration = start_time.elapsed();
        Ok(report)
    }

    /// Size grouping, hashing, scoring and aggregation.
    fn process(
        &self,
        root: PathBuf,
        context: ScoringContext,
        files: Vec<FileRecord>,
        mut stats: ScanStats,
    ) -> Result<DuplicateReport, FinderError> {
        let (size_buckets, size_stats) = group_by_size(files);
        stats.eliminated_by_size = size_stats.eliminated_unique;

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let (hash_buckets, hash_stats) =
            group_by_hash(size_buckets, &self.hasher, &self.config.hash_config());

        if hash_stats.interrupted || self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        stats.hashes_computed = hash_stats.hashes_computed;
        stats.hash_failures = hash_stats.failed_files;
        stats.bytes_hashed = hash_stats.bytes_hashed;
        stats
            .errors
            .extend(hash_stats.errors.into_iter().map(ScanError::from));

        let scorer = PriorityScorer::new(context);
        let groups = hash_buckets
            .into_iter()
            .map(|bucket| scorer.rank(bucket))
            .collect();

        Ok(aggregate(root, context, groups, stats))
    }
}

/// Fold walk results into candidate files and scan counters.
///
/// This is the synchronization point of the pipeline: it drains the walk
/// completely before returning.
pub fn collect_walk<I>(
    entries: I,
    progress: Option<&dyn ProgressCallback>,
) -> (Vec<FileRecord>, ScanStats)
where
    I: IntoIterator<Item = Result<WalkEntry, ScanError>>,
{
    entries.into_iter().fold(
        (Vec::new(), ScanStats::default()),
        |(mut files, mut stats), entry| {
            match entry {
                Ok(WalkEntry::File(file)) => {
                    stats.files_scanned += 1;
                    stats.candidates += 1;
                    if let Some(callback) = progress {
                        callback.on_progress(stats.files_scanned, &file.path.to_string_lossy());
                    }
                    files.push(file);
                }
                Ok(WalkEntry::Skipped(SkipReason::Size)) => {
                    stats.files_scanned += 1;
                    stats.skipped_by_size += 1;
                }
                Ok(WalkEntry::Skipped(SkipReason::Extension)) => {
                    stats.files_scanned += 1;
                    stats.skipped_by_extension += 1;
                }
                Err(e) => stats.errors.push(e),
            }
            (files, stats)
        },
    )
}
