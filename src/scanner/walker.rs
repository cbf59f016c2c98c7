//! Directory walker implementation using jwalk for parallel traversal.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing directories and
//! producing [`FileRecord`]s for duplicate detection. It uses [`jwalk`] to
//! read directories in parallel while still yielding entries in sorted,
//! depth-first order.
//!
//! # Features
//!
//! - Parallel directory reads on a rayon pool
//! - Size filtering (min/max, empty files always skipped)
//! - Extension allow-list
//! - Bounded recursion depth
//! - Symlinks skipped unless explicitly followed
//! - Graceful shutdown via atomic flag
//!
//! Unreadable directories and files are yielded as [`ScanError`] values
//! rather than stopping iteration.

use std::fs::{FileType, Metadata};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use jwalk::{Parallelism, WalkDir};

use super::{FileRecord, ScanError, WalkerConfig};

/// Why a regular file was left out of the candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Below `min_size`, above `max_size`, or empty.
    Size,
    /// Extension not in the allow-list.
    Extension,
}

/// One item produced by [`Walker::walk`].
#[derive(Debug, Clone)]
pub enum WalkEntry {
    /// A regular file that passed every filter.
    File(FileRecord),
    /// A regular file rejected by a filter.
    Skipped(SkipReason),
}

/// Directory walker for parallel file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupewise::scanner::{Walker, WalkerConfig};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// ```
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops yielding entries.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Check if a file passes size filters.
    fn passes_size_filter(&self, size: u64) -> bool {
        if size == 0 || size < self.config.min_size {
            return false;
        }
        if let Some(max) = self.config.max_size {
            if size > max {
                return false;
            }
        }
        true
    }

    /// Check if a file passes the extension allow-list.
    fn passes_extension_filter(&self, path: &Path) -> bool {
        if self.config.extensions.is_empty() {
            return true;
        }

        let Some(extension) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
            return false;
        };
        let dotted = format!(".{extension}");
        self.config.extensions.iter().any(|allowed| *allowed == dotted)
    }

    /// Walk the directory tree, yielding walk entries.
    ///
    /// The iterator is lazy and finite. Errors are yielded as [`ScanError`]
    /// values; the walk continues past them.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupewise::scanner::{Walker, WalkerConfig, WalkEntry};
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."), WalkerConfig::default());
    /// let files: Vec<_> = walker
    ///     .walk()
    ///     .filter_map(|e| match e {
    ///         Ok(WalkEntry::File(f)) => Some(f),
    ///         _ => None,
    ///     })
    ///     .collect();
    /// println!("Found {} files", files.len());
    /// ```
    pub fn walk(&self) -> impl Iterator<Item = Result<WalkEntry, ScanError>> + '_ {
        let parallelism = if self.config.walk_threads <= 1 {
            Parallelism::Serial
        } else {
            Parallelism::RayonNewPool(self.config.walk_threads)
        };

        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .skip_hidden(false)
            .sort(true)
            .max_depth(self.config.max_depth)
            .parallelism(parallelism);

        walk_dir
            .into_iter()
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                    false
                } else {
                    true
                }
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(mut entry) => {
                    let path = entry.path();
                    let children_error = entry
                        .read_children_error
                        .take()
                        .map(|e| self.handle_jwalk_error(path.clone(), e));
                    self.classify(path, entry.file_type(), children_error)
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    Some(Err(self.handle_jwalk_error(path, e)))
                }
            })
    }

    /// Turn one walked entry into an output item.
    ///
    /// Directories produce nothing unless listing their children failed, in
    /// which case that failure is the item.
    fn classify(
        &self,
        path: PathBuf,
        file_type: FileType,
        children_error: Option<ScanError>,
    ) -> Option<Result<WalkEntry, ScanError>> {
        if let Some(error) = children_error {
            return Some(Err(error));
        }
        if path == self.root || file_type.is_dir() {
            return None;
        }

        if file_type.is_symlink() && !self.config.follow_symlinks {
            log::trace!("Skipping symlink: {}", path.display());
            return None;
        }

        let metadata = if self.config.follow_symlinks {
            std::fs::metadata(&path)
        } else {
            std::fs::symlink_metadata(&path)
        };

        match metadata {
            Ok(m) if m.is_file() => Some(Ok(self.process_file_entry(path, &m))),
            Ok(_) => None,
            Err(e) => Some(Err(self.handle_io_error(&path, e))),
        }
    }

    /// Apply filters to a regular file and build its record.
    fn process_file_entry(&self, path: PathBuf, metadata: &Metadata) -> WalkEntry {
        let size = metadata.len();

        if !self.passes_size_filter(size) {
            log::trace!(
                "Skipping file due to size filter ({}): {}",
                size,
                path.display()
            );
            return WalkEntry::Skipped(SkipReason::Size);
        }

        if !self.passes_extension_filter(&path) {
            log::trace!("Skipping file due to extension filter: {}", path.display());
            return WalkEntry::Skipped(SkipReason::Extension);
        }

        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        WalkEntry::File(FileRecord::new(&self.root, path, size, modified))
    }

    /// Handle I/O errors during file access.
    fn handle_io_error(&self, path: &Path, error: std::io::Error) -> ScanError {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path.to_path_buf())
            }
            ErrorKind::NotFound => {
                log::debug!("File not found (may have been deleted): {}", path.display());
                ScanError::NotFound(path.to_path_buf())
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), error);
                ScanError::Io {
                    path: path.to_path_buf(),
                    source: Arc::new(error),
                }
            }
        }
    }

    /// Handle jwalk errors (unreadable directories, vanished entries).
    fn handle_jwalk_error(&self, path: PathBuf, error: jwalk::Error) -> ScanError {
        match error.io_error().map(std::io::Error::kind) {
            Some(std::io::ErrorKind::PermissionDenied) => {
                log::warn!("Skipping unreadable directory: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            Some(std::io::ErrorKind::NotFound) => {
                log::debug!("Directory vanished during walk: {}", path.display());
                ScanError::NotFound(path)
            }
            _ => {
                log::warn!("Walker error for {}: {}", path.display(), error);
                ScanError::Io {
                    path,
                    source: Arc::new(std::io::Error::other(error.to_string())),
                }
            }
        }
    }
}
