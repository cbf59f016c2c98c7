//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Parallel directory walking using jwalk
//! - Size and extension filtering of candidate files
//! - Content hashing with BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use dupewise::scanner::{Walker, WalkerConfig, WalkEntry};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     min_size: 1024,
//!     extensions: vec![".txt".to_string()],
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(WalkEntry::File(file)) => println!("{}: {} bytes", file.relative_path.display(), file.size),
//!         Ok(WalkEntry::Skipped(reason)) => println!("skipped ({reason:?})"),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

pub use hasher::{hash_to_hex, Hash, Hasher};
pub use walker::{SkipReason, WalkEntry, Walker};

/// Default minimum file size in bytes.
pub const DEFAULT_MIN_SIZE: u64 = 1024;

/// Default bound on recursion depth below the scan root.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Metadata for a discovered file.
///
/// Created once by the walker and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path to the file
    pub path: PathBuf,
    /// Path relative to the scan root
    pub relative_path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Base file name
    pub name: String,
    /// Parent directory of `relative_path` (empty for files in the root)
    pub directory: PathBuf,
    /// Last modification time
    pub modified: SystemTime,
}

impl FileRecord {
    /// Create a record for `path` located under `root`.
    ///
    /// When `path` is not below `root` the full path is used as the
    /// relative path.
    #[must_use]
    pub fn new(root: &Path, path: PathBuf, size: u64, modified: SystemTime) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.clone());
        let name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let directory = relative_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self {
            path,
            relative_path,
            size,
            name,
            directory,
            modified,
        }
    }

    /// Whether the file sits directly in the scan root.
    #[must_use]
    pub fn is_in_root(&self) -> bool {
        self.directory.as_os_str().is_empty() || self.directory == Path::new(".")
    }

    /// Number of components in the relative path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.relative_path.components().count()
    }
}

/// Configuration for directory walking.
///
/// Controls filtering, symlink handling, and traversal bounds.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Minimum file size to include (in bytes).
    /// Files smaller than this are skipped. Empty files are always skipped.
    pub min_size: u64,

    /// Maximum file size to include (in bytes).
    /// Bounds the amount of data read per file during hashing.
    pub max_size: Option<u64>,

    /// Extension allow-list, lowercase with leading dot (".txt").
    /// Empty means every extension is accepted.
    pub extensions: Vec<String>,

    /// Maximum recursion depth below the root.
    pub max_depth: usize,

    /// Follow symbolic links during traversal.
    pub follow_symlinks: bool,

    /// Number of threads used to read directories.
    pub walk_threads: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            max_size: None,
            extensions: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            follow_symlinks: false,
            walk_threads: 4,
        }
    }
}

impl WalkerConfig {
    /// Set the minimum size filter.
    #[must_use]
    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the maximum size filter.
    #[must_use]
    pub fn with_max_size(mut self, max_size: Option<u64>) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the extension allow-list. Entries are normalized to lowercase
    /// with a single leading dot.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .filter_map(|ext| normalize_extension(ext.as_ref()))
            .collect();
        self
    }

    /// Set the maximum recursion depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Follow symbolic links during traversal.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set the number of directory-reading threads.
    #[must_use]
    pub fn with_walk_threads(mut self, threads: usize) -> Self {
        self.walk_threads = threads.max(1);
        self
    }
}

/// Normalize an extension to lowercase with a leading dot.
///
/// Returns `None` for blank input.
///
/// ```
/// use dupewise::scanner::normalize_extension;
///
/// assert_eq!(normalize_extension("TXT").as_deref(), Some(".txt"));
/// assert_eq!(normalize_extension(".Md").as_deref(), Some(".md"));
/// assert_eq!(normalize_extension("  "), None);
/// ```
#[must_use]
pub fn normalize_extension(ext: &str) -> Option<String> {
    let trimmed = ext.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed.to_lowercase()))
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<std::io::Error>,
    },

    /// A file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::NotADirectory(p) => p,
            Self::Io { path, .. } => path,
            Self::Hash(e) => e.path(),
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug, Clone)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Hashing stopped because shutdown was requested.
    #[error("Hashing interrupted: {0}")]
    Interrupted(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl HashError {
    /// Build a hash error from an I/O error, classifying common kinds.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: Arc::new(error),
            },
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Interrupted(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}
