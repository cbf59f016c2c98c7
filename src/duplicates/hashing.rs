//! Content hashing within size buckets.
//!
//! Only files that share their size with at least one other file are read.
//! Hashing runs on a dedicated rayon pool capped at `io_threads` to avoid
//! disk thrashing; results are collected in input order and grouped on the
//! calling thread, so no shared map is written concurrently.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::groups::{HashBucket, SizeBuckets};
use crate::progress::ProgressCallback;
use crate::scanner::{FileRecord, Hash, HashError, Hasher};

/// Files above this size are logged at debug level while hashing.
const LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Configuration for the hashing phase.
#[derive(Clone)]
pub struct HashConfig {
    /// Number of I/O threads for parallel hashing.
    pub io_threads: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for HashConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashConfig")
            .field("io_threads", &self.io_threads)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl HashConfig {
    /// Set the I/O thread count (at least 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
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
}

/// Statistics from the hashing phase.
#[derive(Debug, Clone, Default)]
pub struct HashStats {
    /// Files that entered the phase
    pub input_files: usize,
    /// Files hashed successfully
    pub hashes_computed: usize,
    /// Files that could not be read
    pub failed_files: usize,
    /// Total bytes hashed
    pub bytes_hashed: u64,
    /// Per-file failures
    pub errors: Vec<HashError>,
    /// Files whose size matched another file but whose digest did not
    pub eliminated_by_hash: usize,
    /// Whether the phase stopped on a shutdown request
    pub interrupted: bool,
}

/// Hash every file in the size buckets and group them by (size, digest).
///
/// Returns only buckets with 2+ members, ordered by size ascending and then
/// by first appearance of the digest. Unreadable files are excluded and
/// recorded in the returned stats.
///
/// # Example
///
/// ```no_run
/// use dupewise::duplicates::{group_by_size, group_by_hash, HashConfig};
/// use dupewise::scanner::Hasher;
///
/// let (buckets, _) = group_by_size(Vec::new());
/// let (groups, stats) = group_by_hash(buckets, &Hasher::new(), &HashConfig::default());
/// assert!(groups.is_empty());
/// assert_eq!(stats.hashes_computed, 0);
/// ```
#[must_use]
pub fn group_by_hash(
    buckets: SizeBuckets,
    hasher: &Hasher,
    config: &HashConfig,
) -> (Vec<HashBucket>, HashStats) {
    let files: Vec<FileRecord> = buckets
        .into_values()
        .filter(|files| files.len() > 1)
        .flatten()
        .collect();

    let mut stats = HashStats {
        input_files: files.len(),
        ..Default::default()
    };

    if files.is_empty() {
        log::debug!("Hashing: No files to process");
        return (Vec::new(), stats);
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start("hashing", files.len());
    }

    log::info!("Hashing {} files with {} threads", files.len(), config.io_threads);

    let compute = |(idx, file): (usize, &FileRecord)| -> Result<Hash, HashError> {
        if config.is_shutdown_requested() {
            return Err(HashError::Interrupted(file.path.clone()));
        }
        if file.size > LARGE_FILE_THRESHOLD {
            log::debug!(
                "Hashing large file ({} MB): {}",
                file.size / (1024 * 1024),
                file.path.display()
            );
        }
        if let Some(ref callback) = config.progress_callback {
            callback.on_progress(idx + 1, file.path.to_string_lossy().as_ref());
        }
        let result = hasher.full_hash(&file.path);
        if let (Ok(_), Some(callback)) = (&result, &config.progress_callback) {
            callback.on_item_completed(file.size);
        }
        result
    };

    let results: Vec<Result<Hash, HashError>> =
        match rayon::ThreadPoolBuilder::new().num_threads(config.io_threads).build() {
            Ok(pool) => pool.install(|| files.par_iter().enumerate().map(&compute).collect()),
            Err(e) => {
                log::warn!(
                    "Failed to create hashing thread pool ({}), using global pool with {} threads",
                    e,
                    rayon::current_num_threads()
                );
                files.par_iter().enumerate().map(&compute).collect()
            }
        };

    if config.is_shutdown_requested() {
        stats.interrupted = true;
        log::info!("Hashing: Interrupted by shutdown signal");
    }

    let mut order: HashMap<(u64, Hash), usize> = HashMap::new();
    let mut hash_buckets: Vec<HashBucket> = Vec::new();

    for (file, result) in files.into_iter().zip(results) {
        match result {
            Ok(digest) => {
                stats.hashes_computed += 1;
                stats.bytes_hashed += file.size;
                let key = (file.size, digest);
                match order.get(&key) {
                    Some(&idx) => hash_buckets[idx].files.push(file),
                    None => {
                        order.insert(key, hash_buckets.len());
                        hash_buckets.push(HashBucket {
                            digest,
                            size: file.size,
                            files: vec![file],
                        });
                    }
                }
            }
            Err(HashError::Interrupted(_)) => {}
            Err(e) => {
                log::warn!("Failed to hash {}: {}", file.path.display(), e);
                stats.failed_files += 1;
                stats.errors.push(e);
            }
        }
    }

    hash_buckets.retain(|bucket| {
        if bucket.has_duplicates() {
            log::debug!(
                "Duplicate group {}: {} files, {} bytes each",
                crate::scanner::hash_to_hex(&bucket.digest),
                bucket.len(),
                bucket.size
            );
            true
        } else {
            stats.eliminated_by_hash += bucket.len();
            false
        }
    });

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end("hashing");
    }

    log::info!(
        "Hashing complete: {} hashed, {} failed, {} duplicate groups",
        stats.hashes_computed,
        stats.failed_files,
        hash_buckets.len()
    );

    (hash_buckets, stats)
}
