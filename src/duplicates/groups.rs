//! Duplicate grouping and size-based file organization.
//!
//! # Overview
//!
//! This module provides the size grouping phase of duplicate detection and
//! the [`DuplicateGroup`] type produced at the end of the pipeline.
//!
//! ## Size Grouping
//!
//! Files with different sizes cannot be duplicates, so grouping by exact
//! size prunes every size-unique file before any content is read.
//!
//! # Example
//!
//! ```
//! use dupewise::scanner::FileRecord;
//! use dupewise::duplicates::group_by_size;
//! use std::path::{Path, PathBuf};
//! use std::time::SystemTime;
//!
//! let root = Path::new("/ws");
//! let files = vec![
//!     FileRecord::new(root, PathBuf::from("/ws/file1.txt"), 1024, SystemTime::now()),
//!     FileRecord::new(root, PathBuf::from("/ws/file2.txt"), 1024, SystemTime::now()),
//!     FileRecord::new(root, PathBuf::from("/ws/file3.txt"), 2048, SystemTime::now()),
//! ];
//!
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(groups.len(), 1);
//! ```

use std::collections::BTreeMap;

use super::scoring::{ScoreResult, SuggestedAction};
use crate::scanner::{hash_to_hex, FileRecord, Hash};

/// Size buckets: exact byte size to the files sharing it.
pub type SizeBuckets = BTreeMap<u64, Vec<FileRecord>>;

/// Files sharing both size and content digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashBucket {
    /// BLAKE3 digest shared by every file
    pub digest: Hash,
    /// Size shared by every file
    pub size: u64,
    /// Files in first-encountered order
    pub files: Vec<FileRecord>,
}

impl HashBucket {
    /// Number of files in this bucket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if this bucket holds actual duplicates (2+ files).
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.files.len() > 1
    }
}

/// A duplicate group member together with its score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredMember {
    /// The file
    pub file: FileRecord,
    /// Heuristic score for keeping this file
    pub score: ScoreResult,
}

/// Confirmed group of byte-identical files.
///
/// Members are ranked by score descending; ties keep the order in which the
/// files were discovered. The first member is the recommended keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// BLAKE3 hash of the file content
    pub digest: Hash,
    /// File size in bytes (shared by all members)
    pub size: u64,
    /// Ranked members
    pub members: Vec<ScoredMember>,
    /// `size * (members - 1)`
    pub wasted_bytes: u64,
    /// What to do with this group
    pub action: SuggestedAction,
    /// Human-readable rationale, one line per decision
    pub recommendations: Vec<String>,
}

impl DuplicateGroup {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The member recommended for keeping.
    ///
    /// # Panics
    ///
    /// Panics if the group is empty, which the pipeline never produces.
    #[must_use]
    pub fn recommended_keep(&self) -> &ScoredMember {
        &self.members[0]
    }

    /// Members other than the recommended keep.
    #[must_use]
    pub fn others(&self) -> &[ScoredMember] {
        self.members.get(1..).unwrap_or(&[])
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.members.len().saturating_sub(1)
    }

    /// Digest as hexadecimal string.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hash_to_hex(&self.digest)
    }
}

/// Compute the wasted bytes of a group of `count` files of `size` bytes.
#[must_use]
pub fn wasted_bytes(size: u64, count: usize) -> u64 {
    size.saturating_mul(count.saturating_sub(1) as u64)
}

/// Statistics from size grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of unique file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in groups of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton groups)
    pub eliminated_unique: usize,
    /// Number of size groups with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size.
///
/// Single O(n) pass with no I/O. Only sizes shared by 2+ files are
/// returned; within a bucket files keep their input order.
///
/// # Example
///
/// ```
/// use dupewise::scanner::FileRecord;
/// use dupewise::duplicates::group_by_size;
/// use std::path::{Path, PathBuf};
/// use std::time::SystemTime;
///
/// let root = Path::new("/");
/// let files = vec![
///     FileRecord::new(root, PathBuf::from("/a.txt"), 100, SystemTime::now()),
///     FileRecord::new(root, PathBuf::from("/b.txt"), 100, SystemTime::now()),
///     FileRecord::new(root, PathBuf::from("/c.txt"), 200, SystemTime::now()),
/// ];
///
/// let (groups, stats) = group_by_size(files);
///
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[&100].len(), 2);
/// assert_eq!(stats.eliminated_unique, 1);
/// ```
#[must_use]
pub fn group_by_size(files: impl IntoIterator<Item = FileRecord>) -> (SizeBuckets, GroupingStats) {
    let mut all_groups: SizeBuckets = BTreeMap::new();
    let mut stats = GroupingStats::default();

    for file in files {
        stats.total_files += 1;
        stats.total_size += file.size;
        all_groups.entry(file.size).or_default().push(file);
    }

    stats.unique_sizes = all_groups.len();

    all_groups.retain(|size, files| {
        if files.len() == 1 {
            stats.eliminated_unique += 1;
            log::trace!(
                "Eliminated unique size {}: {}",
                size,
                files[0].path.display()
            );
            false
        } else {
            stats.potential_duplicates += files.len();
            stats.duplicate_groups += 1;
            log::debug!("Size group {} bytes: {} potential duplicates", size, files.len());
            true
        }
    });

    log::info!(
        "Size grouping complete: {} files → {} potential duplicates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (all_groups, stats)
}
