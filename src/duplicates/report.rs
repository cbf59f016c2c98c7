//! Report aggregation over scored duplicate groups.
//!
//! [`aggregate`] is a pure reduction: it takes the groups and the
//! [`ScanStats`] gathered by the finder and produces a [`DuplicateReport`]
//! with totals and a short list of corpus-wide recommendations. No I/O
//! happens here.

use std::fmt;
use std::time::{Duration, SystemTime};

use bytesize::ByteSize;

use super::groups::DuplicateGroup;
use super::scoring::ScoringContext;
use crate::scanner::ScanError;

/// Upper bound on the number of corpus recommendations.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Above this many groups a systematic cleanup is suggested.
pub const MANY_GROUPS_THRESHOLD: usize = 10;

/// Reclaimable space at or above this is called out.
pub const SIGNIFICANT_RECLAIM_BYTES: u64 = 100 * 1024 * 1024;

/// Counters gathered while scanning and hashing.
///
/// Built up by folding walk and hash results, then handed to [`aggregate`].
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Regular files examined
    pub files_scanned: usize,
    /// Files rejected by the size filters
    pub skipped_by_size: usize,
    /// Files rejected by the extension allow-list
    pub skipped_by_extension: usize,
    /// Files that passed every filter
    pub candidates: usize,
    /// Candidates dropped because no other file shared their size
    pub eliminated_by_size: usize,
    /// Files hashed successfully
    pub hashes_computed: usize,
    /// Files that could not be hashed
    pub hash_failures: usize,
    /// Bytes read while hashing
    pub bytes_hashed: u64,
    /// Non-fatal errors (unreadable directories and files)
    pub errors: Vec<ScanError>,
    /// Wall-clock duration of the scan
    pub duration: Duration,
}

impl ScanStats {
    /// Whether any path could not be read.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A corpus-level recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    /// Nothing to do.
    NoDuplicates,
    /// Many groups were found.
    SystematicCleanup {
        /// Number of groups
        groups: usize,
    },
    /// Some duplicates live in backup or temp directories.
    BackupCopies {
        /// Number of such files that are not the recommended keep
        files: usize,
    },
    /// A lot of space can be reclaimed.
    SignificantSpace {
        /// Reclaimable bytes
        bytes: u64,
    },
    /// Some groups have no clear leader.
    ManualReview {
        /// Number of such groups
        groups: usize,
    },
    /// Some paths could not be read.
    IncompleteScan {
        /// Number of unreadable paths
        errors: usize,
    },
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDuplicates => write!(f, "No duplicate files found; nothing to clean up"),
            Self::SystematicCleanup { groups } => write!(
                f,
                "Found {groups} duplicate groups; consider a systematic cleanup"
            ),
            Self::BackupCopies { files } => write!(
                f,
                "{files} duplicate(s) live in backup or temp directories and are likely safe to remove"
            ),
            Self::SignificantSpace { bytes } => write!(
                f,
                "Removing duplicates would reclaim {}",
                ByteSize::b(*bytes)
            ),
            Self::ManualReview { groups } => write!(
                f,
                "{groups} group(s) have no clear leader and need manual review"
            ),
            Self::IncompleteScan { errors } => write!(
                f,
                "{errors} path(s) could not be read; results may be incomplete"
            ),
        }
    }
}

/// Totals over all groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportTotals {
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Files beyond the kept one in each group
    pub duplicate_files: usize,
    /// Sum of wasted bytes over all groups
    pub reclaimable_bytes: u64,
    /// Groups whose action is manual review
    pub review_groups: usize,
}

/// Structured result of a scan.
#[derive(Debug, Clone)]
pub struct DuplicateReport {
    /// Scan root
    pub root: std::path::PathBuf,
    /// Reference time used for scoring
    pub scanned_at: SystemTime,
    /// Scan counters
    pub stats: ScanStats,
    /// Groups ordered by wasted bytes descending
    pub groups: Vec<DuplicateGroup>,
    /// Totals over `groups`
    pub totals: ReportTotals,
    /// Corpus-level advice, at most [`MAX_RECOMMENDATIONS`]
    pub recommendations: Vec<Recommendation>,
}

impl DuplicateReport {
    /// Whether any duplicates were found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }

    /// One-paragraph human-readable summary.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "Scanned {} files ({} skipped by size, {} by extension), hashed {}, found {} duplicate groups with {} reclaimable",
            self.stats.files_scanned,
            self.stats.skipped_by_size,
            self.stats.skipped_by_extension,
            self.stats.hashes_computed,
            self.totals.duplicate_groups,
            ByteSize::b(self.totals.reclaimable_bytes)
        )
    }
}

fn in_backup_or_temp(group: &DuplicateGroup) -> usize {
    group
        .others()
        .iter()
        .filter(|m| {
            let dir = m.file.directory.to_string_lossy().to_lowercase();
            dir.contains("backup") || dir.contains("temp")
        })
        .count()
}

/// Order groups by wasted bytes descending, then size descending, then digest.
pub fn sort_groups(groups: &mut [DuplicateGroup]) {
    groups.sort_by(|a, b| {
        b.wasted_bytes
            .cmp(&a.wasted_bytes)
            .then_with(|| b.size.cmp(&a.size))
            .then_with(|| a.digest.cmp(&b.digest))
    });
}

/// Reduce groups and stats into a report.
#[must_use]
pub fn aggregate(
    root: std::path::PathBuf,
    context: ScoringContext,
    mut groups: Vec<DuplicateGroup>,
    stats: ScanStats,
) -> DuplicateReport {
    sort_groups(&mut groups);

    let totals = groups.iter().fold(ReportTotals::default(), |mut acc, g| {
        acc.duplicate_groups += 1;
        acc.duplicate_files += g.duplicate_count();
        acc.reclaimable_bytes += g.wasted_bytes;
        if g.action.needs_review() {
            acc.review_groups += 1;
        }
        acc
    });

    let backup_files: usize = groups.iter().map(in_backup_or_temp).sum();

    let mut recommendations = Vec::new();
    if groups.is_empty() {
        recommendations.push(Recommendation::NoDuplicates);
    }
    if totals.duplicate_groups > MANY_GROUPS_THRESHOLD {
        recommendations.push(Recommendation::SystematicCleanup {
            groups: totals.duplicate_groups,
        });
    }
    if backup_files > 0 {
        recommendations.push(Recommendation::BackupCopies {
            files: backup_files,
        });
    }
    if totals.reclaimable_bytes >= SIGNIFICANT_RECLAIM_BYTES {
        recommendations.push(Recommendation::SignificantSpace {
            bytes: totals.reclaimable_bytes,
        });
    }
    if totals.review_groups > 0 {
        recommendations.push(Recommendation::ManualReview {
            groups: totals.review_groups,
        });
    }
    if stats.has_errors() {
        recommendations.push(Recommendation::IncompleteScan {
            errors: stats.errors.len(),
        });
    }
    recommendations.truncate(MAX_RECOMMENDATIONS);

    DuplicateReport {
        root,
        scanned_at: context.now,
        stats,
        groups,
        totals,
        recommendations,
    }
}
