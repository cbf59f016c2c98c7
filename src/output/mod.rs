//! Output formatters for duplicate reports.
//!
//! This module provides different renderings of a [`DuplicateReport`]:
//! - Text for people at a terminal
//! - JSON for automation and scripting
//! - CSV for spreadsheet import, one row per file
//!
//! # Example
//!
//! ```no_run
//! use dupewise::duplicates::DuplicateFinder;
//! use dupewise::error::ExitCode;
//! use dupewise::output::json::JsonOutput;
//! use std::path::Path;
//!
//! let report = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//!
//! let output = JsonOutput::new(&report, ExitCode::from_report(&report));
//! println!("{}", output.to_json_pretty().unwrap());
//! ```
//!
//! [`DuplicateReport`]: crate::duplicates::DuplicateReport

pub mod csv;
pub mod json;
pub mod text;

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};

pub use self::csv::CsvOutput;
pub use json::JsonOutput;
pub use text::TextOutput;

/// Format a timestamp as RFC 3339 in UTC with second precision.
#[must_use]
pub fn format_time(time: SystemTime) -> String {
    let datetime: DateTime<Utc> = time.into();
    datetime.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};
    use std::time::{Duration, SystemTime};

    use crate::duplicates::{aggregate, HashBucket, PriorityScorer, ScanStats, ScoringContext};
    use crate::duplicates::DuplicateReport;
    use crate::scanner::{FileRecord, ScanError};

    pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    pub fn now() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_760_000_000)
    }

    /// `/ws/a/doc.txt` (fresh) and `/ws/b/doc_copy.txt` (40 days old), 500 bytes each.
    pub fn sample_report() -> DuplicateReport {
        let root = Path::new("/ws");
        let context = ScoringContext::at(now());
        let bucket = HashBucket {
            digest: [0xab; 32],
            size: 500,
            files: vec![
                FileRecord::new(root, PathBuf::from("/ws/a/doc.txt"), 500, now()),
                FileRecord::new(
                    root,
                    PathBuf::from("/ws/b/doc_copy.txt"),
                    500,
                    now() - DAY * 40,
                ),
            ],
        };
        let group = PriorityScorer::new(context).rank(bucket);
        let stats = ScanStats {
            files_scanned: 4,
            skipped_by_size: 1,
            candidates: 3,
            eliminated_by_size: 0,
            hashes_computed: 3,
            bytes_hashed: 1500,
            errors: vec![ScanError::PermissionDenied(PathBuf::from("/ws/locked"))],
            ..Default::default()
        };
        aggregate(root.to_path_buf(), context, vec![group], stats)
    }

    /// Two equally scored copies, so the group needs manual review.
    pub fn review_report() -> DuplicateReport {
        let root = Path::new("/ws");
        let context = ScoringContext::at(now());
        let bucket = HashBucket {
            digest: [0xcd; 32],
            size: 64,
            files: vec![
                FileRecord::new(root, PathBuf::from("/ws/x/photo.jpg"), 64, now()),
                FileRecord::new(root, PathBuf::from("/ws/y/photo.jpg"), 64, now()),
            ],
        };
        let group = PriorityScorer::new(context).rank(bucket);
        aggregate(root.to_path_buf(), context, vec![group], ScanStats::default())
    }

    pub fn empty_report() -> DuplicateReport {
        aggregate(
            PathBuf::from("/ws"),
            ScoringContext::at(now()),
            Vec::new(),
            ScanStats::default(),
        )
    }
}
