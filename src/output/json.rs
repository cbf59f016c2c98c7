//! JSON output formatter for duplicate reports.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "root": "/ws",
//!   "scanned_at": "2025-10-09T08:53:20Z",
//!   "summary": { "files_scanned": 4, "duplicate_groups": 1, "reclaimable_bytes": 500, ... },
//!   "groups": [
//!     {
//!       "digest": "abab...",
//!       "size": 500,
//!       "wasted_bytes": 500,
//!       "action": "keep best, delete others",
//!       "recommended_keep": "/ws/a/doc.txt",
//!       "members": [
//!         { "path": "/ws/a/doc.txt", "score": 5, "priority": "high", "best": true, "keep": true, ... }
//!       ]
//!     }
//!   ],
//!   "recommendations": ["..."],
//!   "errors": ["..."]
//! }
//! ```

use std::io::Write;

use bytesize::ByteSize;
use serde::Serialize;

use super::format_time;
use crate::duplicates::{DuplicateGroup, DuplicateReport, Priority, ScoredMember};
use crate::error::ExitCode;

/// A group member in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonMember {
    /// Absolute path
    pub path: String,
    /// Path relative to the scan root
    pub relative_path: String,
    /// File name
    pub name: String,
    /// Directory relative to the scan root
    pub directory: String,
    /// Last modified time (RFC 3339)
    pub modified: String,
    /// Heuristic score
    pub score: i32,
    /// Priority tier
    pub priority: Priority,
    /// Matched rule reasons
    pub reasons: Vec<String>,
    /// Highest ranked member of its group
    pub best: bool,
    /// Whether the suggested action keeps this file
    pub keep: bool,
}

impl JsonMember {
    fn new(member: &ScoredMember, best: bool, keep: bool) -> Self {
        Self {
            path: member.file.path.to_string_lossy().into_owned(),
            relative_path: member.file.relative_path.to_string_lossy().into_owned(),
            name: member.file.name.clone(),
            directory: member.file.directory.to_string_lossy().into_owned(),
            modified: format_time(member.file.modified),
            score: member.score.score,
            priority: member.score.priority,
            reasons: member.score.reasons.iter().map(|r| (*r).to_string()).collect(),
            best,
            keep,
        }
    }
}

/// A duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// BLAKE3 digest as hexadecimal string (64 characters)
    pub digest: String,
    /// Size of each file in bytes
    pub size: u64,
    /// Size of each file, human readable
    pub size_human: String,
    /// Bytes freed by keeping one copy
    pub wasted_bytes: u64,
    /// Suggested action
    pub action: String,
    /// Whether the group needs a human decision
    pub needs_review: bool,
    /// Path of the best member, named even when the group needs review
    pub recommended_keep: String,
    /// Per-file decisions
    pub recommendations: Vec<String>,
    /// Members, best first
    pub members: Vec<JsonMember>,
}

impl JsonGroup {
    /// Convert a [`DuplicateGroup`].
    #[must_use]
    pub fn from_group(group: &DuplicateGroup) -> Self {
        let needs_review = group.action.needs_review();
        Self {
            digest: group.digest_hex(),
            size: group.size,
            size_human: ByteSize::b(group.size).to_string(),
            wasted_bytes: group.wasted_bytes,
            action: group.action.to_string(),
            needs_review,
            recommended_keep: group
                .recommended_keep()
                .file
                .path
                .to_string_lossy()
                .into_owned(),
            recommendations: group.recommendations.clone(),
            members: group
                .members
                .iter()
                .enumerate()
                .map(|(rank, m)| JsonMember::new(m, rank == 0, rank == 0 && !needs_review))
                .collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Regular files examined
    pub files_scanned: usize,
    /// Files rejected by size filters
    pub skipped_by_size: usize,
    /// Files rejected by the extension allow-list
    pub skipped_by_extension: usize,
    /// Files that passed every filter
    pub candidates: usize,
    /// Candidates with a unique size
    pub eliminated_by_size: usize,
    /// Files hashed
    pub hashes_computed: usize,
    /// Files that could not be hashed
    pub hash_failures: usize,
    /// Bytes read while hashing
    pub bytes_hashed: u64,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Duplicate files beyond one kept copy per group
    pub duplicate_files: usize,
    /// Total reclaimable bytes
    pub reclaimable_bytes: u64,
    /// Total reclaimable, human readable
    pub reclaimable_human: String,
    /// Groups needing manual review
    pub review_groups: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DW000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Build from a report and the exit code of this run.
    #[must_use]
    pub fn from_report(report: &DuplicateReport, exit_code: ExitCode) -> Self {
        let stats = &report.stats;
        Self {
            files_scanned: stats.files_scanned,
            skipped_by_size: stats.skipped_by_size,
            skipped_by_extension: stats.skipped_by_extension,
            candidates: stats.candidates,
            eliminated_by_size: stats.eliminated_by_size,
            hashes_computed: stats.hashes_computed,
            hash_failures: stats.hash_failures,
            bytes_hashed: stats.bytes_hashed,
            duplicate_groups: report.totals.duplicate_groups,
            duplicate_files: report.totals.duplicate_files,
            reclaimable_bytes: report.totals.reclaimable_bytes,
            reclaimable_human: ByteSize::b(report.totals.reclaimable_bytes).to_string(),
            review_groups: report.totals.review_groups,
            scan_duration_ms: u64::try_from(stats.duration.as_millis()).unwrap_or(u64::MAX),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Scan root
    pub root: String,
    /// Reference time used for scoring (RFC 3339)
    pub scanned_at: String,
    /// Scan summary statistics
    pub summary: JsonSummary,
    /// Duplicate groups, most wasteful first
    pub groups: Vec<JsonGroup>,
    /// Corpus-level advice
    pub recommendations: Vec<String>,
    /// Unreadable paths
    pub errors: Vec<String>,
}

impl JsonOutput {
    /// Create the JSON document for a report.
    ///
    /// # Example
    ///
    /// ```
    /// use dupewise::duplicates::{aggregate, ScanStats, ScoringContext};
    /// use dupewise::error::ExitCode;
    /// use dupewise::output::json::JsonOutput;
    /// use std::path::PathBuf;
    ///
    /// let report = aggregate(PathBuf::from("/ws"), ScoringContext::default(), Vec::new(), ScanStats::default());
    /// let output = JsonOutput::new(&report, ExitCode::NoDuplicates);
    /// assert!(output.groups.is_empty());
    /// assert_eq!(output.summary.exit_code, 2);
    /// ```
    #[must_use]
    pub fn new(report: &DuplicateReport, exit_code: ExitCode) -> Self {
        Self {
            root: report.root.to_string_lossy().into_owned(),
            scanned_at: format_time(report.scanned_at),
            summary: JsonSummary::from_report(report, exit_code),
            groups: report.groups.iter().map(JsonGroup::from_group).collect(),
            recommendations: report
                .recommendations
                .iter()
                .map(ToString::to_string)
                .collect(),
            errors: report.stats.errors.iter().map(ToString::to_string).collect(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
