//! CSV output formatter for duplicate reports.
//!
//! One row is generated for each file in a duplicate group.
//!
//! # Columns
//!
//! - `group_id`: 1-based group number, in report order
//! - `digest`: BLAKE3 content digest (hexadecimal)
//! - `rank`: position within the group, 1 = best
//! - `best`: `true` for the highest ranked member, even in review groups
//! - `keep`: `true` when the suggested action keeps this file
//! - `path`, `relative_path`, `name`, `directory`
//! - `size`: file size in bytes
//! - `modified`: last modified time (RFC 3339)
//! - `score`, `priority`, `reasons`
//! - `group_wasted_bytes`, `action`

use std::io;

use serde::Serialize;
use thiserror::Error;

use super::format_time;
use crate::duplicates::{DuplicateGroup, Priority};

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group_id: usize,
    digest: &'a str,
    rank: usize,
    best: bool,
    keep: bool,
    path: String,
    relative_path: String,
    name: &'a str,
    directory: String,
    size: u64,
    modified: String,
    score: i32,
    priority: Priority,
    reasons: String,
    group_wasted_bytes: u64,
    action: String,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    groups: &'a [DuplicateGroup],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self { groups }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (idx, group) in self.groups.iter().enumerate() {
            let digest = group.digest_hex();
            let action = group.action.to_string();
            let has_keep = !group.action.needs_review();

            for (rank, member) in group.members.iter().enumerate() {
                let file = &member.file;
                csv_writer.serialize(CsvRow {
                    group_id: idx + 1,
                    digest: &digest,
                    rank: rank + 1,
                    best: rank == 0,
                    keep: has_keep && rank == 0,
                    path: file.path.to_string_lossy().into_owned(),
                    relative_path: file.relative_path.to_string_lossy().into_owned(),
                    name: &file.name,
                    directory: file.directory.to_string_lossy().into_owned(),
                    size: file.size,
                    modified: format_time(file.modified),
                    score: member.score.score,
                    priority: member.score.priority,
                    reasons: member.score.reasons.join("; "),
                    group_wasted_bytes: group.wasted_bytes,
                    action: action.clone(),
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
