//! Human-readable report.
//!
//! ```text
//! Duplicate report for /ws (scored at 2025-10-09T08:53:20Z)
//! Scanned 4 files (1 skipped by size, 0 by extension), hashed 3, found 1 duplicate groups with 500 B reclaimable
//!
//! Group 1: 2 files of 500 B, 500 B wasted, keep best, delete others
//!   digest abab...
//!   [keep] a/doc.txt  score 5 (high)  modified 2025-10-09T08:53:20Z
//!   [dupe] b/doc_copy.txt  score -9 (low)  modified 2025-08-30T08:53:20Z
//!   > Keep a/doc.txt (score 5: modified within 7 days, shallow path)
//!   > Delete b/doc_copy.txt (score -9: copy/backup/old in name, modified over 30 days ago, shallow path)
//!
//! Recommendations:
//!   - 1 path(s) could not be read; results may be incomplete
//! ```

use std::io::{self, Write};

use bytesize::ByteSize;

use super::format_time;
use crate::duplicates::{DuplicateGroup, DuplicateReport};

/// Text formatter.
pub struct TextOutput<'a> {
    report: &'a DuplicateReport,
}

impl<'a> TextOutput<'a> {
    /// Create a formatter for `report`.
    #[must_use]
    pub fn new(report: &'a DuplicateReport) -> Self {
        Self { report }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let report = self.report;

        writeln!(
            writer,
            "Duplicate report for {} (scored at {})",
            report.root.display(),
            format_time(report.scanned_at)
        )?;
        writeln!(writer, "{}", report.summary_line())?;

        for (idx, group) in report.groups.iter().enumerate() {
            writeln!(writer)?;
            write_group(writer, idx + 1, group)?;
        }

        writeln!(writer)?;
        writeln!(writer, "Recommendations:")?;
        for recommendation in &report.recommendations {
            writeln!(writer, "  - {}", recommendation)?;
        }

        if report.stats.has_errors() {
            writeln!(writer)?;
            writeln!(writer, "Unreadable paths:")?;
            for error in &report.stats.errors {
                writeln!(writer, "  ! {}", error)?;
            }
        }

        Ok(())
    }

    /// Render into a string.
    ///
    /// # Errors
    ///
    /// Returns an error if formatting fails.
    pub fn to_string(&self) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn write_group<W: Write>(writer: &mut W, number: usize, group: &DuplicateGroup) -> io::Result<()> {
    writeln!(
        writer,
        "Group {}: {} files of {}, {} wasted, {}",
        number,
        group.len(),
        ByteSize::b(group.size),
        ByteSize::b(group.wasted_bytes),
        group.action
    )?;
    writeln!(writer, "  digest {}", group.digest_hex())?;

    for (rank, member) in group.members.iter().enumerate() {
        let marker = match (rank, group.action.needs_review()) {
            (0, false) => "keep",
            (0, true) => "best",
            _ => "dupe",
        };
        writeln!(
            writer,
            "  [{}] {}  score {} ({})  modified {}",
            marker,
            member.file.relative_path.display(),
            member.score.score,
            member.score.priority,
            format_time(member.file.modified)
        )?;
    }

    for line in &group.recommendations {
        writeln!(writer, "  > {}", line)?;
    }
    Ok(())
}
