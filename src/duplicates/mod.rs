//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (Phase 1)
//! - Full content hashing and digest grouping (Phase 2)
//! - Priority scoring of group members (Phase 3)
//! - Report aggregation

pub mod finder;
pub mod groups;
pub mod hashing;
pub mod report;
pub mod scoring;

pub use finder::{collect_walk, DuplicateFinder, FinderConfig, FinderError};
pub use groups::{
    group_by_size, wasted_bytes, DuplicateGroup, GroupingStats, HashBucket, ScoredMember,
    SizeBuckets,
};
pub use hashing::{group_by_hash, HashConfig, HashStats};
pub use report::{
    aggregate, sort_groups, DuplicateReport, Recommendation, ReportTotals, ScanStats,
};
pub use scoring::{
    Priority, PriorityScorer, ScoreResult, ScoreRule, ScoringContext, SuggestedAction,
    DEFAULT_RULES,
};
