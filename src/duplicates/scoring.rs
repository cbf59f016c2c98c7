//! Priority scoring for duplicate group members.
//!
//! Each member of a duplicate group is scored by folding a table of
//! [`ScoreRule`]s over it. A rule is a predicate, a weight and a short
//! reason; matching rules add their weight and reason to the member's
//! [`ScoreResult`]. The highest scoring member is the one recommended for
//! keeping. Nothing here touches the filesystem.
//!
//! | Rule | Condition | Weight |
//! |---|---|---|
//! | `backup_or_temp_dir` | directory contains "backup" or "temp" | −10 |
//! | `scan_root` | file sits in the scan root | +5 |
//! | `copy_name` | name contains "copy", "backup" or "old" | −8 |
//! | `original_name` | name contains "original" or "master" | +8 |
//! | `recent` | modified within 7 days | +3 |
//! | `stale` | modified more than 30 days ago | −3 |
//! | `shallow` | relative path has at most 2 components | +2 |
//!
//! All string matches are case-insensitive.

use std::fmt;
use std::time::{Duration, SystemTime};

use serde::Serialize;

use super::groups::{wasted_bytes, DuplicateGroup, HashBucket, ScoredMember};
use crate::scanner::FileRecord;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Files modified within this window count as recent.
pub const RECENT_WINDOW: Duration = Duration::from_secs(7 * DAY.as_secs());

/// Files modified before this window count as stale.
pub const STALE_WINDOW: Duration = Duration::from_secs(30 * DAY.as_secs());

/// Minimum lead (exclusive) the best member needs over the runner-up for
/// an automatic keep recommendation.
pub const CLEAR_LEADER_MARGIN: i32 = 3;

/// Scores at or above this are [`Priority::High`].
pub const HIGH_PRIORITY_SCORE: i32 = 5;

/// Evaluation context shared by every rule in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringContext {
    /// Reference time for recency rules
    pub now: SystemTime,
}

impl ScoringContext {
    /// Context evaluated against the given time.
    #[must_use]
    pub fn at(now: SystemTime) -> Self {
        Self { now }
    }

    /// Age of a file relative to `now`. Future timestamps count as age zero.
    #[must_use]
    pub fn age_of(&self, file: &FileRecord) -> Duration {
        self.now.duration_since(file.modified).unwrap_or(Duration::ZERO)
    }
}

impl Default for ScoringContext {
    fn default() -> Self {
        Self::at(SystemTime::now())
    }
}

/// One heuristic: when `applies` holds, `weight` is added to the score.
#[derive(Clone, Copy)]
pub struct ScoreRule {
    /// Stable identifier
    pub name: &'static str,
    /// Score delta
    pub weight: i32,
    /// Short rationale shown to users
    pub reason: &'static str,
    /// Predicate over the file
    pub applies: fn(&FileRecord, &ScoringContext) -> bool,
}

impl fmt::Debug for ScoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreRule")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .field("reason", &self.reason)
            .finish()
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    needles.iter().any(|n| lower.contains(n))
}

fn in_backup_or_temp_dir(file: &FileRecord, _: &ScoringContext) -> bool {
    contains_any(&file.directory.to_string_lossy(), &["backup", "temp"])
}

fn in_scan_root(file: &FileRecord, _: &ScoringContext) -> bool {
    file.is_in_root()
}

fn has_copy_name(file: &FileRecord, _: &ScoringContext) -> bool {
    contains_any(&file.name, &["copy", "backup", "old"])
}

fn has_original_name(file: &FileRecord, _: &ScoringContext) -> bool {
    contains_any(&file.name, &["original", "master"])
}

fn is_recent(file: &FileRecord, ctx: &ScoringContext) -> bool {
    ctx.age_of(file) <= RECENT_WINDOW
}

fn is_stale(file: &FileRecord, ctx: &ScoringContext) -> bool {
    ctx.age_of(file) > STALE_WINDOW
}

fn is_shallow(file: &FileRecord, _: &ScoringContext) -> bool {
    file.depth() <= 2
}

/// The built-in rule table.
pub const DEFAULT_RULES: &[ScoreRule] = &[
    ScoreRule {
        name: "backup_or_temp_dir",
        weight: -10,
        reason: "in backup/temp directory",
        applies: in_backup_or_temp_dir,
    },
    ScoreRule {
        name: "scan_root",
        weight: 5,
        reason: "in scan root",
        applies: in_scan_root,
    },
    ScoreRule {
        name: "copy_name",
        weight: -8,
        reason: "copy/backup/old in name",
        applies: has_copy_name,
    },
    ScoreRule {
        name: "original_name",
        weight: 8,
        reason: "original/master in name",
        applies: has_original_name,
    },
    ScoreRule {
        name: "recent",
        weight: 3,
        reason: "modified within 7 days",
        applies: is_recent,
    },
    ScoreRule {
        name: "stale",
        weight: -3,
        reason: "modified over 30 days ago",
        applies: is_stale,
    },
    ScoreRule {
        name: "shallow",
        weight: 2,
        reason: "shallow path",
        applies: is_shallow,
    },
];

/// Coarse desirability tier derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Not worth keeping over a better copy
    Low,
    /// No strong signal either way
    Medium,
    /// Strong keep candidate
    High,
}

impl Priority {
    /// Tier for a score.
    #[must_use]
    pub fn from_score(score: i32) -> Self {
        if score >= HIGH_PRIORITY_SCORE {
            Self::High
        } else if score >= 0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Outcome of scoring one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResult {
    /// Sum of matched rule weights
    pub score: i32,
    /// Reasons of matched rules, in table order
    pub reasons: Vec<&'static str>,
    /// Tier derived from the score
    pub priority: Priority,
}

impl ScoreResult {
    /// Matched reasons joined for display.
    #[must_use]
    pub fn rationale(&self) -> String {
        if self.reasons.is_empty() {
            "no signals".to_string()
        } else {
            self.reasons.join(", ")
        }
    }
}

/// Advisory action for a duplicate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestedAction {
    /// The best member leads every other by more than
    /// [`CLEAR_LEADER_MARGIN`]; keep it and delete the rest.
    KeepBest {
        /// Lead over the runner-up
        margin: i32,
    },
    /// No clear leader.
    ManualReview,
}

impl SuggestedAction {
    /// Whether a human needs to look at the group.
    #[must_use]
    pub fn needs_review(&self) -> bool {
        matches!(self, Self::ManualReview)
    }
}

impl fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepBest { .. } => write!(f, "keep best, delete others"),
            Self::ManualReview => write!(f, "manual review"),
        }
    }
}

/// Scores files against a rule table.
#[derive(Debug, Clone)]
pub struct PriorityScorer {
    rules: Vec<ScoreRule>,
    context: ScoringContext,
}

impl PriorityScorer {
    /// Scorer with the built-in rules.
    #[must_use]
    pub fn new(context: ScoringContext) -> Self {
        Self::with_rules(DEFAULT_RULES.to_vec(), context)
    }

    /// Scorer with a custom rule table.
    #[must_use]
    pub fn with_rules(rules: Vec<ScoreRule>, context: ScoringContext) -> Self {
        Self { rules, context }
    }

    /// The rule table in use.
    #[must_use]
    pub fn rules(&self) -> &[ScoreRule] {
        &self.rules
    }

    /// Score a single file.
    #[must_use]
    pub fn score(&self, file: &FileRecord) -> ScoreResult {
        let (score, reasons) = self
            .rules
            .iter()
            .filter(|rule| (rule.applies)(file, &self.context))
            .fold((0, Vec::new()), |(score, mut reasons), rule| {
                reasons.push(rule.reason);
                (score + rule.weight, reasons)
            });

        ScoreResult {
            score,
            reasons,
            priority: Priority::from_score(score),
        }
    }

    /// Score and rank a hash bucket into a [`DuplicateGroup`].
    ///
    /// Members are stably sorted by score descending, so ties keep
    /// discovery order and the first member is the recommended keep.
    #[must_use]
    pub fn rank(&self, bucket: HashBucket) -> DuplicateGroup {
        let count = bucket.files.len();
        let mut members: Vec<ScoredMember> = bucket
            .files
            .into_iter()
            .map(|file| {
                let score = self.score(&file);
                ScoredMember { file, score }
            })
            .collect();
        members.sort_by(|a, b| b.score.score.cmp(&a.score.score));

        let action = suggest_action(&members);
        let recommendations = describe(&members, action);

        DuplicateGroup {
            digest: bucket.digest,
            size: bucket.size,
            members,
            wasted_bytes: wasted_bytes(bucket.size, count),
            action,
            recommendations,
        }
    }
}

impl Default for PriorityScorer {
    fn default() -> Self {
        Self::new(ScoringContext::default())
    }
}

/// Pick the action for members already ranked by score.
fn suggest_action(members: &[ScoredMember]) -> SuggestedAction {
    match members {
        [best, runner_up, ..] => {
            let margin = best.score.score - runner_up.score.score;
            if margin > CLEAR_LEADER_MARGIN {
                SuggestedAction::KeepBest { margin }
            } else {
                SuggestedAction::ManualReview
            }
        }
        _ => SuggestedAction::ManualReview,
    }
}

fn describe(members: &[ScoredMember], action: SuggestedAction) -> Vec<String> {
    let Some((best, others)) = members.split_first() else {
        return Vec::new();
    };

    match action {
        SuggestedAction::KeepBest { .. } => {
            let mut lines = Vec::with_capacity(members.len());
            lines.push(format!(
                "Keep {} (score {}: {})",
                best.file.relative_path.display(),
                best.score.score,
                best.score.rationale()
            ));
            lines.extend(others.iter().map(|m| {
                format!(
                    "Delete {} (score {}: {})",
                    m.file.relative_path.display(),
                    m.score.score,
                    m.score.rationale()
                )
            }));
            lines
        }
        SuggestedAction::ManualReview => vec![
            format!(
                "No clear leader: review {} files manually",
                members.len()
            ),
            format!(
                "Highest score {} for {} ({})",
                best.score.score,
                best.file.relative_path.display(),
                best.score.rationale()
            ),
        ],
    }
}
