//! Per-session scoring state and derived snapshots.

use std::collections::HashSet;

use scamwatch_rules::{MatchEvent, RiskLevel};
use serde::{Deserialize, Serialize};

/// State of one monitored conversation.
///
/// Only final segments change `matched_tags` and `raw_score`; the invariant
/// `raw_score == Σ weight(matched_tags)` holds after every operation.
/// A tag is reported in a final update exactly when it is committed, so
/// `matched_tags` is also the set of tags already notified to the caller.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub(crate) matched_tags: HashSet<String>,
    pub(crate) matches: Vec<MatchEvent>,
    pub(crate) raw_score: u64,
    pub(crate) last_final_text: String,
    pub(crate) pending_interim_text: Option<String>,
    pub(crate) final_segments: u64,
    pub(crate) interim_segments: u64,
    pub(crate) ended: bool,
}

impl SessionState {
    /// Committed score.
    pub fn raw_score(&self) -> u64 {
        self.raw_score
    }

    /// Whether `tag` has been committed.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.matched_tags.contains(tag)
    }

    /// Committed matches, in commit order.
    pub fn matches(&self) -> &[MatchEvent] {
        &self.matches
    }

    /// Committed final transcript, segments joined by a space.
    pub fn transcript(&self) -> &str {
        &self.last_final_text
    }

    /// Latest interim fragment not yet superseded by a final segment.
    pub fn pending_interim_text(&self) -> Option<&str> {
        self.pending_interim_text.as_deref()
    }

    /// Number of final segments applied.
    pub fn final_segments(&self) -> u64 {
        self.final_segments
    }

    /// Number of interim segments applied.
    pub fn interim_segments(&self) -> u64 {
        self.interim_segments
    }
}

/// Score view derived from a session state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    /// Sum of weights of the counted tags.
    pub raw_score: u64,
    /// Rule table maximum.
    pub max_score: u64,
    /// `raw_score` normalized to `0..=100`.
    pub percentage: u8,
    /// Classified level.
    pub risk_level: RiskLevel,
    /// Level description.
    pub description: String,
    /// Tags not previously reported by a final update.
    pub newly_found_tags: Vec<String>,
    /// True when the counts include uncommitted interim matches.
    ///
    /// A provisional percentage never reaches 100 unless every rule is
    /// already committed.
    pub provisional: bool,
}

impl ScoreSnapshot {
    /// Snapshot of committed matches only.
    pub(crate) fn committed(raw_score: u64, max_score: u64, newly_found_tags: Vec<String>) -> Self {
        let percentage = scamwatch_rules::percentage_of(raw_score, max_score);
        Self::classified(raw_score, max_score, percentage, newly_found_tags, false)
    }

    /// Snapshot counting interim matches on top of `committed_score`.
    pub(crate) fn provisional(
        raw_score: u64,
        committed_score: u64,
        max_score: u64,
        newly_found_tags: Vec<String>,
    ) -> Self {
        let mut percentage = scamwatch_rules::percentage_of(raw_score, max_score);
        if committed_score < max_score {
            percentage = percentage.min(99);
        }
        Self::classified(raw_score, max_score, percentage, newly_found_tags, true)
    }

    fn classified(
        raw_score: u64,
        max_score: u64,
        percentage: u8,
        newly_found_tags: Vec<String>,
        provisional: bool,
    ) -> Self {
        let classification = scamwatch_rules::classify(percentage);
        Self {
            raw_score,
            max_score,
            percentage,
            risk_level: classification.level,
            description: classification.description.to_owned(),
            newly_found_tags,
            provisional,
        }
    }
}
