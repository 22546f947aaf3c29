//! Outward engine events.
//!
//! Every event serializes as a JSON object with a `type` discriminator and
//! camelCase fields, suitable for JSON-lines transport.

use chrono::{DateTime, Utc};
use scamwatch_core::SessionId;
use scamwatch_rules::{MatchEvent, RiskLevel};
use serde::{Deserialize, Serialize};

use crate::session::ScoreSnapshot;

/// Score after one processed segment (or reset).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdate {
    /// Session the update belongs to.
    pub session_id: SessionId,
    /// Counted score.
    pub raw_score: u64,
    /// Rule table maximum.
    pub max_score: u64,
    /// Normalized score, `0..=100`.
    pub percentage: u8,
    /// Classified level.
    pub risk_level: RiskLevel,
    /// Level description.
    pub description: String,
    /// Tags not previously reported by a final update.
    pub newly_found_tags: Vec<String>,
    /// Whether the triggering segment was final.
    pub is_final: bool,
    /// Whether the score includes uncommitted interim matches.
    pub provisional: bool,
    /// When the update was produced.
    pub timestamp: DateTime<Utc>,
}

impl ScoreUpdate {
    /// Wrap a snapshot for a session.
    pub fn from_snapshot(session_id: SessionId, snapshot: ScoreSnapshot, is_final: bool) -> Self {
        Self {
            session_id,
            raw_score: snapshot.raw_score,
            max_score: snapshot.max_score,
            percentage: snapshot.percentage,
            risk_level: snapshot.risk_level,
            description: snapshot.description,
            newly_found_tags: snapshot.newly_found_tags,
            is_final,
            provisional: snapshot.provisional,
            timestamp: Utc::now(),
        }
    }
}

/// Terminal record of a session, emitted once when it ends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Session that ended.
    pub session_id: SessionId,
    /// Authoritative score from committed matches.
    pub final_score_update: ScoreUpdate,
    /// Committed matches, in commit order.
    pub matches: Vec<MatchEvent>,
    /// Committed final transcript.
    pub transcript: String,
    /// Final segments received.
    pub final_segments: u64,
    /// Interim segments received.
    pub interim_segments: u64,
    /// Plain-language summary.
    pub summary: String,
}

/// Events broadcast by the coordinator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EngineEvent {
    /// A session was started.
    #[serde(rename_all = "camelCase")]
    SessionStarted {
        /// Session id.
        session_id: SessionId,
        /// Start time.
        timestamp: DateTime<Utc>,
    },
    /// Score after a segment.
    ScoreChanged(ScoreUpdate),
    /// Non-empty set of newly found tags.
    #[serde(rename_all = "camelCase")]
    KeywordsFound {
        /// Session id.
        session_id: SessionId,
        /// Newly found tags, in table order.
        tags: Vec<String>,
        /// Whether the tags were committed by a final segment.
        is_final: bool,
    },
    /// Session state was cleared by the operator.
    #[serde(rename_all = "camelCase")]
    SessionReset {
        /// Session id.
        session_id: SessionId,
    },
    /// Session ended.
    SessionEnded(SessionSummary),
}

impl EngineEvent {
    /// Session this event belongs to.
    pub fn session_id(&self) -> &SessionId {
        match self {
            Self::SessionStarted { session_id, .. }
            | Self::KeywordsFound { session_id, .. }
            | Self::SessionReset { session_id } => session_id,
            Self::ScoreChanged(update) => &update.session_id,
            Self::SessionEnded(summary) => &summary.session_id,
        }
    }

    /// Which kind of event this is.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::SessionStarted { .. } => EventKind::SessionStarted,
            Self::ScoreChanged(_) => EventKind::ScoreChanged,
            Self::KeywordsFound { .. } => EventKind::KeywordsFound,
            Self::SessionReset { .. } => EventKind::SessionReset,
            Self::SessionEnded(_) => EventKind::SessionEnded,
        }
    }

    /// Wire discriminator.
    pub fn event_type(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Fieldless mirror of [`EngineEvent`]'s variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`EngineEvent::SessionStarted`].
    SessionStarted,
    /// [`EngineEvent::ScoreChanged`].
    ScoreChanged,
    /// [`EngineEvent::KeywordsFound`].
    KeywordsFound,
    /// [`EngineEvent::SessionReset`].
    SessionReset,
    /// [`EngineEvent::SessionEnded`].
    SessionEnded,
}

impl EventKind {
    /// Every kind, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::SessionStarted,
        Self::ScoreChanged,
        Self::KeywordsFound,
        Self::SessionReset,
        Self::SessionEnded,
    ];

    /// Wire name, identical to the serde tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SessionStarted => "sessionStarted",
            Self::ScoreChanged => "scoreChanged",
            Self::KeywordsFound => "keywordsFound",
            Self::SessionReset => "sessionReset",
            Self::SessionEnded => "sessionEnded",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}
