//! Scoring engine and coordinator settings.

use serde::{Deserialize, Serialize};

/// Smallest accepted event channel capacity.
pub const MIN_EVENT_CAPACITY: usize = 1;
/// Largest accepted event channel capacity.
pub const MAX_EVENT_CAPACITY: usize = 65_536;
/// Smallest accepted session cap.
pub const MIN_MAX_SESSIONS: usize = 1;
/// Largest accepted session cap.
pub const MAX_MAX_SESSIONS: usize = 100_000;

/// Which text a segment's rules are matched against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchWindow {
    /// Match each segment's text on its own.
    #[default]
    Segment,
    /// Match the committed final transcript followed by the segment, so
    /// rules spanning segment boundaries can fire.
    Transcript,
}

impl MatchWindow {
    /// Parse the lowercase wire name.
    pub fn parse(val: &str) -> Option<Self> {
        match val.trim().to_lowercase().as_str() {
            "segment" => Some(Self::Segment),
            "transcript" => Some(Self::Transcript),
            _ => None,
        }
    }
}

impl std::fmt::Display for MatchWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Segment => write!(f, "segment"),
            Self::Transcript => write!(f, "transcript"),
        }
    }
}

/// Engine settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    /// Text window used for matching.
    pub match_window: MatchWindow,
    /// Capacity of the outward event broadcast channel.
    pub event_capacity: usize,
    /// Maximum number of concurrently active sessions.
    pub max_sessions: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            match_window: MatchWindow::Segment,
            event_capacity: 1024,
            max_sessions: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_window_parse() {
        assert_eq!(MatchWindow::parse("segment"), Some(MatchWindow::Segment));
        assert_eq!(MatchWindow::parse(" Transcript "), Some(MatchWindow::Transcript));
        assert_eq!(MatchWindow::parse("window"), None);
    }

    #[test]
    fn match_window_serde_lowercase() {
        let json = serde_json::to_string(&MatchWindow::Transcript).unwrap();
        assert_eq!(json, "\"transcript\"");
        let back: MatchWindow = serde_json::from_str("\"segment\"").unwrap();
        assert_eq!(back, MatchWindow::Segment);
    }

    #[test]
    fn partial_engine_json_keeps_defaults() {
        let engine: EngineSettings = serde_json::from_str(r#"{"maxSessions": 8}"#).unwrap();
        assert_eq!(engine.max_sessions, 8);
        assert_eq!(engine.event_capacity, 1024);
        assert_eq!(engine.match_window, MatchWindow::Segment);
    }
}
