//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and implement
//! [`Default`] with production values. Every section is `#[serde(default)]`
//! so partial JSON files are accepted.

mod engine;

pub use engine::*;

use serde::{Deserialize, Serialize};

/// Root settings type.
///
/// ```json
/// {
///   "version": "0.1.0",
///   "logging": { "level": "info" },
///   "rules": { "path": "/etc/scamwatch/rules.json" },
///   "engine": { "matchWindow": "transcript" }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScamwatchSettings {
    /// Settings schema version.
    pub version: String,
    /// Logging configuration.
    pub logging: LoggingSettings,
    /// Rule table source.
    pub rules: RulesSettings,
    /// Scoring engine and coordinator settings.
    pub engine: EngineSettings,
}

impl Default for ScamwatchSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            logging: LoggingSettings::default(),
            rules: RulesSettings::default(),
            engine: EngineSettings::default(),
        }
    }
}

impl ScamwatchSettings {
    /// Clamp numeric fields into their supported ranges.
    ///
    /// Called automatically during loading. Out-of-range values are clamped
    /// with a warning rather than rejected.
    pub fn validate(&mut self) {
        let engine = &mut self.engine;
        let capacity = engine
            .event_capacity
            .clamp(MIN_EVENT_CAPACITY, MAX_EVENT_CAPACITY);
        if capacity != engine.event_capacity {
            tracing::warn!(
                "eventCapacity out of range ({}), clamped to {capacity}",
                engine.event_capacity
            );
            engine.event_capacity = capacity;
        }

        let sessions = engine.max_sessions.clamp(MIN_MAX_SESSIONS, MAX_MAX_SESSIONS);
        if sessions != engine.max_sessions {
            tracing::warn!(
                "maxSessions out of range ({}), clamped to {sessions}",
                engine.max_sessions
            );
            engine.max_sessions = sessions;
        }

        if self.logging.level.trim().is_empty() {
            tracing::warn!("empty logging level, using warn");
            self.logging.level = "warn".to_string();
        }
    }
}

/// Output format for the stderr log subscriber.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact human-readable lines.
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// `tracing` filter directive (e.g. `info`, `scamwatch_engine=debug`).
    pub level: String,
    /// Subscriber output format.
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Rule table source.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RulesSettings {
    /// Path to a JSON rule table. `None` uses the built-in table.
    pub path: Option<String>,
}
