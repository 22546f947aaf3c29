//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`ScamwatchSettings::default()`]
//! 2. If `~/.scamwatch/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `SCAMWATCH_*` environment variable overrides (highest priority)
//! 4. Clamp out-of-range values ([`ScamwatchSettings::validate`])
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::{
    MAX_EVENT_CAPACITY, MAX_MAX_SESSIONS, MIN_EVENT_CAPACITY, MIN_MAX_SESSIONS, MatchWindow,
    ScamwatchSettings,
};

/// Resolve the path to the settings file (`~/.scamwatch/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".scamwatch").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<ScamwatchSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<ScamwatchSettings> {
    let mut settings = load_file_layers(path)?;
    apply_env_overrides(&mut settings);
    settings.validate();
    Ok(settings)
}

/// Defaults deep-merged with the file at `path` (no env overrides).
fn load_file_layers(path: &Path) -> Result<ScamwatchSettings> {
    let defaults = serde_json::to_value(ScamwatchSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Invalid values are ignored with a warning (fall back to file/default).
pub fn apply_env_overrides(settings: &mut ScamwatchSettings) {
    if let Some(v) = read_env_string("SCAMWATCH_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read_env_string("SCAMWATCH_RULES_PATH") {
        settings.rules.path = Some(v);
    }
    if let Some(v) = read_env_string("SCAMWATCH_MATCH_WINDOW") {
        match MatchWindow::parse(&v) {
            Some(window) => settings.engine.match_window = window,
            None => {
                tracing::warn!(key = "SCAMWATCH_MATCH_WINDOW", value = %v, "invalid match window, ignoring");
            }
        }
    }
    if let Some(v) = read_env_usize(
        "SCAMWATCH_EVENT_CAPACITY",
        MIN_EVENT_CAPACITY,
        MAX_EVENT_CAPACITY,
    ) {
        settings.engine.event_capacity = v;
    }
    if let Some(v) = read_env_usize("SCAMWATCH_MAX_SESSIONS", MIN_MAX_SESSIONS, MAX_MAX_SESSIONS) {
        settings.engine.max_sessions = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    let result = parse_usize_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid usize env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
