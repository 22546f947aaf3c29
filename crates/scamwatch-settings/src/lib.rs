//! # scamwatch-settings
//!
//! Configuration management with layered sources.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`ScamwatchSettings::default()`]
//! 2. **User file**: `~/.scamwatch/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `SCAMWATCH_*` overrides (highest priority)
//!
//! Loading is explicit: callers own the returned value and pass the pieces
//! each subsystem needs.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;
