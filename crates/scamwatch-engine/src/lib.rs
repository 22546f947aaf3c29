//! # scamwatch-engine
//!
//! Streaming scam-likelihood scoring over live transcripts.
//!
//! - [`Accumulator`]: applies interim/final segments to a [`SessionState`]
//! - [`Coordinator`]: owns active sessions, routes segments, broadcasts
//!   [`EngineEvent`]s through an [`EventBus`]
//!
//! The rule table is shared read-only across sessions; each session's state
//! is mutated by one segment at a time.

#![deny(unsafe_code)]

pub mod accumulator;
pub mod bus;
pub mod coordinator;
pub mod errors;
pub mod events;
pub mod session;

pub use accumulator::Accumulator;
pub use bus::{EventBus, EventCounts};
pub use coordinator::Coordinator;
pub use errors::EngineError;
pub use events::{EngineEvent, EventKind, ScoreUpdate, SessionSummary};
pub use session::{ScoreSnapshot, SessionState};

use std::path::Path;

use scamwatch_rules::{ConfigError, RuleTable};
use tracing::info;

/// Load the rule table from `path`, or the built-in table when `None`.
pub fn load_rule_table(path: Option<&Path>) -> Result<RuleTable, ConfigError> {
    match path {
        Some(path) => RuleTable::load_from_path(path),
        None => {
            let table = RuleTable::builtin()?;
            info!(
                rule_count = table.len(),
                max_score = table.max_score(),
                "using built-in rule table"
            );
            Ok(table)
        }
    }
}
