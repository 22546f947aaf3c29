//! # scamwatch-rules
//!
//! Weighted pattern rules and the pure scoring functions built on them:
//!
//! - [`RuleTable`]: validated, ordered rule set with a cached `max_score`
//! - [`match_all`]: which rules occur in a text window
//! - [`classify`] / [`percentage_of`]: normalized score to risk level
//! - [`summary::compose`]: plain-language summary of a classified session
//!
//! Nothing here holds session state; see `scamwatch-engine` for that.

#![deny(unsafe_code)]

pub mod builtin;
pub mod classifier;
pub mod errors;
pub mod matcher;
pub mod summary;
pub mod table;

pub use builtin::BUILTIN_RULES;
pub use classifier::{Classification, RiskLevel, classify, percentage_of};
pub use errors::{ConfigError, Result};
pub use matcher::{MatchEvent, match_all};
pub use table::{Rule, RuleSpec, RuleTable, RuleTableBuilder};
