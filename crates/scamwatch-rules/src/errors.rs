//! Rule table configuration errors.

use thiserror::Error;

/// Errors raised while building or loading a rule table.
///
/// Every variant is a configuration error: a table that fails validation
/// must never be used for scoring, since `max_score` and therefore every
/// percentage would be meaningless.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two rules share the same tag.
    #[error("duplicate rule tag: {tag}")]
    DuplicateTag {
        /// The repeated tag.
        tag: String,
    },

    /// A rule weight is zero or negative.
    #[error("rule {tag} has non-positive weight {weight}")]
    NonPositiveWeight {
        /// Tag of the offending rule.
        tag: String,
        /// The rejected weight.
        weight: i64,
    },

    /// A rule weight does not fit the weight type.
    #[error("rule {tag} has weight {weight} above the maximum {max}")]
    WeightTooLarge {
        /// Tag of the offending rule.
        tag: String,
        /// The rejected weight.
        weight: i64,
        /// Largest accepted weight.
        max: u32,
    },

    /// A rule has an empty or whitespace-only tag.
    #[error("rule at position {index} has an empty tag")]
    EmptyTag {
        /// Zero-based position of the rule in the table.
        index: usize,
    },

    /// The table contains no rules.
    #[error("rule table is empty")]
    EmptyTable,

    /// A rule's pattern failed to compile.
    #[error("rule {tag} has an invalid pattern: {source}")]
    InvalidPattern {
        /// Tag of the offending rule.
        tag: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// Failed to read a rule table file.
    #[error("failed to read rule table: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a rule table file.
    #[error("failed to parse rule table JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for rule table operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
