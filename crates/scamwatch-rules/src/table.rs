//! Rule table: the validated, read-only set of weighted pattern rules.
//!
//! Rules are independent boolean predicates evaluated against the whole
//! text window, so the table is a plain ordered list rather than an index.
//! Order only affects how matches are listed in events and logs.
//!
//! Tables are built once through [`RuleTableBuilder`] (or from JSON) and
//! validated up front:
//! - every tag is non-empty and unique
//! - every weight is in `1..=u32::MAX`
//! - every pattern compiles (case-insensitive)
//! - the table is not empty
//!
//! `max_score` is computed at build time and never changes afterwards.

use std::collections::HashSet;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{ConfigError, Result};

/// Declarative rule definition, as written in JSON rule files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    /// Stable identifier, unique within a table (e.g. `gift_card`).
    pub tag: String,
    /// Score contribution when the rule matches. Must be positive.
    pub weight: i64,
    /// Regular expression, matched case-insensitively.
    pub pattern: String,
    /// Human-readable reason shown when the rule fires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl RuleSpec {
    /// Create a spec without an explanation.
    pub fn new(tag: impl Into<String>, weight: i64, pattern: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            weight,
            pattern: pattern.into(),
            explanation: None,
        }
    }

    /// Attach an explanation.
    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

/// A compiled, validated rule.
#[derive(Clone)]
pub struct Rule {
    tag: String,
    weight: u32,
    pattern: Regex,
    explanation: Option<String>,
}

impl Rule {
    /// Stable identifier.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Score contribution when matched.
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Source text of the pattern.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Explanation, if the table provides one.
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Whether the pattern occurs anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("tag", &self.tag)
            .field("weight", &self.weight)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// JSON document shape for rule table files.
#[derive(Debug, Deserialize, Serialize)]
struct RuleFile {
    rules: Vec<RuleSpec>,
}

/// Ordered, validated rule collection with a cached maximum score.
#[derive(Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
    max_score: u64,
}

impl RuleTable {
    /// Start building a table.
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::default()
    }

    /// Parse and validate a JSON rule table (`{"rules": [...]}`).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: RuleFile = serde_json::from_str(json)?;
        Self::builder().specs(file.rules).build()
    }

    /// Read, parse and validate a JSON rule table file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        debug!(?path, "loading rule table");
        let content = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&content)?;
        info!(
            ?path,
            rule_count = table.len(),
            max_score = table.max_score(),
            "rule table loaded"
        );
        Ok(table)
    }

    /// Rules in table order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Sum of all rule weights.
    pub fn max_score(&self) -> u64 {
        self.max_score
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Always false for a built table; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look up a rule by tag.
    pub fn get(&self, tag: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.tag == tag)
    }

    /// Declarative form of the table, in order.
    pub fn to_specs(&self) -> Vec<RuleSpec> {
        self.rules
            .iter()
            .map(|r| RuleSpec {
                tag: r.tag.clone(),
                weight: i64::from(r.weight),
                pattern: r.pattern.as_str().to_owned(),
                explanation: r.explanation.clone(),
            })
            .collect()
    }

    /// Serialize the table in the JSON file format.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&RuleFile {
            rules: self.to_specs(),
        })?)
    }
}

impl std::fmt::Debug for RuleTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleTable")
            .field("rule_count", &self.rules.len())
            .field("max_score", &self.max_score)
            .finish()
    }
}

/// Builder collecting rule specs; all validation happens in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    specs: Vec<RuleSpec>,
}

impl RuleTableBuilder {
    /// Add a rule.
    #[must_use]
    pub fn rule(mut self, tag: impl Into<String>, weight: i64, pattern: impl Into<String>) -> Self {
        self.specs.push(RuleSpec::new(tag, weight, pattern));
        self
    }

    /// Add a rule from a spec.
    #[must_use]
    pub fn spec(mut self, spec: RuleSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Add several specs.
    #[must_use]
    pub fn specs(mut self, specs: impl IntoIterator<Item = RuleSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    /// Validate and compile the table.
    pub fn build(self) -> Result<RuleTable> {
        if self.specs.is_empty() {
            return Err(ConfigError::EmptyTable);
        }

        let mut seen: HashSet<String> = HashSet::with_capacity(self.specs.len());
        let mut rules = Vec::with_capacity(self.specs.len());
        let mut max_score: u64 = 0;

        for (index, spec) in self.specs.into_iter().enumerate() {
            let tag = spec.tag.trim().to_owned();
            if tag.is_empty() {
                return Err(ConfigError::EmptyTag { index });
            }
            if spec.weight <= 0 {
                return Err(ConfigError::NonPositiveWeight {
                    tag,
                    weight: spec.weight,
                });
            }
            let Ok(weight) = u32::try_from(spec.weight) else {
                return Err(ConfigError::WeightTooLarge {
                    tag,
                    weight: spec.weight,
                    max: u32::MAX,
                });
            };
            if !seen.insert(tag.clone()) {
                return Err(ConfigError::DuplicateTag { tag });
            }
            let pattern = match RegexBuilder::new(&spec.pattern)
                .case_insensitive(true)
                .build()
            {
                Ok(p) => p,
                Err(source) => return Err(ConfigError::InvalidPattern { tag, source }),
            };

            debug!(tag = %tag, weight, "rule registered");
            max_score += u64::from(weight);
            rules.push(Rule {
                tag,
                weight,
                pattern,
                explanation: spec.explanation,
            });
        }

        Ok(RuleTable { rules, max_score })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
