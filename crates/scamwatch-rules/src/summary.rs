//! Plain-language session summary built from committed matches.

use crate::classifier::RiskLevel;
use crate::matcher::MatchEvent;
use crate::table::RuleTable;

/// Number of explanations listed under "Key concerns".
pub const TOP_CONCERNS: usize = 3;

const LEGITIMATE: &str =
    "This call appears to be legitimate. No significant scam indicators were detected.";

fn intro(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => {
            "HIGH RISK: This call contains multiple strong indicators of a scam attempt. "
        }
        RiskLevel::Medium => {
            "MEDIUM RISK: This call contains concerning patterns that may indicate a scam. "
        }
        RiskLevel::Low => {
            "LOW RISK: This call contains a few concerning elements that warrant caution. "
        }
        RiskLevel::Minimal => {
            "MINIMAL RISK: This call contains very few concerning elements, but stay vigilant. "
        }
    }
}

fn recommendation(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High | RiskLevel::Medium => {
            "Recommendation: Do not share personal information or make payments. Hang up and contact the organization directly using their official contact information."
        }
        RiskLevel::Low => {
            "Recommendation: Proceed with caution. Verify any requests independently before taking action."
        }
        RiskLevel::Minimal => {
            "Recommendation: Standard precautions apply. Never share sensitive information unless you initiated the call."
        }
    }
}

/// Explanations of the heaviest matches, ties kept in match order.
///
/// Matches whose rule has no explanation are skipped.
pub fn top_concerns<'t>(matches: &[MatchEvent], table: &'t RuleTable) -> Vec<&'t str> {
    let mut ranked: Vec<&MatchEvent> = matches.iter().collect();
    ranked.sort_by(|a, b| b.weight.cmp(&a.weight));
    ranked
        .into_iter()
        .take(TOP_CONCERNS)
        .filter_map(|m| table.get(&m.tag).and_then(|rule| rule.explanation()))
        .collect()
}

/// Compose the summary for a classified session.
pub fn compose(level: RiskLevel, matches: &[MatchEvent], table: &RuleTable) -> String {
    if level == RiskLevel::Minimal && matches.is_empty() {
        return LEGITIMATE.to_owned();
    }

    let mut summary = String::from(intro(level));
    let concerns = top_concerns(matches, table);
    if !concerns.is_empty() {
        summary.push_str("Key concerns: ");
        summary.push_str(&concerns.join("; "));
        summary.push_str(". ");
    }
    summary.push_str(recommendation(level));
    summary
}
