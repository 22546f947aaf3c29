//! Rule matcher: evaluates every rule in a table against one text window.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::table::RuleTable;

/// One rule that matched a text window.
///
/// A rule contributes its weight once per window no matter how often its
/// pattern occurs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Tag of the matched rule.
    pub tag: String,
    /// Weight of the matched rule.
    pub weight: u32,
}

/// Evaluate `table` against `text`, returning matches in table order.
///
/// Pure and total: empty or whitespace-only text yields no matches.
pub fn match_all(text: &str, table: &RuleTable) -> Vec<MatchEvent> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let matches: Vec<MatchEvent> = table
        .rules()
        .iter()
        .filter(|rule| rule.is_match(text))
        .map(|rule| MatchEvent {
            tag: rule.tag().to_owned(),
            weight: rule.weight(),
        })
        .collect();
    trace!(text_len = text.len(), match_count = matches.len(), "matched text window");
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_table() -> RuleTable {
        RuleTable::builder()
            .rule("gift_card", 22, "gift card")
            .rule("urgency", 18, "urgent")
            .build()
            .unwrap()
    }

    #[test]
    fn matches_in_table_order() {
        let matches = match_all("This is urgent, please buy a gift card now", &scenario_table());
        assert_eq!(
            matches,
            vec![
                MatchEvent { tag: "gift_card".into(), weight: 22 },
                MatchEvent { tag: "urgency".into(), weight: 18 },
            ]
        );
    }

    #[test]
    fn repeated_occurrences_count_once() {
        let matches = match_all("urgent urgent URGENT", &scenario_table());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].weight, 18);
    }

    #[test]
    fn empty_and_short_text() {
        let table = scenario_table();
        assert!(match_all("", &table).is_empty());
        assert!(match_all("   \n\t", &table).is_empty());
        assert!(match_all("a", &table).is_empty());
    }

    #[test]
    fn no_match_for_unrelated_text() {
        assert!(match_all("have a nice day", &scenario_table()).is_empty());
    }

    #[test]
    fn deterministic() {
        let table = scenario_table();
        let text = "urgent gift card";
        assert_eq!(match_all(text, &table), match_all(text, &table));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn matches_are_unique_and_from_table(text in ".{0,200}") {
                let table = scenario_table();
                let matches = match_all(&text, &table);
                prop_assert!(matches.len() <= table.len());
                let mut tags: Vec<&str> = matches.iter().map(|m| m.tag.as_str()).collect();
                tags.dedup();
                prop_assert_eq!(tags.len(), matches.len());
                for m in &matches {
                    prop_assert_eq!(table.get(&m.tag).map(crate::Rule::weight), Some(m.weight));
                }
            }
        }
    }
}
