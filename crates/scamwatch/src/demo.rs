//! Simulated scam call, streamed through the coordinator.

use std::io::Write;

use anyhow::Result;
use scamwatch_core::SessionId;
use scamwatch_engine::{Coordinator, SessionSummary};

use crate::output::drain;

/// Lines of the simulated call, in speaking order.
pub const SIMULATED_CALL: &[&str] = &[
    "Hello, how are you today?",
    "We're calling about your car's extended warranty.",
    "This is an urgent message regarding your bank account.",
    "We need you to verify your personal information.",
    "There has been suspicious activity on your social security number.",
    "You need to act immediately to resolve this issue.",
    "Can you confirm your mother's maiden name?",
    "You have been selected as a grand prize winner!",
    "To claim your prize, you just need to pay a small processing fee.",
    "The only way to pay the fee is with a gift card.",
    "We've detected a problem with your computer, we can fix it if you grant us access.",
    "This is the IRS, and there is a warrant for your arrest unless you pay now.",
    "What a lovely day for a walk in the park.",
    "I'm going to the grocery store later, do you need anything?",
    "Remember to call your grandchildren this weekend.",
    "We need you to send a wire transfer to a secure account.",
];

/// First half of a line's words, as a transcription provider would
/// deliver before finalizing.
fn interim_prefix(line: &str) -> String {
    let words: Vec<&str> = line.split_whitespace().collect();
    words[..words.len().div_ceil(2)].join(" ")
}

/// Stream the simulated call, writing every event to `out`.
pub fn run<W: Write>(coordinator: &Coordinator, out: &mut W) -> Result<SessionSummary> {
    let mut rx = coordinator.subscribe();
    let session_id = SessionId::from("demo-call");
    coordinator.start_session(session_id.clone())?;
    let _ = drain(&mut rx, out)?;

    for line in SIMULATED_CALL {
        let _ = coordinator.on_segment(&session_id, &interim_prefix(line), false)?;
        let _ = coordinator.on_segment(&session_id, line, true)?;
        let _ = drain(&mut rx, out)?;
    }

    let summary = coordinator.on_session_end(&session_id)?;
    let _ = drain(&mut rx, out)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use scamwatch_rules::RuleTable;
    use scamwatch_settings::EngineSettings;

    #[test]
    fn interim_prefix_takes_leading_half() {
        assert_eq!(interim_prefix("one two three four"), "one two");
        assert_eq!(interim_prefix("one two three"), "one two");
        assert_eq!(interim_prefix(""), "");
    }

    #[test]
    fn demo_call_is_flagged() {
        let table = Arc::new(RuleTable::builtin().unwrap());
        let coord = Coordinator::new(table, &EngineSettings::default());
        let mut out = Vec::new();
        let summary = run(&coord, &mut out).unwrap();

        let tags: Vec<&str> = summary.matches.iter().map(|m| m.tag.as_str()).collect();
        for expected in ["urgency", "gift_card", "authority_threat", "money_transfer"] {
            assert!(tags.contains(&expected), "missing {expected}");
        }
        assert!(summary.final_score_update.raw_score > 0);
        assert_eq!(summary.final_segments, SIMULATED_CALL.len() as u64);
        assert_eq!(coord.active_sessions(), 0);
        assert!(!out.is_empty());
    }
}
