//! Session accumulator: applies transcript segments to a [`SessionState`].
//!
//! Interim segments produce a provisional snapshot and never touch the
//! committed tag set. Final segments commit newly matched tags exactly once.
//! With [`MatchWindow::Transcript`] the committed transcript is prepended to
//! the segment before matching, so phrases split across segments still
//! match; the dedup rules are the same in both modes.

use std::sync::Arc;

use scamwatch_core::text::preview;
use scamwatch_rules::{MatchEvent, RuleTable, match_all};
use scamwatch_settings::MatchWindow;
use tracing::debug;

use crate::session::{ScoreSnapshot, SessionState};

/// Stateless scorer shared by all sessions.
#[derive(Clone, Debug)]
pub struct Accumulator {
    table: Arc<RuleTable>,
    window: MatchWindow,
}

impl Accumulator {
    /// Create an accumulator over a shared table.
    pub fn new(table: Arc<RuleTable>, window: MatchWindow) -> Self {
        Self { table, window }
    }

    /// The shared rule table.
    pub fn table(&self) -> &Arc<RuleTable> {
        &self.table
    }

    /// Configured match window.
    pub fn window(&self) -> MatchWindow {
        self.window
    }

    /// Fresh session state.
    pub fn start(&self) -> SessionState {
        SessionState::default()
    }

    /// Apply one segment and return the resulting snapshot.
    pub fn apply_segment(
        &self,
        state: &mut SessionState,
        text: &str,
        is_final: bool,
    ) -> ScoreSnapshot {
        let matches = match_all(&self.window_text(state, text), &self.table);
        debug!(
            is_final,
            preview = %preview(text),
            match_count = matches.len(),
            "applying segment"
        );
        if is_final {
            self.apply_final(state, text, matches)
        } else {
            self.apply_interim(state, text, &matches)
        }
    }

    /// Authoritative snapshot from committed matches only.
    ///
    /// Trailing interim text is ignored and `newly_found_tags` is empty.
    pub fn finish(&self, state: &SessionState) -> ScoreSnapshot {
        self.committed_snapshot(state)
    }

    /// Committed snapshot with no new tags.
    pub fn committed_snapshot(&self, state: &SessionState) -> ScoreSnapshot {
        ScoreSnapshot::committed(state.raw_score, self.table.max_score(), Vec::new())
    }

    fn window_text(&self, state: &SessionState, text: &str) -> String {
        match self.window {
            MatchWindow::Segment => text.to_owned(),
            MatchWindow::Transcript if state.last_final_text.is_empty() => text.to_owned(),
            MatchWindow::Transcript => format!("{} {}", state.last_final_text, text),
        }
    }

    fn apply_interim(
        &self,
        state: &mut SessionState,
        text: &str,
        matches: &[MatchEvent],
    ) -> ScoreSnapshot {
        state.interim_segments += 1;
        state.pending_interim_text = Some(text.to_owned());

        let mut provisional_score = state.raw_score;
        let mut newly_found = Vec::new();
        for m in matches {
            if !state.matched_tags.contains(&m.tag) {
                provisional_score += u64::from(m.weight);
                newly_found.push(m.tag.clone());
            }
        }

        ScoreSnapshot::provisional(
            provisional_score,
            state.raw_score,
            self.table.max_score(),
            newly_found,
        )
    }

    fn apply_final(
        &self,
        state: &mut SessionState,
        text: &str,
        matches: Vec<MatchEvent>,
    ) -> ScoreSnapshot {
        state.final_segments += 1;
        state.pending_interim_text = None;
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            if !state.last_final_text.is_empty() {
                state.last_final_text.push(' ');
            }
            state.last_final_text.push_str(trimmed);
        }

        let mut newly_found = Vec::new();
        for m in matches {
            if state.matched_tags.insert(m.tag.clone()) {
                state.raw_score += u64::from(m.weight);
                debug!(tag = %m.tag, weight = m.weight, raw_score = state.raw_score, "tag committed");
                newly_found.push(m.tag.clone());
                state.matches.push(m);
            }
        }

        ScoreSnapshot::committed(state.raw_score, self.table.max_score(), newly_found)
    }
}
