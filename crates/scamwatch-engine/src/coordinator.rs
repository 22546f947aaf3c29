//! Streaming coordinator: routes segments to per-session state and emits
//! outward events.
//!
//! Sessions must be started explicitly. Segments and lifecycle calls for an
//! unknown id fail with [`EngineError::SessionNotFound`].
//!
//! Each session's state sits behind its own mutex and events are emitted
//! while that lock is held, so subscribers see one session's events in the
//! order its segments were applied. Different sessions never contend.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use scamwatch_core::SessionId;
use scamwatch_rules::{RuleTable, summary};
use scamwatch_settings::EngineSettings;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::accumulator::Accumulator;
use crate::bus::{EventBus, EventCounts};
use crate::errors::EngineError;
use crate::events::{EngineEvent, ScoreUpdate, SessionSummary};
use crate::session::SessionState;

/// Owns every active session.
pub struct Coordinator {
    accumulator: Accumulator,
    sessions: DashMap<SessionId, Arc<Mutex<SessionState>>>,
    active: AtomicUsize,
    max_sessions: usize,
    events: EventBus,
}

impl Coordinator {
    /// Create a coordinator over a shared rule table.
    pub fn new(table: Arc<RuleTable>, settings: &EngineSettings) -> Self {
        Self {
            accumulator: Accumulator::new(table, settings.match_window),
            sessions: DashMap::new(),
            active: AtomicUsize::new(0),
            max_sessions: settings.max_sessions.max(1),
            events: EventBus::with_capacity(settings.event_capacity),
        }
    }

    /// Subscribe to outward events.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// Events published so far, by kind.
    pub fn event_counts(&self) -> EventCounts {
        self.events.counts()
    }

    /// The shared accumulator.
    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// Number of active sessions.
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Whether `session_id` is active.
    pub fn is_active(&self, session_id: &SessionId) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Start a session.
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub fn start_session(&self, session_id: SessionId) -> Result<(), EngineError> {
        if self
            .active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_sessions).then_some(n + 1)
            })
            .is_err()
        {
            warn!(max = self.max_sessions, "session cap reached");
            return Err(EngineError::TooManySessions {
                max: self.max_sessions,
            });
        }

        match self.sessions.entry(session_id.clone()) {
            Entry::Occupied(_) => {
                let _ = self.active.fetch_sub(1, Ordering::AcqRel);
                warn!("session already active");
                Err(EngineError::SessionAlreadyActive(session_id))
            }
            Entry::Vacant(slot) => {
                let state = Arc::new(Mutex::new(self.accumulator.start()));
                // Locked before publishing so no segment event can precede this one
                let guard = state.lock();
                let _ = slot.insert(Arc::clone(&state));
                self.events.publish(EngineEvent::SessionStarted {
                    session_id,
                    timestamp: Utc::now(),
                });
                drop(guard);
                info!("session started");
                Ok(())
            }
        }
    }

    /// Apply a transcript segment and emit `scoreChanged`, plus
    /// `keywordsFound` when the update has new tags.
    #[instrument(skip_all, fields(session_id = %session_id, is_final = is_final))]
    pub fn on_segment(
        &self,
        session_id: &SessionId,
        text: &str,
        is_final: bool,
    ) -> Result<ScoreUpdate, EngineError> {
        let state = self.session(session_id)?;
        let mut state = state.lock();
        if state.ended {
            return Err(not_found(session_id));
        }

        let snapshot = self.accumulator.apply_segment(&mut state, text, is_final);
        let update = ScoreUpdate::from_snapshot(session_id.clone(), snapshot, is_final);
        debug!(
            raw_score = update.raw_score,
            percentage = update.percentage,
            risk_level = %update.risk_level,
            new_tags = update.newly_found_tags.len(),
            "segment scored"
        );

        self.events.publish(EngineEvent::ScoreChanged(update.clone()));
        if !update.newly_found_tags.is_empty() {
            self.events.publish(EngineEvent::KeywordsFound {
                session_id: session_id.clone(),
                tags: update.newly_found_tags.clone(),
                is_final,
            });
        }
        Ok(update)
    }

    /// Clear a session's state without ending it. Emits `sessionReset`
    /// followed by a zero `scoreChanged`.
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub fn reset_session(&self, session_id: &SessionId) -> Result<ScoreUpdate, EngineError> {
        let state = self.session(session_id)?;
        let mut state = state.lock();
        if state.ended {
            return Err(not_found(session_id));
        }

        *state = self.accumulator.start();
        let update = ScoreUpdate::from_snapshot(
            session_id.clone(),
            self.accumulator.committed_snapshot(&state),
            true,
        );
        self.events.publish(EngineEvent::SessionReset {
            session_id: session_id.clone(),
        });
        self.events.publish(EngineEvent::ScoreChanged(update.clone()));
        info!("session reset");
        Ok(update)
    }

    /// End a session: compute the final snapshot from committed matches,
    /// emit `sessionEnded`, and release the state.
    ///
    /// Callers must also invoke this when the owning transport disconnects.
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub fn on_session_end(&self, session_id: &SessionId) -> Result<SessionSummary, EngineError> {
        let Some((_, state)) = self.sessions.remove(session_id) else {
            return Err(not_found(session_id));
        };
        let _ = self.active.fetch_sub(1, Ordering::AcqRel);

        let mut state = state.lock();
        state.ended = true;

        let snapshot = self.accumulator.finish(&state);
        let text = summary::compose(
            snapshot.risk_level,
            state.matches(),
            self.accumulator.table(),
        );
        let final_score_update = ScoreUpdate::from_snapshot(session_id.clone(), snapshot, true);
        let record = SessionSummary {
            session_id: session_id.clone(),
            final_score_update,
            matches: state.matches().to_vec(),
            transcript: state.transcript().to_owned(),
            final_segments: state.final_segments(),
            interim_segments: state.interim_segments(),
            summary: text,
        };
        self.events.publish(EngineEvent::SessionEnded(record.clone()));
        info!(
            raw_score = record.final_score_update.raw_score,
            percentage = record.final_score_update.percentage,
            risk_level = %record.final_score_update.risk_level,
            final_segments = record.final_segments,
            "session ended"
        );
        Ok(record)
    }

    /// End every active session, returning their summaries.
    pub fn end_all(&self) -> Vec<SessionSummary> {
        let mut ids: Vec<SessionId> = self.sessions.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids.iter()
            .filter_map(|id| self.on_session_end(id).ok())
            .collect()
    }

    fn session(&self, session_id: &SessionId) -> Result<Arc<Mutex<SessionState>>, EngineError> {
        self.sessions
            .get(session_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| not_found(session_id))
    }
}

fn not_found(session_id: &SessionId) -> EngineError {
    warn!(session_id = %session_id, "unknown session");
    EngineError::SessionNotFound(session_id.clone())
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("active_sessions", &self.sessions.len())
            .field("max_sessions", &self.max_sessions)
            .field("window", &self.accumulator.window())
            .field("events", &self.events.counts())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn coordinator_with(settings: &EngineSettings) -> Coordinator {
        let table = RuleTable::builder()
            .rule("gift_card", 22, "gift card")
            .rule("urgency", 18, "urgent")
            .build()
            .unwrap();
        Coordinator::new(Arc::new(table), settings)
    }

    fn coordinator() -> Coordinator {
        coordinator_with(&EngineSettings::default())
    }

    // ── lifecycle ───────────────────────────────────────────────────

    #[test]
    fn start_and_end() {
        let coord = coordinator();
        let id = SessionId::from("call-1");
        coord.start_session(id.clone()).unwrap();
        assert!(coord.is_active(&id));
        assert_eq!(coord.active_sessions(), 1);

        let summary = coord.on_session_end(&id).unwrap();
        assert_eq!(summary.session_id, id);
        assert!(!coord.is_active(&id));
        assert_eq!(coord.active_sessions(), 0);
    }

    #[test]
    fn duplicate_start_rejected() {
        let coord = coordinator();
        coord.start_session("call-1".into()).unwrap();
        assert_matches!(
            coord.start_session("call-1".into()),
            Err(EngineError::SessionAlreadyActive(id)) if id.as_str() == "call-1"
        );
        assert_eq!(coord.active_sessions(), 1);
    }

    #[test]
    fn unknown_session_rejected() {
        let coord = coordinator();
        let id = SessionId::from("ghost");
        assert_matches!(
            coord.on_segment(&id, "urgent", true),
            Err(EngineError::SessionNotFound(_))
        );
        assert_matches!(coord.on_session_end(&id), Err(EngineError::SessionNotFound(_)));
        assert_matches!(coord.reset_session(&id), Err(EngineError::SessionNotFound(_)));
    }

    #[test]
    fn ended_session_cannot_be_ended_twice() {
        let coord = coordinator();
        let id = SessionId::from("call-1");
        coord.start_session(id.clone()).unwrap();
        let _ = coord.on_session_end(&id).unwrap();
        assert_matches!(coord.on_session_end(&id), Err(EngineError::SessionNotFound(_)));
    }

    #[test]
    fn session_id_reusable_after_end() {
        let coord = coordinator();
        let id = SessionId::from("call-1");
        coord.start_session(id.clone()).unwrap();
        let _ = coord.on_segment(&id, "urgent", true).unwrap();
        let _ = coord.on_session_end(&id).unwrap();

        coord.start_session(id.clone()).unwrap();
        let update = coord.on_segment(&id, "urgent", true).unwrap();
        assert_eq!(update.newly_found_tags, vec!["urgency"]);
    }

    #[test]
    fn session_cap_enforced() {
        let settings = EngineSettings {
            max_sessions: 2,
            ..EngineSettings::default()
        };
        let coord = coordinator_with(&settings);
        coord.start_session("a".into()).unwrap();
        coord.start_session("b".into()).unwrap();
        assert_matches!(
            coord.start_session("c".into()),
            Err(EngineError::TooManySessions { max: 2 })
        );

        let _ = coord.on_session_end(&SessionId::from("a")).unwrap();
        coord.start_session("c".into()).unwrap();
    }

    #[test]
    fn duplicate_start_does_not_consume_cap() {
        let settings = EngineSettings {
            max_sessions: 2,
            ..EngineSettings::default()
        };
        let coord = coordinator_with(&settings);
        coord.start_session("a".into()).unwrap();
        let _ = coord.start_session("a".into());
        coord.start_session("b".into()).unwrap();
    }

    #[test]
    fn end_all_releases_everything() {
        let coord = coordinator();
        coord.start_session("b".into()).unwrap();
        coord.start_session("a".into()).unwrap();
        let summaries = coord.end_all();
        let ids: Vec<&str> = summaries.iter().map(|s| s.session_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(coord.active_sessions(), 0);
    }

    // ── scoring ─────────────────────────────────────────────────────

    #[test]
    fn reset_clears_score() {
        let coord = coordinator();
        let id = SessionId::from("call-1");
        coord.start_session(id.clone()).unwrap();
        let _ = coord.on_segment(&id, "urgent gift card", true).unwrap();

        let update = coord.reset_session(&id).unwrap();
        assert_eq!(update.raw_score, 0);
        assert!(coord.is_active(&id));

        let again = coord.on_segment(&id, "urgent", true).unwrap();
        assert_eq!(again.newly_found_tags, vec!["urgency"]);
        assert_eq!(again.raw_score, 18);
    }

    #[test]
    fn summary_carries_committed_record() {
        let coord = coordinator();
        let id = SessionId::from("call-1");
        coord.start_session(id.clone()).unwrap();
        let _ = coord.on_segment(&id, "this is urgent", true).unwrap();
        let _ = coord.on_segment(&id, "gift card", false).unwrap();

        let summary = coord.on_session_end(&id).unwrap();
        assert_eq!(summary.final_score_update.raw_score, 18);
        assert_eq!(summary.matches.len(), 1);
        assert_eq!(summary.matches[0].tag, "urgency");
        assert_eq!(summary.transcript, "this is urgent");
        assert_eq!(summary.final_segments, 1);
        assert_eq!(summary.interim_segments, 1);
        assert!(summary.summary.starts_with("MEDIUM RISK: "));
    }

    // ── events ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn events_in_order() {
        let coord = coordinator();
        let mut rx = coord.subscribe();
        let id = SessionId::from("call-1");

        coord.start_session(id.clone()).unwrap();
        let _ = coord.on_segment(&id, "hello", true).unwrap();
        let _ = coord.on_segment(&id, "urgent", true).unwrap();
        let _ = coord.on_session_end(&id).unwrap();

        let mut types = Vec::new();
        while let Ok(event) = rx.try_recv() {
            types.push(event.event_type());
        }
        assert_eq!(
            types,
            vec![
                "sessionStarted",
                "scoreChanged",
                "scoreChanged",
                "keywordsFound",
                "sessionEnded"
            ]
        );
    }

    #[tokio::test]
    async fn reset_emits_reset_then_score() {
        let coord = coordinator();
        let id = SessionId::from("call-1");
        coord.start_session(id.clone()).unwrap();
        let mut rx = coord.subscribe();
        let _ = coord.reset_session(&id).unwrap();

        assert_eq!(rx.recv().await.unwrap().event_type(), "sessionReset");
        assert_matches!(
            rx.recv().await.unwrap(),
            EngineEvent::ScoreChanged(update) if update.raw_score == 0
        );
    }

    #[test]
    fn event_counts_track_published_kinds() {
        let coord = coordinator();
        let id = SessionId::from("call-1");
        coord.start_session(id.clone()).unwrap();
        let _ = coord.on_segment(&id, "urgent", false).unwrap();
        let _ = coord.on_segment(&id, "urgent", true).unwrap();
        let _ = coord.reset_session(&id).unwrap();
        let _ = coord.on_session_end(&id).unwrap();

        let counts = coord.event_counts();
        assert_eq!(counts.session_started, 1);
        assert_eq!(counts.score_changed, 3);
        assert_eq!(counts.keywords_found, 2);
        assert_eq!(counts.session_reset, 1);
        assert_eq!(counts.session_ended, 1);
        assert_eq!(counts.total(), 8);
    }

    #[test]
    fn rejected_calls_publish_nothing() {
        let coord = coordinator();
        let id = SessionId::from("ghost");
        assert!(coord.on_segment(&id, "urgent", true).is_err());
        assert!(coord.reset_session(&id).is_err());
        assert_eq!(coord.event_counts().total(), 0);
    }
}
