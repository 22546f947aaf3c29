//! Fan-out of [`EngineEvent`]s to subscribers, with per-kind tallies.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::broadcast;

use crate::events::{EngineEvent, EventKind};

/// Broadcast bus for coordinator events.
///
/// `publish` never blocks. Receivers that fall more than `capacity` events
/// behind observe `RecvError::Lagged` instead of stalling the coordinator.
/// Every published event is tallied by kind, received or not.
pub struct EventBus {
    tx: broadcast::Sender<EngineEvent>,
    published: [AtomicU64; EventKind::ALL.len()],
}

impl EventBus {
    /// Create a bus whose channel holds `capacity` events (at least 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            published: Default::default(),
        }
    }

    /// Tally `event` and send it to current subscribers.
    pub fn publish(&self, event: EngineEvent) {
        let _ = self.published[event.kind().index()].fetch_add(1, Ordering::Relaxed);
        // No subscribers is not an error: events are fire-and-forget.
        let _ = self.tx.send(event);
    }

    /// Receive every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    /// Snapshot of how many events of each kind were published.
    pub fn counts(&self) -> EventCounts {
        let load = |kind: EventKind| self.published[kind.index()].load(Ordering::Relaxed);
        EventCounts {
            session_started: load(EventKind::SessionStarted),
            score_changed: load(EventKind::ScoreChanged),
            keywords_found: load(EventKind::KeywordsFound),
            session_reset: load(EventKind::SessionReset),
            session_ended: load(EventKind::SessionEnded),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("counts", &self.counts())
            .finish_non_exhaustive()
    }
}

/// Published-event tallies, one per [`EventKind`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCounts {
    /// `sessionStarted` events.
    pub session_started: u64,
    /// `scoreChanged` events.
    pub score_changed: u64,
    /// `keywordsFound` events.
    pub keywords_found: u64,
    /// `sessionReset` events.
    pub session_reset: u64,
    /// `sessionEnded` events.
    pub session_ended: u64,
}

impl EventCounts {
    /// Count for one kind.
    pub fn get(&self, kind: EventKind) -> u64 {
        match kind {
            EventKind::SessionStarted => self.session_started,
            EventKind::ScoreChanged => self.score_changed,
            EventKind::KeywordsFound => self.keywords_found,
            EventKind::SessionReset => self.session_reset,
            EventKind::SessionEnded => self.session_ended,
        }
    }

    /// Sum over every kind.
    pub fn total(&self) -> u64 {
        EventKind::ALL.into_iter().map(|kind| self.get(kind)).sum()
    }
}
