//! Replay of JSON-lines transcript input through the coordinator.
//!
//! Input, one object per line:
//!
//! ```text
//! {"type":"start","sessionId":"call-1"}
//! {"type":"segment","sessionId":"call-1","text":"...","isFinal":true}
//! {"type":"reset","sessionId":"call-1"}
//! {"type":"end","sessionId":"call-1"}
//! ```
//!
//! Engine events are written as JSON lines. Malformed lines and lifecycle
//! errors produce an `error` record and replay continues. Sessions still
//! open at end of input are ended, as on a transport disconnect.

use std::io::Write;

use anyhow::Result;
use scamwatch_core::SessionId;
use scamwatch_engine::{Coordinator, EngineError};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::output::{drain, write_line};

/// One input record.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum ReplayInput {
    #[serde(rename_all = "camelCase")]
    Start { session_id: SessionId },
    #[serde(rename_all = "camelCase")]
    Segment {
        session_id: SessionId,
        text: String,
        #[serde(default)]
        is_final: bool,
    },
    #[serde(rename_all = "camelCase")]
    Reset { session_id: SessionId },
    #[serde(rename_all = "camelCase")]
    End { session_id: SessionId },
}

/// Error record written for a rejected input line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorRecord<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    line: usize,
    category: &'a str,
    message: String,
}

/// Counters for a finished replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    /// Non-blank lines read.
    pub lines: usize,
    /// Lines rejected.
    pub errors: usize,
    /// Events written.
    pub events: usize,
    /// Sessions ended implicitly at end of input.
    pub closed_at_eof: usize,
}

/// Replay `input` through `coordinator`, writing events to `out`.
pub async fn run<R, W>(coordinator: &Coordinator, input: R, out: &mut W) -> Result<ReplayStats>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut rx = coordinator.subscribe();
    let mut stats = ReplayStats::default();
    let mut lines = input.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        stats.lines += 1;

        let outcome = match serde_json::from_str::<ReplayInput>(&line) {
            Ok(input) => apply(coordinator, input).map_err(|e| (e.category().to_owned(), e.to_string())),
            Err(e) => Err(("invalid_input".to_owned(), e.to_string())),
        };
        if let Err((category, message)) = outcome {
            warn!(line = line_no, category = %category, error = %message, "replay line rejected");
            stats.errors += 1;
            write_line(
                out,
                &ErrorRecord {
                    kind: "error",
                    line: line_no,
                    category: &category,
                    message,
                },
            )?;
        }
        stats.events += drain(&mut rx, out)?;
    }

    let closed = coordinator.end_all();
    stats.closed_at_eof = closed.len();
    if !closed.is_empty() {
        debug!(count = closed.len(), "ended sessions left open at end of input");
    }
    stats.events += drain(&mut rx, out)?;
    Ok(stats)
}

fn apply(coordinator: &Coordinator, input: ReplayInput) -> Result<(), EngineError> {
    match input {
        ReplayInput::Start { session_id } => coordinator.start_session(session_id),
        ReplayInput::Segment {
            session_id,
            text,
            is_final,
        } => coordinator.on_segment(&session_id, &text, is_final).map(|_| ()),
        ReplayInput::Reset { session_id } => coordinator.reset_session(&session_id).map(|_| ()),
        ReplayInput::End { session_id } => coordinator.on_session_end(&session_id).map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use scamwatch_rules::RuleTable;
    use scamwatch_settings::EngineSettings;
    use serde_json::Value;

    fn coordinator() -> Coordinator {
        let table = RuleTable::builder()
            .rule("gift_card", 22, "gift card")
            .rule("urgency", 18, "urgent")
            .build()
            .unwrap();
        Coordinator::new(Arc::new(table), &EngineSettings::default())
    }

    fn parse_output(out: &[u8]) -> Vec<Value> {
        String::from_utf8_lossy(out)
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn replays_a_full_session() {
        let input = concat!(
            r#"{"type":"start","sessionId":"call-1"}"#, "\n",
            r#"{"type":"segment","sessionId":"call-1","text":"gift card","isFinal":false}"#, "\n",
            "\n",
            r#"{"type":"segment","sessionId":"call-1","text":"this is urgent","isFinal":true}"#, "\n",
            r#"{"type":"end","sessionId":"call-1"}"#, "\n",
        );
        let coord = coordinator();
        let mut out = Vec::new();
        let stats = run(&coord, input.as_bytes(), &mut out).await.unwrap();

        assert_eq!(stats.lines, 4);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.closed_at_eof, 0);

        let events = parse_output(&out);
        assert_eq!(events.len(), stats.events);
        let counts = coord.event_counts();
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.keywords_found, 2);
        let types: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
        assert_eq!(
            types,
            vec![
                "sessionStarted",
                "scoreChanged",
                "keywordsFound",
                "scoreChanged",
                "keywordsFound",
                "sessionEnded"
            ]
        );
        let last = events.last().unwrap();
        assert_eq!(last["finalScoreUpdate"]["rawScore"], 18);
    }

    #[tokio::test]
    async fn bad_lines_are_reported_and_skipped() {
        let input = concat!(
            "not json\n",
            r#"{"type":"segment","sessionId":"ghost","text":"urgent","isFinal":true}"#, "\n",
            r#"{"type":"start","sessionId":"call-1"}"#, "\n",
        );
        let coord = coordinator();
        let mut out = Vec::new();
        let stats = run(&coord, input.as_bytes(), &mut out).await.unwrap();

        assert_eq!(stats.errors, 2);
        let records = parse_output(&out);
        assert_eq!(records[0]["type"], "error");
        assert_eq!(records[0]["category"], "invalid_input");
        assert_eq!(records[0]["line"], 1);
        assert_eq!(records[1]["category"], "session_not_found");
    }

    #[tokio::test]
    async fn open_sessions_end_at_eof() {
        let input = concat!(
            r#"{"type":"start","sessionId":"call-1"}"#, "\n",
            r#"{"type":"segment","sessionId":"call-1","text":"urgent","isFinal":true}"#,
        );
        let coord = coordinator();
        let mut out = Vec::new();
        let stats = run(&coord, input.as_bytes(), &mut out).await.unwrap();

        assert_eq!(stats.closed_at_eof, 1);
        assert_eq!(coord.active_sessions(), 0);
        let records = parse_output(&out);
        assert_eq!(records.last().unwrap()["type"], "sessionEnded");
    }
}
