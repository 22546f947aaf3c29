//! JSON-lines output of engine events.

use std::io::Write;

use anyhow::Result;
use scamwatch_engine::EngineEvent;
use serde::Serialize;
use tokio::sync::broadcast::{Receiver, error::TryRecvError};
use tracing::warn;

/// Write one value as a JSON line.
pub fn write_line<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Write every event currently buffered in `rx`. Returns how many were written.
pub fn drain<W: Write>(rx: &mut Receiver<EngineEvent>, out: &mut W) -> Result<usize> {
    let mut written = 0;
    loop {
        match rx.try_recv() {
            Ok(event) => {
                write_line(out, &event)?;
                written += 1;
            }
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "event output lagged, events dropped");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    out.flush()?;
    Ok(written)
}
