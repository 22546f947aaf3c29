//! Engine error types.

use scamwatch_core::SessionId;
use thiserror::Error;

/// Session lifecycle misuse. Scoring itself never fails.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No active session with this id.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// `start_session` called for an id that is already active.
    #[error("session already active: {0}")]
    SessionAlreadyActive(SessionId),

    /// The active-session cap has been reached.
    #[error("too many active sessions (max {max})")]
    TooManySessions {
        /// Configured cap.
        max: usize,
    },
}

impl EngineError {
    /// Error category string for logs and event payloads.
    pub fn category(&self) -> &str {
        match self {
            Self::SessionNotFound(_) => "session_not_found",
            Self::SessionAlreadyActive(_) => "session_already_active",
            Self::TooManySessions { .. } => "too_many_sessions",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = EngineError::SessionNotFound(SessionId::from("call-1"));
        assert_eq!(err.to_string(), "session not found: call-1");
        let err = EngineError::TooManySessions { max: 4 };
        assert_eq!(err.to_string(), "too many active sessions (max 4)");
    }

    #[test]
    fn categories() {
        assert_eq!(
            EngineError::SessionNotFound("s".into()).category(),
            "session_not_found"
        );
        assert_eq!(
            EngineError::SessionAlreadyActive("s".into()).category(),
            "session_already_active"
        );
        assert_eq!(
            EngineError::TooManySessions { max: 1 }.category(),
            "too_many_sessions"
        );
    }
}
