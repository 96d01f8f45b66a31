use std::time::Duration;

use serde::Serialize;

use crate::session::{Session, SessionStatus};

/// Notifications published by the session manager.
///
/// Observers (CLI display, tray icons, presence integrations) receive these
/// in order on their own channel. Ticks for a session always arrive before
/// that session's `Completed` state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    StateChanged {
        session: Session,
        previous: SessionStatus,
        current: SessionStatus,
    },
    Tick {
        #[serde(rename = "elapsed_ms", with = "crate::duration_ms")]
        elapsed: Duration,
        #[serde(rename = "remaining_ms", with = "crate::duration_ms")]
        remaining: Duration,
    },
}

impl SessionEvent {
    /// The new status, for state changes.
    pub fn new_status(&self) -> Option<SessionStatus> {
        match self {
            SessionEvent::StateChanged { current, .. } => Some(*current),
            SessionEvent::Tick { .. } => None,
        }
    }
}
