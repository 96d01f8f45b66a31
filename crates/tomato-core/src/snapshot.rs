//! Serializable projection of the session manager's state.
//!
//! A [`Snapshot`] is captured on every status transition and handed to a
//! [`SnapshotStore`](crate::storage::SnapshotStore); it is read back once at
//! startup. The persisted shape is plain JSON:
//!
//! ```text
//! { current_session?, cycle: { completed_focus_sessions },
//!   today_statistics?, statistics_history: [...], last_saved_at }
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{PomodoroCycle, Session, SessionStatus, SessionType};
use crate::stats::{merge_into_history, DailyStatistics};

/// Persisted form of a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub session_type: SessionType,
    pub status: SessionStatus,
    #[serde(rename = "duration_ms", with = "crate::duration_ms")]
    pub duration: Duration,
    #[serde(rename = "time_remaining_ms", with = "crate::duration_ms")]
    pub time_remaining: Duration,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub goal: Option<String>,
}

impl From<&Session> for SessionState {
    fn from(session: &Session) -> Self {
        Self {
            session_type: session.session_type(),
            status: session.status(),
            duration: session.duration(),
            time_remaining: session.time_remaining(),
            started_at: session.started_at(),
            completed_at: session.completed_at(),
            goal: session.goal().map(str::to_owned),
        }
    }
}

/// Persisted form of a [`PomodoroCycle`]. Signed so a hand-edited negative
/// count still parses and gets clamped on restore.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleState {
    pub completed_focus_sessions: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub current_session: Option<SessionState>,
    #[serde(default)]
    pub cycle: CycleState,
    #[serde(default)]
    pub today_statistics: Option<DailyStatistics>,
    /// One entry per date, most recent first. Includes today when today
    /// has any activity.
    #[serde(default)]
    pub statistics_history: Vec<DailyStatistics>,
    pub last_saved_at: DateTime<Utc>,
}

impl Snapshot {
    /// Build an immutable projection, merging `today` into the history.
    pub fn capture(
        current_session: Option<&Session>,
        cycle: &PomodoroCycle,
        today: Option<&DailyStatistics>,
        history: &[DailyStatistics],
        saved_at: DateTime<Utc>,
    ) -> Self {
        let mut statistics_history = history.to_vec();
        match today {
            Some(day) => merge_into_history(&mut statistics_history, day),
            None => statistics_history.sort_by(|a, b| b.date.cmp(&a.date)),
        }

        Self {
            current_session: current_session.map(SessionState::from),
            cycle: CycleState {
                completed_focus_sessions: i64::from(cycle.completed_focus_sessions()),
            },
            today_statistics: today.cloned(),
            statistics_history,
            last_saved_at: saved_at,
        }
    }

    /// Rebuild the saved session through the typed factory.
    pub fn restore_session(&self) -> Option<Session> {
        let state = self.current_session.as_ref()?;
        let mut session = Session::of_type(state.session_type, state.duration, state.goal.clone());
        session.set_status(state.status);
        session.set_time_remaining(state.time_remaining.min(state.duration));
        session.set_started_at(state.started_at);
        session.set_completed_at(state.completed_at);
        Some(session)
    }

    pub fn restore_cycle(&self) -> PomodoroCycle {
        let mut cycle = PomodoroCycle::new();
        cycle.set_completed_focus_sessions(self.cycle.completed_focus_sessions);
        cycle
    }

    pub fn restore_statistics(&self) -> Option<DailyStatistics> {
        self.today_statistics.clone()
    }

    /// History sorted most recent first, keeping the first entry per date.
    pub fn restore_history(&self) -> Vec<DailyStatistics> {
        let mut history = self.statistics_history.clone();
        history.sort_by(|a, b| b.date.cmp(&a.date));
        history.dedup_by(|later, earlier| later.date == earlier.date);
        history
    }
}
