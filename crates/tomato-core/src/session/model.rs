use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Focus,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    /// Duration used by the typed factories when the caller supplies none.
    pub fn default_duration(&self) -> Duration {
        match self {
            SessionType::Focus => Duration::from_secs(25 * 60),
            SessionType::ShortBreak => Duration::from_secs(5 * 60),
            SessionType::LongBreak => Duration::from_secs(15 * 60),
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, SessionType::Focus)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Focus => "Focus",
            SessionType::ShortBreak => "Short Break",
            SessionType::LongBreak => "Long Break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NotStarted,
    Running,
    Paused,
    Completed,
    Cancelled,
}

impl SessionStatus {
    /// Running or paused: the session still owns the timer.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Running | SessionStatus::Paused)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Cancelled)
    }
}

/// One configured work or break interval.
///
/// Fields are only mutated by the session manager; everything else reads
/// through the accessors. `time_remaining` only ever moves down, except when
/// a session is restored or restarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    session_type: SessionType,
    status: SessionStatus,
    #[serde(rename = "duration_ms", with = "crate::duration_ms")]
    duration: Duration,
    #[serde(rename = "time_remaining_ms", with = "crate::duration_ms")]
    time_remaining: Duration,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    goal: Option<String>,
}

impl Session {
    /// Focus session with the default 25-minute duration.
    pub fn focus(goal: Option<String>) -> Self {
        Self::of_type(SessionType::Focus, SessionType::Focus.default_duration(), goal)
    }

    pub fn focus_for(duration: Duration, goal: Option<String>) -> Self {
        Self::of_type(SessionType::Focus, duration, goal)
    }

    /// Short break with the default 5-minute duration.
    pub fn short_break() -> Self {
        Self::short_break_for(SessionType::ShortBreak.default_duration())
    }

    pub fn short_break_for(duration: Duration) -> Self {
        Self::of_type(SessionType::ShortBreak, duration, None)
    }

    /// Long break with the default 15-minute duration.
    pub fn long_break() -> Self {
        Self::long_break_for(SessionType::LongBreak.default_duration())
    }

    pub fn long_break_for(duration: Duration) -> Self {
        Self::of_type(SessionType::LongBreak, duration, None)
    }

    /// Goals are only kept on focus sessions.
    pub(crate) fn of_type(session_type: SessionType, duration: Duration, goal: Option<String>) -> Self {
        let goal = match session_type {
            SessionType::Focus => goal,
            _ => None,
        };
        Self {
            session_type,
            status: SessionStatus::NotStarted,
            duration,
            time_remaining: duration,
            started_at: None,
            completed_at: None,
            goal,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn time_remaining(&self) -> Duration {
        self.time_remaining
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn goal(&self) -> Option<&str> {
        self.goal.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.time_remaining.is_zero()
    }

    pub fn elapsed(&self) -> Duration {
        self.duration.saturating_sub(self.time_remaining)
    }

    /// 0.0 .. 1.0 progress through the session.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        self.elapsed().as_secs_f64() / self.duration.as_secs_f64()
    }

    // ── Mutation (manager and restore only) ──────────────────────────

    /// Durations are unsigned, so a negative remainder is already clamped
    /// to zero by the caller's `saturating_sub`.
    pub(crate) fn set_time_remaining(&mut self, remaining: Duration) {
        self.time_remaining = remaining;
    }

    pub(crate) fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
    }

    pub(crate) fn set_started_at(&mut self, at: Option<DateTime<Utc>>) {
        self.started_at = at;
    }

    pub(crate) fn set_completed_at(&mut self, at: Option<DateTime<Utc>>) {
        self.completed_at = at;
    }

    /// Re-arm in place: same type, duration and goal, full time remaining.
    pub(crate) fn rearm(&mut self) {
        self.time_remaining = self.duration;
        self.completed_at = None;
        self.status = SessionStatus::Running;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factories_use_default_durations() {
        assert_eq!(Session::focus(None).duration(), Duration::from_secs(1500));
        assert_eq!(Session::short_break().duration(), Duration::from_secs(300));
        assert_eq!(Session::long_break().duration(), Duration::from_secs(900));
    }

    #[test]
    fn new_session_is_not_started_with_full_remaining() {
        let session = Session::focus_for(Duration::from_secs(600), Some("write tests".into()));
        assert_eq!(session.status(), SessionStatus::NotStarted);
        assert_eq!(session.time_remaining(), Duration::from_secs(600));
        assert_eq!(session.goal(), Some("write tests"));
        assert!(session.started_at().is_none());
        assert!(!session.is_complete());
    }

    #[test]
    fn breaks_never_carry_a_goal() {
        let session = Session::of_type(SessionType::LongBreak, Duration::from_secs(60), Some("x".into()));
        assert_eq!(session.goal(), None);
    }

    #[test]
    fn zero_remaining_is_complete() {
        let mut session = Session::short_break();
        session.set_time_remaining(Duration::ZERO);
        assert!(session.is_complete());
        assert_eq!(session.elapsed(), session.duration());
        assert!((session.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rearm_restores_full_duration() {
        let mut session = Session::focus(Some("goal".into()));
        session.set_status(SessionStatus::Paused);
        session.set_time_remaining(Duration::from_secs(10));
        session.rearm();
        assert_eq!(session.status(), SessionStatus::Running);
        assert_eq!(session.time_remaining(), session.duration());
        assert_eq!(session.goal(), Some("goal"));
    }

    #[test]
    fn status_groups() {
        assert!(SessionStatus::Running.is_active());
        assert!(SessionStatus::Paused.is_active());
        assert!(!SessionStatus::NotStarted.is_active());
        assert!(SessionStatus::Cancelled.is_finished());
        assert!(SessionType::ShortBreak.is_break());
        assert!(!SessionType::Focus.is_break());
    }
}
