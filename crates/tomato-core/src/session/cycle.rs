use serde::{Deserialize, Serialize};

use super::SessionType;

/// Number of focus sessions in a complete cycle before a long break.
pub const FOCUS_SESSIONS_PER_CYCLE: u32 = 4;

/// Progress through one cycle of focus sessions.
///
/// `completed_focus_sessions` stays within `0..=FOCUS_SESSIONS_PER_CYCLE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroCycle {
    completed_focus_sessions: u32,
}

impl PomodoroCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed_focus_sessions(&self) -> u32 {
        self.completed_focus_sessions
    }

    pub fn is_cycle_complete(&self) -> bool {
        self.completed_focus_sessions >= FOCUS_SESSIONS_PER_CYCLE
    }

    /// The break the cycle suggests next. Informative only: callers pick
    /// the break type explicitly.
    pub fn next_break_type(&self) -> SessionType {
        if self.is_cycle_complete() {
            SessionType::LongBreak
        } else {
            SessionType::ShortBreak
        }
    }

    /// Count one completed focus session.
    ///
    /// Returns `true` when this increment is the one that completed the
    /// cycle. Further focus sessions before a long break saturate at the
    /// cycle size and return `false`.
    pub fn increment_focus_count(&mut self) -> bool {
        if self.is_cycle_complete() {
            return false;
        }
        self.completed_focus_sessions += 1;
        self.is_cycle_complete()
    }

    pub fn reset(&mut self) {
        self.completed_focus_sessions = 0;
    }

    /// Used when restoring from a snapshot; out-of-range counts are clamped.
    pub fn set_completed_focus_sessions(&mut self, count: i64) {
        self.completed_focus_sessions = count.clamp(0, i64::from(FOCUS_SESSIONS_PER_CYCLE)) as u32;
    }
}
