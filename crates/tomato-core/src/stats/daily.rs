use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{SessionRecord, SupplementalActivity};

/// Per-day productivity counters and completed-session records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStatistics {
    pub date: NaiveDate,
    pub focus_sessions_completed: u32,
    #[serde(rename = "total_focus_time_ms", with = "crate::duration_ms")]
    pub total_focus_time: Duration,
    #[serde(rename = "total_break_time_ms", with = "crate::duration_ms")]
    pub total_break_time: Duration,
    pub cycles_completed: u32,
    #[serde(default)]
    pub session_records: Vec<SessionRecord>,
    #[serde(default)]
    pub supplemental_activities: Vec<SupplementalActivity>,
}

impl DailyStatistics {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            focus_sessions_completed: 0,
            total_focus_time: Duration::ZERO,
            total_break_time: Duration::ZERO,
            cycles_completed: 0,
            session_records: Vec::new(),
            supplemental_activities: Vec::new(),
        }
    }

    pub fn record_focus_session(&mut self, duration: Duration) {
        self.focus_sessions_completed += 1;
        self.total_focus_time += duration;
    }

    pub fn record_break_session(&mut self, duration: Duration) {
        self.total_break_time += duration;
    }

    pub fn record_cycle_completed(&mut self) {
        self.cycles_completed += 1;
    }

    /// Append a completed focus session record.
    pub fn add_session_record(&mut self, record: SessionRecord) {
        self.session_records.push(record);
    }

    pub fn add_supplemental_activity(&mut self, activity: SupplementalActivity) {
        self.supplemental_activities.push(activity);
    }

    pub fn last_session_record_mut(&mut self) -> Option<&mut SessionRecord> {
        self.session_records.last_mut()
    }

    /// Whether the day holds anything worth keeping in history.
    pub fn has_activity(&self) -> bool {
        self.focus_sessions_completed > 0
            || !self.total_focus_time.is_zero()
            || !self.total_break_time.is_zero()
            || !self.session_records.is_empty()
            || !self.supplemental_activities.is_empty()
    }
}

/// Insert `day` into `history`, replacing any entry for the same date, and
/// keep the list sorted most recent first. Days without activity are not
/// added, but still displace a same-date entry.
pub fn merge_into_history(history: &mut Vec<DailyStatistics>, day: &DailyStatistics) {
    history.retain(|entry| entry.date != day.date);
    if day.has_activity() {
        history.push(day.clone());
    }
    history.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn focus_sessions_accumulate() {
        let mut stats = DailyStatistics::new(date(2026, 3, 2));
        stats.record_focus_session(Duration::from_secs(1500));
        stats.record_focus_session(Duration::from_secs(600));
        assert_eq!(stats.focus_sessions_completed, 2);
        assert_eq!(stats.total_focus_time, Duration::from_secs(2100));
        assert_eq!(stats.total_break_time, Duration::ZERO);
    }

    #[test]
    fn breaks_only_add_time() {
        let mut stats = DailyStatistics::new(date(2026, 3, 2));
        stats.record_break_session(Duration::from_secs(300));
        assert_eq!(stats.focus_sessions_completed, 0);
        assert_eq!(stats.total_break_time, Duration::from_secs(300));
        stats.record_cycle_completed();
        assert_eq!(stats.cycles_completed, 1);
    }

    #[test]
    fn last_record_is_the_most_recent_append() {
        let mut stats = DailyStatistics::new(date(2026, 3, 2));
        assert!(stats.last_session_record_mut().is_none());
        let now = Utc::now();
        stats.add_session_record(SessionRecord::new(Some("a".into()), Duration::from_secs(1), now, now));
        stats.add_session_record(SessionRecord::new(Some("b".into()), Duration::from_secs(1), now, now));
        assert_eq!(stats.last_session_record_mut().unwrap().goal.as_deref(), Some("b"));
    }

    #[test]
    fn empty_day_has_no_activity() {
        let mut stats = DailyStatistics::new(date(2026, 3, 2));
        assert!(!stats.has_activity());
        stats.add_supplemental_activity(SupplementalActivity::new("standup"));
        assert!(stats.has_activity());
    }

    #[test]
    fn merge_replaces_same_date_and_sorts_descending() {
        let mut old = DailyStatistics::new(date(2026, 3, 1));
        old.record_focus_session(Duration::from_secs(60));
        let mut stale_today = DailyStatistics::new(date(2026, 3, 2));
        stale_today.record_focus_session(Duration::from_secs(60));
        let mut history = vec![old, stale_today];

        let mut today = DailyStatistics::new(date(2026, 3, 2));
        today.record_focus_session(Duration::from_secs(60));
        today.record_focus_session(Duration::from_secs(60));
        merge_into_history(&mut history, &today);

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, date(2026, 3, 2));
        assert_eq!(history[0].focus_sessions_completed, 2);
        assert_eq!(history[1].date, date(2026, 3, 1));
    }

    #[test]
    fn merge_skips_idle_day() {
        let mut history = Vec::new();
        merge_into_history(&mut history, &DailyStatistics::new(date(2026, 3, 2)));
        assert!(history.is_empty());
    }
}
