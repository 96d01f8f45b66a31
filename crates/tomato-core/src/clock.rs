//! Injected wall-clock source.
//!
//! The session manager never reads ambient time; timestamps and the
//! statistics date come from a [`Clock`].

use std::sync::Mutex;

use chrono::{DateTime, Local, NaiveDate, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// The calendar date statistics are filed under.
    fn today(&self) -> NaiveDate;
}

/// Real time; days roll over at local midnight.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Hand-advanced clock for tests and replay tools. `today()` is the UTC date of
/// the current instant.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_advances_across_midnight() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 2, 23, 50, 0).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        clock.advance(chrono::Duration::minutes(20));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
    }
}
