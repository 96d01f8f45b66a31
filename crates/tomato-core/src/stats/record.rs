use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest and highest accepted session rating.
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// A completed focus session with its goal and outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub goal: Option<String>,
    /// Filled in after completion via the results prompt.
    #[serde(default)]
    pub results: Option<String>,
    /// Optional 1-5 rating.
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(rename = "duration_ms", with = "crate::duration_ms")]
    pub duration: Duration,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(
        goal: Option<String>,
        duration: Duration,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            goal,
            results: None,
            rating: None,
            duration,
            started_at,
            completed_at,
        }
    }

    /// Record the outcome. Ratings outside 1-5 are dropped.
    pub fn set_outcome(&mut self, results: Option<String>, rating: Option<u8>) {
        self.results = results;
        self.rating = rating.filter(|r| RATING_RANGE.contains(r));
    }
}

/// A non-pomodoro activity noted for the day (meetings, reviews, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplementalActivity {
    pub description: String,
}

impl SupplementalActivity {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}
