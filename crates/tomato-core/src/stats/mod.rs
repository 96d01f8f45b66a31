//! Day-scoped statistics.
//!
//! One [`DailyStatistics`] is "today's" aggregator; past days live in a
//! history list holding at most one entry per date.

mod daily;
mod record;

pub use daily::{merge_into_history, DailyStatistics};
pub use record::{SessionRecord, SupplementalActivity, RATING_RANGE};
