//! Serde adapter storing `std::time::Duration` as whole milliseconds.
//!
//! Use with `#[serde(with = "crate::duration_ms")]`.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    serializer.serialize_u64(ms)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let ms = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(ms))
}
