//! Millisecond arithmetic shared by the timing engine.
//!
//! All clients must converge on identical tick boundaries, so every duration
//! that feeds cumulative pause accounting is rounded to the nearest whole
//! second before it is stored.

use chrono::{DateTime, Utc};

/// Rounds a millisecond value to the nearest whole second.
///
/// Uses euclidean division so negative values (pre-show countdown times)
/// round consistently toward the nearest second rather than toward zero.
#[must_use]
pub fn round_ms_to_nearest_second(ms: i64) -> i64 {
    (ms + 500).div_euclid(1000) * 1000
}

/// Rounds a timestamp to the nearest whole second.
///
/// Falls back to the input unchanged if the rounded value is not
/// representable, which cannot happen for any realistic show date.
#[must_use]
pub fn round_datetime_to_second(ts: DateTime<Utc>) -> DateTime<Utc> {
    let rounded_ms = round_ms_to_nearest_second(ts.timestamp_millis());
    DateTime::from_timestamp_millis(rounded_ms).unwrap_or(ts)
}

/// Whole milliseconds elapsed from `earlier` to `later`, clamped at zero.
///
/// Pause durations are measured between two samples of the same wall clock;
/// a negative reading means the clock was adjusted backwards and is treated
/// as an empty interval.
#[must_use]
pub fn millis_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later - earlier).num_milliseconds().max(0)
}
