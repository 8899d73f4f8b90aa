//! Streak Tracking
//!
//! Pure computation of the next streak value from the previous state and
//! the current time. A gap of more than 48 hours resets the counter;
//! exactly 48 hours still counts as consecutive.

use chrono::{DateTime, Duration, Utc};

/// Maximum gap in hours between hits that still extends a streak
const STREAK_WINDOW_HOURS: i64 = 48;

/// The persisted result of a streak hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak_count: i32,
    pub last_activity_at: DateTime<Utc>,
}

/// Compute the streak state after a hit at `now`
///
/// Pure given its inputs; every call increments or resets, so repeated
/// invocation with advancing `now` is deliberately not idempotent.
pub fn next(
    streak_count: i32,
    last_activity_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> StreakUpdate {
    let streak_count = match last_activity_at {
        None => 1,
        Some(last)
            if now.signed_duration_since(last) > Duration::hours(STREAK_WINDOW_HOURS) =>
        {
            1
        }
        Some(_) => streak_count + 1,
    };

    StreakUpdate {
        streak_count,
        last_activity_at: now,
    }
}
