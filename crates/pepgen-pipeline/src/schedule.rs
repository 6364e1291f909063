//! Schedule controller: due-date checks and post-run advancement.
//!
//! Pure functions over the [`Schedule`] record. `advance` is only applied
//! after a successful article insert — a failed run leaves the schedule
//! untouched so the next tick retries at the same due time.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pepgen_core::schedule::{Frequency, Schedule};

/// Timestamps written back after a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTimestamps {
    pub last_run_at: DateTime<Utc>,
    pub next_run_at: DateTime<Utc>,
}

/// Decide whether a run should happen now.
///
/// A forced run is always due, even when no schedule exists. Otherwise a
/// schedule must exist, be active, and either have no `next_run_at` yet
/// (first run after activation) or have one that is not in the future.
#[must_use]
pub fn is_due(schedule: Option<&Schedule>, now: DateTime<Utc>, force: bool) -> bool {
    if force {
        return true;
    }
    let Some(schedule) = schedule else {
        return false;
    };
    if !schedule.active {
        return false;
    }
    match schedule.next_run_at {
        None => true,
        Some(next_run_at) => now >= next_run_at,
    }
}

/// Compute the next occurrence after a run that completed at `now`.
///
/// Daily advances one day, weekly seven; in both cases the time-of-day
/// fields are overwritten from the schedule's `time_of_day`. Weekly runs
/// repeat seven days from the last run — the stored `day_of_week` is never
/// re-aligned to, so the first run pins the weekday going forward.
#[must_use]
pub fn advance(schedule: &Schedule, now: DateTime<Utc>) -> RunTimestamps {
    let days = match schedule.frequency {
        Frequency::Daily => 1,
        Frequency::Weekly => 7,
    };
    let next_date = (now + Duration::days(days)).date_naive();
    let next_run_at = Utc.from_utc_datetime(&next_date.and_time(schedule.time_of_day));

    RunTimestamps {
        last_run_at: now,
        next_run_at,
    }
}
