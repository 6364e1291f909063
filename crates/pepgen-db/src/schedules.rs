//! Database operations for the `generation_schedules` table.

use chrono::{DateTime, NaiveTime, Utc};
use pepgen_core::schedule::{Frequency, Schedule, TargetLength};
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, sqlx::FromRow)]
struct ScheduleRow {
    id: i64,
    active: bool,
    frequency: String,
    day_of_week: Option<i16>,
    time_of_day: NaiveTime,
    target_length: String,
    additional_context: Option<String>,
    last_run_at: Option<DateTime<Utc>>,
    next_run_at: Option<DateTime<Utc>>,
}

impl ScheduleRow {
    fn into_schedule(self) -> Result<Schedule, DbError> {
        let frequency =
            Frequency::parse(&self.frequency).ok_or_else(|| DbError::InvalidColumn {
                table: "generation_schedules",
                column: "frequency",
                value: self.frequency.clone(),
            })?;
        let target_length =
            TargetLength::parse(&self.target_length).ok_or_else(|| DbError::InvalidColumn {
                table: "generation_schedules",
                column: "target_length",
                value: self.target_length.clone(),
            })?;

        Ok(Schedule {
            id: self.id,
            active: self.active,
            frequency,
            day_of_week: self.day_of_week,
            time_of_day: self.time_of_day,
            target_length,
            additional_context: self.additional_context,
            last_run_at: self.last_run_at,
            next_run_at: self.next_run_at,
        })
    }
}

/// Load the generation schedule, if one has been configured.
///
/// The table holds at most one row per deployment; if several exist the most
/// recently created wins.
///
/// # Errors
///
/// Returns [`DbError::InvalidColumn`] if a stored enum value is unknown, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn load_schedule(pool: &PgPool) -> Result<Option<Schedule>, DbError> {
    let row = sqlx::query_as::<_, ScheduleRow>(
        "SELECT id, active, frequency, day_of_week, time_of_day, target_length, \
                additional_context, last_run_at, next_run_at \
         FROM generation_schedules ORDER BY id DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    row.map(ScheduleRow::into_schedule).transpose()
}

/// Record a completed run: set `last_run_at` and the computed `next_run_at`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no schedule row matches `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_schedule_run(
    pool: &PgPool,
    id: i64,
    last_run_at: DateTime<Utc>,
    next_run_at: DateTime<Utc>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE generation_schedules SET last_run_at = $2, next_run_at = $3, updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(last_run_at)
    .bind(next_run_at)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
