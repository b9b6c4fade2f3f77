//! Health-status check-in store

use carewatch_common::models::{HealthStatusLog, HealthStatusType};
use carewatch_common::Result;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{Pool, Sqlite};

/// Record a dependent's self-reported status.
pub async fn insert_checkin(
    db: &Pool<Sqlite>,
    dependent_id: i64,
    status_type: HealthStatusType,
    now: NaiveDateTime,
) -> Result<HealthStatusLog> {
    let created_at = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let result = sqlx::query(
        "INSERT INTO health_status_logs (dependent_id, status_type, created_at) \
         VALUES (?, ?, ?)",
    )
    .bind(dependent_id)
    .bind(status_type)
    .bind(&created_at)
    .execute(db)
    .await?;

    Ok(HealthStatusLog {
        id: result.last_insert_rowid(),
        dependent_id,
        status_type,
        created_at,
    })
}

/// Check-ins for one dependent on one date, newest first.
pub async fn list_for_date(
    db: &Pool<Sqlite>,
    dependent_id: i64,
    date: NaiveDate,
) -> Result<Vec<HealthStatusLog>> {
    let logs = sqlx::query_as::<_, HealthStatusLog>(
        "SELECT id, dependent_id, status_type, created_at FROM health_status_logs \
         WHERE dependent_id = ? AND date(created_at) = ? \
         ORDER BY created_at DESC",
    )
    .bind(dependent_id)
    .bind(date)
    .fetch_all(db)
    .await?;
    Ok(logs)
}
