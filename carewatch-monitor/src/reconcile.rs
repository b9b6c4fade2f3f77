//! Medication reconciliation
//!
//! Scheduled intakes left in TO_TAKE past their scheduled moment are
//! corrected to MISSED. The sweep is an explicit operation with two
//! triggers: medication read paths call it before querying, and a
//! background task runs a whole-table sweep on a fixed tick so staleness
//! stays bounded even with no readers.
//!
//! The sweep is a single UPDATE whose predicate only matches TO_TAKE rows,
//! so concurrent sweeps over the same overdue set cannot corrupt anything;
//! the loser just updates zero rows.

use carewatch_common::Result;
use chrono::{Local, NaiveDateTime};
use sqlx::{Pool, Sqlite, SqlitePool};
use std::time::Duration;
use tracing::{debug, error, info};

/// Transition one dependent's overdue TO_TAKE intakes to MISSED.
///
/// Overdue means scheduled date on or before today and scheduled time
/// strictly before the current time of day. Returns the number of rows
/// transitioned.
pub async fn sweep_overdue(
    db: &Pool<Sqlite>,
    dependent_id: i64,
    now: NaiveDateTime,
) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE medication_intakes SET status = 'MISSED' \
         WHERE dependent_id = ? AND status = 'TO_TAKE' \
           AND intake_date <= ? AND intake_time < ?",
    )
    .bind(dependent_id)
    .bind(now.date())
    .bind(now.format("%H:%M").to_string())
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

/// Whole-table variant used by the background tick.
pub async fn sweep_all_overdue(db: &Pool<Sqlite>, now: NaiveDateTime) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE medication_intakes SET status = 'MISSED' \
         WHERE status = 'TO_TAKE' AND intake_date <= ? AND intake_time < ?",
    )
    .bind(now.date())
    .bind(now.format("%H:%M").to_string())
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

/// Long-running background sweep task. Spawned once at startup.
pub async fn run_background_sweeps(db: SqlitePool, period: Duration) {
    info!("Background reconciliation sweep every {:?}", period);
    let mut ticker = tokio::time::interval(period);

    loop {
        ticker.tick().await;
        match sweep_all_overdue(&db, Local::now().naive_local()).await {
            Ok(0) => debug!("Reconciliation sweep: nothing overdue"),
            Ok(n) => info!("Reconciliation sweep marked {} intake(s) missed", n),
            Err(e) => error!("Reconciliation sweep failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::medications;
    use carewatch_common::models::IntakeStatus;
    use chrono::NaiveDate;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> Pool<Sqlite> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        carewatch_common::db::init_schema(&pool).await.unwrap();
        pool
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_overdue_intake_becomes_missed() {
        let pool = setup_test_db().await;
        let created = date(2024, 1, 1).and_hms_opt(7, 0, 0).unwrap();
        let intake =
            medications::insert_intake(&pool, 3, "Dose", None, date(2024, 1, 1), "08:00", created)
                .await
                .unwrap();

        // Queried the next morning at 09:00
        let now = date(2024, 1, 2).and_hms_opt(9, 0, 0).unwrap();
        let swept = sweep_overdue(&pool, 3, now).await.unwrap();
        assert_eq!(swept, 1);

        let listed = medications::list_for_date(&pool, 3, date(2024, 1, 1))
            .await
            .unwrap();
        assert_eq!(listed[0].id, intake.id);
        assert_eq!(listed[0].status, IntakeStatus::Missed);
    }

    #[tokio::test]
    async fn test_future_intake_is_untouched() {
        let pool = setup_test_db().await;
        let created = date(2024, 1, 1).and_hms_opt(7, 0, 0).unwrap();
        medications::insert_intake(&pool, 3, "Dose", None, date(2024, 1, 1), "20:00", created)
            .await
            .unwrap();

        let now = date(2024, 1, 1).and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(sweep_overdue(&pool, 3, now).await.unwrap(), 0);

        let listed = medications::list_for_date(&pool, 3, date(2024, 1, 1))
            .await
            .unwrap();
        assert_eq!(listed[0].status, IntakeStatus::ToTake);
    }

    #[tokio::test]
    async fn test_terminal_rows_are_untouched_and_sweep_is_idempotent() {
        let pool = setup_test_db().await;
        let created = date(2024, 1, 1).and_hms_opt(7, 0, 0).unwrap();
        let taken =
            medications::insert_intake(&pool, 3, "A", None, date(2024, 1, 1), "08:00", created)
                .await
                .unwrap();
        medications::mark_taken(&pool, taken.id, 3).await.unwrap();
        medications::insert_intake(&pool, 3, "B", None, date(2024, 1, 1), "10:00", created)
            .await
            .unwrap();

        let now = date(2024, 1, 2).and_hms_opt(11, 0, 0).unwrap();
        // First sweep catches only the pending row
        assert_eq!(sweep_overdue(&pool, 3, now).await.unwrap(), 1);
        // Re-running finds nothing left to transition
        assert_eq!(sweep_overdue(&pool, 3, now).await.unwrap(), 0);

        let listed = medications::list_for_date(&pool, 3, date(2024, 1, 1))
            .await
            .unwrap();
        assert_eq!(listed[0].status, IntakeStatus::Taken);
        assert_eq!(listed[1].status, IntakeStatus::Missed);
    }

    #[tokio::test]
    async fn test_sweep_is_dependent_scoped() {
        let pool = setup_test_db().await;
        let created = date(2024, 1, 1).and_hms_opt(7, 0, 0).unwrap();
        medications::insert_intake(&pool, 3, "A", None, date(2024, 1, 1), "08:00", created)
            .await
            .unwrap();
        medications::insert_intake(&pool, 4, "B", None, date(2024, 1, 1), "08:00", created)
            .await
            .unwrap();

        let now = date(2024, 1, 2).and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(sweep_overdue(&pool, 3, now).await.unwrap(), 1);

        let other = medications::list_for_date(&pool, 4, date(2024, 1, 1))
            .await
            .unwrap();
        assert_eq!(other[0].status, IntakeStatus::ToTake);
    }

    #[tokio::test]
    async fn test_whole_table_sweep_covers_all_dependents() {
        let pool = setup_test_db().await;
        let created = date(2024, 1, 1).and_hms_opt(7, 0, 0).unwrap();
        medications::insert_intake(&pool, 3, "A", None, date(2024, 1, 1), "08:00", created)
            .await
            .unwrap();
        medications::insert_intake(&pool, 4, "B", None, date(2024, 1, 1), "08:00", created)
            .await
            .unwrap();

        let now = date(2024, 1, 2).and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(sweep_all_overdue(&pool, now).await.unwrap(), 2);
    }
}
