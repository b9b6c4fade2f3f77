//! Anomaly store
//!
//! Rows are created by the ingestion loop and mutated exactly once, by the
//! acknowledge endpoint. Reads return newest first.

use carewatch_common::models::{anomaly_priority, AnomalyRecord, AnomalyStatus};
use carewatch_common::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

const COLUMNS: &str = "id, activity_name, time, date, priority, status, subject_id";

/// Insert an anomaly detected by an ingestion cycle. Priority derives from
/// the label (fall indicators are High), status starts active.
pub async fn insert_detected<'e, E>(
    db: E,
    subject_id: i64,
    label: &str,
    now: NaiveDateTime,
) -> Result<AnomalyRecord>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let record = AnomalyRecord {
        id: Uuid::new_v4().to_string(),
        activity_name: label.to_string(),
        time: now.format("%H:%M").to_string(),
        date: now.date(),
        priority: anomaly_priority(label),
        status: AnomalyStatus::Active,
        subject_id,
    };

    sqlx::query(
        "INSERT INTO anomalies (id, activity_name, time, date, priority, status, subject_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.id)
    .bind(&record.activity_name)
    .bind(&record.time)
    .bind(record.date)
    .bind(record.priority)
    .bind(record.status)
    .bind(record.subject_id)
    .execute(db)
    .await?;

    Ok(record)
}

/// Anomalies for one subject in an inclusive date range, newest first.
pub async fn list_between(
    db: &Pool<Sqlite>,
    subject_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<AnomalyRecord>> {
    let records = sqlx::query_as::<_, AnomalyRecord>(&format!(
        "SELECT {COLUMNS} FROM anomalies \
         WHERE subject_id = ? AND date >= ? AND date <= ? \
         ORDER BY date DESC, time DESC"
    ))
    .bind(subject_id)
    .bind(from)
    .bind(to)
    .fetch_all(db)
    .await?;
    Ok(records)
}

/// Transition one anomaly active -> seen. Re-acknowledging a seen anomaly
/// is a no-op.
pub async fn acknowledge(db: &Pool<Sqlite>, id: &str) -> Result<AnomalyRecord> {
    let updated = sqlx::query("UPDATE anomalies SET status = 'seen' WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    if updated.rows_affected() == 0 {
        return Err(Error::NotFound(format!("anomaly {id} does not exist")));
    }

    let record = sqlx::query_as::<_, AnomalyRecord>(&format!(
        "SELECT {COLUMNS} FROM anomalies WHERE id = ?"
    ))
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carewatch_common::models::AnomalyPriority;
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

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_fall_anomaly_is_high_priority_and_active() {
        let pool = setup_test_db().await;

        let record = insert_detected(&pool, 7, "Chute", at(10, 42)).await.unwrap();
        assert_eq!(record.priority, AnomalyPriority::High);
        assert_eq!(record.status, AnomalyStatus::Active);

        let listed = list_between(&pool, 7, record.date, record.date)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].priority, AnomalyPriority::High);
    }

    #[tokio::test]
    async fn test_non_fall_anomaly_is_medium_priority() {
        let pool = setup_test_db().await;
        let record = insert_detected(&pool, 7, "Oubli_repas", at(12, 0))
            .await
            .unwrap();
        assert_eq!(record.priority, AnomalyPriority::Medium);
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let pool = setup_test_db().await;
        insert_detected(&pool, 7, "Oubli_repas", at(12, 0)).await.unwrap();
        insert_detected(&pool, 7, "Chute", at(16, 30)).await.unwrap();

        let listed = list_between(&pool, 7, at(0, 0).date(), at(0, 0).date())
            .await
            .unwrap();
        assert_eq!(listed[0].activity_name, "Chute");
        assert_eq!(listed[1].activity_name, "Oubli_repas");
    }

    #[tokio::test]
    async fn test_acknowledge_transitions_to_seen() {
        let pool = setup_test_db().await;
        let record = insert_detected(&pool, 7, "Chute", at(10, 0)).await.unwrap();

        let seen = acknowledge(&pool, &record.id).await.unwrap();
        assert_eq!(seen.status, AnomalyStatus::Seen);

        // Idempotent on repeat
        let again = acknowledge(&pool, &record.id).await.unwrap();
        assert_eq!(again.status, AnomalyStatus::Seen);
    }

    #[tokio::test]
    async fn test_acknowledge_unknown_id_is_not_found() {
        let pool = setup_test_db().await;
        let result = acknowledge(&pool, "no-such-id").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
