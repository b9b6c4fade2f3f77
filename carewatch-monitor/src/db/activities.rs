//! Activity store
//!
//! Records are written once and never updated or deleted. All reads return
//! time ascending.

use carewatch_common::models::{ActivityRecord, ActivitySource};
use carewatch_common::Result;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

const INSERT: &str = "INSERT INTO activities \
     (id, time, date, category, source, created_at, created_by) \
     VALUES (?, ?, ?, ?, ?, ?, ?)";

const COLUMNS: &str = "id, time, date, category, source, created_at, created_by";

/// Insert a loop-produced activity record (source PREDICTED).
pub async fn insert_predicted<'e, E>(
    db: E,
    subject_id: i64,
    label: &str,
    now: NaiveDateTime,
) -> Result<ActivityRecord>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let record = ActivityRecord {
        id: Uuid::new_v4().to_string(),
        time: now.format("%H:%M").to_string(),
        date: now.date(),
        category: label.to_string(),
        source: ActivitySource::Predicted,
        created_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        created_by: subject_id,
    };
    insert(db, &record).await?;
    Ok(record)
}

/// Insert a subject-entered activity record (source MANUAL).
pub async fn insert_manual(
    db: &Pool<Sqlite>,
    subject_id: i64,
    time: &str,
    category: &str,
    now: NaiveDateTime,
) -> Result<ActivityRecord> {
    let record = ActivityRecord {
        id: Uuid::new_v4().to_string(),
        time: time.to_string(),
        date: now.date(),
        category: category.to_string(),
        source: ActivitySource::Manual,
        created_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        created_by: subject_id,
    };
    insert(db, &record).await?;
    Ok(record)
}

async fn insert<'e, E>(db: E, record: &ActivityRecord) -> Result<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(INSERT)
        .bind(&record.id)
        .bind(&record.time)
        .bind(record.date)
        .bind(&record.category)
        .bind(record.source)
        .bind(&record.created_at)
        .bind(record.created_by)
        .execute(db)
        .await?;
    Ok(())
}

/// Manual activities for one subject on one date, time ascending.
pub async fn list_manual(
    db: &Pool<Sqlite>,
    subject_id: i64,
    date: NaiveDate,
) -> Result<Vec<ActivityRecord>> {
    let records = sqlx::query_as::<_, ActivityRecord>(&format!(
        "SELECT {COLUMNS} FROM activities \
         WHERE created_by = ? AND source = 'MANUAL' AND date = ? \
         ORDER BY time ASC"
    ))
    .bind(subject_id)
    .bind(date)
    .fetch_all(db)
    .await?;
    Ok(records)
}

/// Predicted activities on one date, optionally restricted to one subject,
/// time ascending.
pub async fn list_predicted(
    db: &Pool<Sqlite>,
    date: NaiveDate,
    subject_id: Option<i64>,
) -> Result<Vec<ActivityRecord>> {
    let records = match subject_id {
        Some(subject) => {
            sqlx::query_as::<_, ActivityRecord>(&format!(
                "SELECT {COLUMNS} FROM activities \
                 WHERE source = 'PREDICTED' AND date = ? AND created_by = ? \
                 ORDER BY time ASC"
            ))
            .bind(date)
            .bind(subject)
            .fetch_all(db)
            .await?
        }
        None => {
            sqlx::query_as::<_, ActivityRecord>(&format!(
                "SELECT {COLUMNS} FROM activities \
                 WHERE source = 'PREDICTED' AND date = ? \
                 ORDER BY time ASC"
            ))
            .bind(date)
            .fetch_all(db)
            .await?
        }
    };
    Ok(records)
}
