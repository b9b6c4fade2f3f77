//! Database initialization
//!
//! Opens (creating if necessary) the SQLite database and brings the schema
//! up. Schema creation is idempotent so startup can run it unconditionally.

use crate::error::Result;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;
use tracing::info;

/// Connect to the database file, creating it (and its parent directory)
/// when missing.
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // mode=rwc: create the database file on first start
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePool::connect(&db_url).await?;

    info!("Connected to database at {}", db_path.display());
    Ok(pool)
}

/// Create all CareWatch tables and indexes if they do not exist yet.
pub async fn init_schema(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS activities (
            id TEXT PRIMARY KEY,
            time TEXT NOT NULL,
            date TEXT NOT NULL,
            category TEXT NOT NULL,
            source TEXT NOT NULL DEFAULT 'MANUAL',
            created_at TEXT NOT NULL,
            created_by INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_activities_owner_date \
         ON activities(created_by, date)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS anomalies (
            id TEXT PRIMARY KEY,
            activity_name TEXT NOT NULL,
            time TEXT NOT NULL,
            date TEXT NOT NULL,
            priority TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            subject_id INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_anomalies_subject_date \
         ON anomalies(subject_id, date)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS medication_intakes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            medication_name TEXT NOT NULL,
            dosage TEXT,
            intake_date TEXT NOT NULL,
            intake_time TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'TO_TAKE',
            dependent_id INTEGER NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_intakes_dependent_date \
         ON medication_intakes(dependent_id, intake_date)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS caregiver_dependent_associations (
            caregiver_id INTEGER NOT NULL,
            dependent_id INTEGER NOT NULL,
            assigned_at TEXT NOT NULL,
            PRIMARY KEY (caregiver_id, dependent_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS health_status_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            dependent_id INTEGER NOT NULL,
            status_type TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_health_logs_dependent \
         ON health_status_logs(dependent_id, created_at)",
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized");
    Ok(())
}
