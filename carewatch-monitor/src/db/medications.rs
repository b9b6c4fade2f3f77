//! Medication intake store
//!
//! Status is monotonic: TO_TAKE may move to TAKEN (explicit action) or
//! MISSED (reconciliation sweep, see `crate::reconcile`); terminal states
//! never reverse.

use carewatch_common::models::{IntakeStatus, MedicationIntake};
use carewatch_common::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{Pool, Sqlite};

const COLUMNS: &str =
    "id, medication_name, dosage, intake_date, intake_time, status, dependent_id, created_at";

/// Schedule a new intake for a dependent. Status starts TO_TAKE.
pub async fn insert_intake(
    db: &Pool<Sqlite>,
    dependent_id: i64,
    medication_name: &str,
    dosage: Option<&str>,
    intake_date: NaiveDate,
    intake_time: &str,
    now: NaiveDateTime,
) -> Result<MedicationIntake> {
    let created_at = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let result = sqlx::query(
        "INSERT INTO medication_intakes \
         (medication_name, dosage, intake_date, intake_time, status, dependent_id, created_at) \
         VALUES (?, ?, ?, ?, 'TO_TAKE', ?, ?)",
    )
    .bind(medication_name)
    .bind(dosage)
    .bind(intake_date)
    .bind(intake_time)
    .bind(dependent_id)
    .bind(&created_at)
    .execute(db)
    .await?;

    Ok(MedicationIntake {
        id: result.last_insert_rowid(),
        medication_name: medication_name.to_string(),
        dosage: dosage.map(str::to_string),
        intake_date,
        intake_time: intake_time.to_string(),
        status: IntakeStatus::ToTake,
        dependent_id,
        created_at,
    })
}

/// Intakes for one dependent on one date, time ascending.
pub async fn list_for_date(
    db: &Pool<Sqlite>,
    dependent_id: i64,
    date: NaiveDate,
) -> Result<Vec<MedicationIntake>> {
    let records = sqlx::query_as::<_, MedicationIntake>(&format!(
        "SELECT {COLUMNS} FROM medication_intakes \
         WHERE dependent_id = ? AND intake_date = ? \
         ORDER BY intake_time ASC"
    ))
    .bind(dependent_id)
    .bind(date)
    .fetch_all(db)
    .await?;
    Ok(records)
}

/// Mark an intake as taken, on behalf of the owning dependent.
///
/// Valid only from TO_TAKE. Already-TAKEN rows are returned unchanged
/// (idempotent); MISSED rows are terminal and the attempt is a conflict.
/// Rows belonging to another dependent are reported as not found.
pub async fn mark_taken(
    db: &Pool<Sqlite>,
    intake_id: i64,
    dependent_id: i64,
) -> Result<MedicationIntake> {
    let intake = sqlx::query_as::<_, MedicationIntake>(&format!(
        "SELECT {COLUMNS} FROM medication_intakes WHERE id = ? AND dependent_id = ?"
    ))
    .bind(intake_id)
    .bind(dependent_id)
    .fetch_optional(db)
    .await?;

    let Some(intake) = intake else {
        return Err(Error::NotFound(format!(
            "medication intake {intake_id} not found for this dependent"
        )));
    };

    match intake.status {
        IntakeStatus::Taken => Ok(intake),
        IntakeStatus::Missed => Err(Error::Conflict(format!(
            "medication intake {intake_id} is already marked missed"
        ))),
        IntakeStatus::ToTake => {
            sqlx::query("UPDATE medication_intakes SET status = 'TAKEN' WHERE id = ?")
                .bind(intake_id)
                .execute(db)
                .await?;
            Ok(MedicationIntake {
                status: IntakeStatus::Taken,
                ..intake
            })
        }
    }
}
