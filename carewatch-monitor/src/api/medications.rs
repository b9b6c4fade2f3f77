//! Medication endpoints
//!
//! Every read path runs the reconciliation sweep for the targeted dependent
//! before querying, so overdue TO_TAKE rows are already MISSED in the
//! result set. Caregiver-facing paths resolve the target dependent through
//! the primary association.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use carewatch_common::models::MedicationIntake;
use carewatch_common::{Error, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::db;
use crate::reconcile;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateIntakeRequest {
    pub caregiver_id: i64,
    pub medication_name: String,
    pub dosage: Option<String>,
    pub intake_date: NaiveDate,
    /// Scheduled time of day, "HH:MM"
    pub intake_time: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub caregiver_id: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct TakeQuery {
    pub dependent_id: i64,
}

async fn primary_dependent(state: &AppState, caregiver_id: i64) -> Result<i64> {
    db::associations::primary_dependent_for(&state.db, caregiver_id)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "no dependent associated with caregiver {caregiver_id}"
            ))
        })
}

/// POST /medications - schedule an intake for the caregiver's dependent
pub async fn create_intake(
    State(state): State<AppState>,
    Json(req): Json<CreateIntakeRequest>,
) -> Result<(StatusCode, Json<MedicationIntake>)> {
    if NaiveTime::parse_from_str(&req.intake_time, "%H:%M").is_err() {
        return Err(Error::InvalidInput(format!(
            "invalid time '{}', expected HH:MM",
            req.intake_time
        )));
    }
    if req.medication_name.trim().is_empty() {
        return Err(Error::InvalidInput("medication name is required".into()));
    }

    let dependent_id = primary_dependent(&state, req.caregiver_id).await?;
    let intake = db::medications::insert_intake(
        &state.db,
        dependent_id,
        &req.medication_name,
        req.dosage.as_deref(),
        req.intake_date,
        &req.intake_time,
        Local::now().naive_local(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(intake)))
}

/// GET /medications/history?caregiver_id=&date=
///
/// Sweeps the dependent's overdue intakes, then returns the requested
/// date's rows time ascending.
pub async fn intake_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MedicationIntake>>> {
    let dependent_id = primary_dependent(&state, query.caregiver_id).await?;

    reconcile::sweep_overdue(&state.db, dependent_id, Local::now().naive_local()).await?;

    let records = db::medications::list_for_date(&state.db, dependent_id, query.date).await?;
    Ok(Json(records))
}

/// GET /dependents/:id/medications/today
pub async fn today_intakes(
    State(state): State<AppState>,
    Path(dependent_id): Path<i64>,
) -> Result<Json<Vec<MedicationIntake>>> {
    let now = Local::now().naive_local();
    reconcile::sweep_overdue(&state.db, dependent_id, now).await?;

    let records = db::medications::list_for_date(&state.db, dependent_id, now.date()).await?;
    Ok(Json(records))
}

/// PATCH /medications/:id/take?dependent_id=
pub async fn mark_taken(
    State(state): State<AppState>,
    Path(intake_id): Path<i64>,
    Query(query): Query<TakeQuery>,
) -> Result<Json<MedicationIntake>> {
    let intake = db::medications::mark_taken(&state.db, intake_id, query.dependent_id).await?;
    Ok(Json(intake))
}
