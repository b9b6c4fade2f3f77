//! Health-status check-in endpoints
//!
//! Dependents record how they feel; caregivers read the history for their
//! primary dependent by date.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use carewatch_common::models::{HealthStatusLog, HealthStatusType};
use carewatch_common::{Error, Result};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::db;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCheckinRequest {
    pub dependent_id: i64,
    pub status_type: HealthStatusType,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub caregiver_id: i64,
    pub date: NaiveDate,
}

/// POST /health/status - record a dependent's check-in
pub async fn create_checkin(
    State(state): State<AppState>,
    Json(req): Json<CreateCheckinRequest>,
) -> Result<(StatusCode, Json<HealthStatusLog>)> {
    let log = db::health_status::insert_checkin(
        &state.db,
        req.dependent_id,
        req.status_type,
        Local::now().naive_local(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(log)))
}

/// GET /health/history?caregiver_id=&date= - check-ins of the caregiver's
/// primary dependent, newest first
pub async fn checkin_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HealthStatusLog>>> {
    let dependent_id = db::associations::primary_dependent_for(&state.db, query.caregiver_id)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "no dependent associated with caregiver {}",
                query.caregiver_id
            ))
        })?;

    let logs = db::health_status::list_for_date(&state.db, dependent_id, query.date).await?;
    Ok(Json(logs))
}
