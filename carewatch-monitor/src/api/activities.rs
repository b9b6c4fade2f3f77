//! Activity endpoints
//!
//! Manual records are entered by the subject; predicted records come from
//! the ingestion loop and are read-only here. Both read paths filter by
//! date and return time ascending.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use carewatch_common::models::{ActivityRecord, NORMAL_ACTIVITIES};
use carewatch_common::{Error, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::db;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateActivityRequest {
    pub subject_id: i64,
    /// Time of day, "HH:MM"
    pub time: String,
    /// One of the normal activity labels
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct ManualQuery {
    pub subject_id: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct PredictedQuery {
    pub date: NaiveDate,
    pub subject_id: Option<i64>,
}

/// POST /activities - record a manual activity for today
pub async fn create_manual_activity(
    State(state): State<AppState>,
    Json(req): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<ActivityRecord>)> {
    if NaiveTime::parse_from_str(&req.time, "%H:%M").is_err() {
        return Err(Error::InvalidInput(format!(
            "invalid time '{}', expected HH:MM",
            req.time
        )));
    }
    if !NORMAL_ACTIVITIES.contains(&req.category.as_str()) {
        return Err(Error::InvalidInput(format!(
            "unknown activity category '{}'",
            req.category
        )));
    }

    let record = db::activities::insert_manual(
        &state.db,
        req.subject_id,
        &req.time,
        &req.category,
        Local::now().naive_local(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /activities/manual?subject_id=&date=
pub async fn list_manual_activities(
    State(state): State<AppState>,
    Query(query): Query<ManualQuery>,
) -> Result<Json<Vec<ActivityRecord>>> {
    let records = db::activities::list_manual(&state.db, query.subject_id, query.date).await?;
    Ok(Json(records))
}

/// GET /activities/predicted?date= - optionally scoped to one subject
pub async fn list_predicted_activities(
    State(state): State<AppState>,
    Query(query): Query<PredictedQuery>,
) -> Result<Json<Vec<ActivityRecord>>> {
    let records =
        db::activities::list_predicted(&state.db, query.date, query.subject_id).await?;
    Ok(Json(records))
}
