//! Anomaly endpoints

use axum::extract::{Path, Query, State};
use axum::Json;
use carewatch_common::models::{AnomalyRecord, AnomalyStatus};
use carewatch_common::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::db;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TodayQuery {
    pub subject_id: i64,
}

#[derive(Debug, Serialize)]
pub struct AcknowledgeResponse {
    pub id: String,
    pub status: AnomalyStatus,
}

/// GET /anomalies/today?subject_id= - today's alerts, newest first
pub async fn today_anomalies(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> Result<Json<Vec<AnomalyRecord>>> {
    let today = Local::now().date_naive();
    let records = db::anomalies::list_between(&state.db, query.subject_id, today, today).await?;
    Ok(Json(records))
}

/// PATCH /anomalies/:id/acknowledge - transition active -> seen
pub async fn acknowledge_anomaly(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AcknowledgeResponse>> {
    let record = db::anomalies::acknowledge(&state.db, &id).await?;
    Ok(Json(AcknowledgeResponse {
        id: record.id,
        status: record.status,
    }))
}
