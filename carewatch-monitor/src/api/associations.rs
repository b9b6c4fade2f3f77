//! Caregiver-dependent association endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use carewatch_common::models::Association;
use carewatch_common::Result;
use chrono::Local;
use serde::Deserialize;

use crate::db;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAssociationRequest {
    pub caregiver_id: i64,
    pub dependent_id: i64,
}

/// POST /associations - link a caregiver to a dependent
pub async fn create_association(
    State(state): State<AppState>,
    Json(req): Json<CreateAssociationRequest>,
) -> Result<(StatusCode, Json<Association>)> {
    let association = db::associations::create(
        &state.db,
        req.caregiver_id,
        req.dependent_id,
        Local::now().naive_local(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(association)))
}
