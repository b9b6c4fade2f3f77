//! carewatch-monitor library - care-monitoring backend service
//!
//! Ties the sensor simulator, activity classifier, ingestion loop and
//! medication reconciliation together behind an axum HTTP/WebSocket API.

use axum::routing::{get, patch, post};
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use carewatch_common::config::MonitorConfig;

pub mod api;
pub mod classifier;
pub mod db;
pub mod ingest;
pub mod reconcile;
pub mod sensors;

use classifier::ActivityClassifier;
use sensors::SensorSource;

/// Application state shared across HTTP handlers and ingestion loops.
///
/// The sensor source and classifier are built once at startup and injected
/// by reference; loops never construct their own.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<MonitorConfig>,
    pub sensors: Arc<dyn SensorSource>,
    pub classifier: Arc<dyn ActivityClassifier>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        config: MonitorConfig,
        sensors: Arc<dyn SensorSource>,
        classifier: Arc<dyn ActivityClassifier>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            sensors,
            classifier,
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health::health_check))
        // Real-time monitoring stream (one ingestion loop per connection)
        .route("/monitoring/ws/:subject_id", get(api::monitoring::monitor_stream))
        // Activities
        .route("/activities", post(api::activities::create_manual_activity))
        .route("/activities/manual", get(api::activities::list_manual_activities))
        .route("/activities/predicted", get(api::activities::list_predicted_activities))
        // Anomalies
        .route("/anomalies/today", get(api::anomalies::today_anomalies))
        .route("/anomalies/:id/acknowledge", patch(api::anomalies::acknowledge_anomaly))
        // Medications
        .route("/medications", post(api::medications::create_intake))
        .route("/medications/history", get(api::medications::intake_history))
        .route("/medications/:id/take", patch(api::medications::mark_taken))
        .route("/dependents/:id/medications/today", get(api::medications::today_intakes))
        // Health-status check-ins
        .route("/health/status", post(api::health_status::create_checkin))
        .route("/health/history", get(api::health_status::checkin_history))
        // Associations
        .route("/associations", post(api::associations::create_association))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
