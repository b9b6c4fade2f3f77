//! Real-time monitoring stream
//!
//! Each WebSocket connection owns one ingestion loop for one subject. The
//! loop runs a cycle on a fixed interval and pushes the resulting event to
//! exactly this connection; there is no fan-out. Disconnect ends the loop
//! and releases its database session.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use chrono::Local;
use tracing::{error, info, warn};

use crate::ingest;
use crate::AppState;

/// GET /monitoring/ws/:subject_id - upgrade to the monitoring stream
pub async fn monitor_stream(
    ws: WebSocketUpgrade,
    Path(subject_id): Path<i64>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_monitor_loop(socket, state, subject_id))
}

async fn run_monitor_loop(mut socket: WebSocket, state: AppState, subject_id: i64) {
    info!("Monitoring stream opened for subject {}", subject_id);

    // Exclusive persistence session held for the lifetime of this loop
    let mut conn = match state.db.acquire().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("Could not acquire database session for stream: {}", e);
            return;
        }
    };

    // First tick fires immediately, then once per configured interval
    let mut ticker = tokio::time::interval(state.config.monitor_interval());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let event = ingest::run_cycle(
                    &mut conn,
                    state.sensors.as_ref(),
                    state.classifier.as_ref(),
                    subject_id,
                    Local::now().naive_local(),
                )
                .await;

                let payload = match serde_json::to_string(&event) {
                    Ok(payload) => payload,
                    Err(e) => {
                        warn!("Could not serialize monitor event: {}", e);
                        continue;
                    }
                };

                if socket.send(Message::Text(payload)).await.is_err() {
                    break;
                }
            }
            msg = socket.recv() => {
                match msg {
                    // Nothing inbound is meaningful on this stream
                    Some(Ok(_)) => continue,
                    // Closed or transport error
                    _ => break,
                }
            }
        }
    }

    info!("Monitoring stream closed for subject {}", subject_id);
}
