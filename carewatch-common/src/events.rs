//! Monitoring stream event types
//!
//! One `MonitorEvent` is sent to the connected dashboard per ingestion
//! cycle, whether the cycle classified a normal activity or an anomaly.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::Category;

/// Priority field of the stream payload.
///
/// This is the wire-level High/Low flag the dashboard uses to style the
/// event; it is not the stored anomaly priority (High/Medium).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamPriority {
    High,
    Low,
}

/// JSON payload emitted once per ingestion cycle over the WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorEvent {
    /// "YYYY-MM-DD HH:MM:SS"
    pub timestamp: String,
    /// Predicted activity label
    pub activity: String,
    /// "normal" or "anormal"
    pub category: Category,
    pub priority: StreamPriority,
    /// Always "predicted" for loop-produced events
    pub source: String,
}

impl MonitorEvent {
    /// Build the cycle event for a predicted label.
    pub fn predicted(label: &str, category: Category, at: NaiveDateTime) -> Self {
        let priority = match category {
            Category::Abnormal => StreamPriority::High,
            Category::Normal => StreamPriority::Low,
        };
        MonitorEvent {
            timestamp: at.format("%Y-%m-%d %H:%M:%S").to_string(),
            activity: label.to_string(),
            category,
            priority,
            source: "predicted".to_string(),
        }
    }
}
