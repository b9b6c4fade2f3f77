//! HTTP API handlers for the monitor service

pub mod activities;
pub mod anomalies;
pub mod associations;
pub mod health;
pub mod health_status;
pub mod medications;
pub mod monitoring;
