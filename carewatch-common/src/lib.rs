//! # CareWatch Common Library
//!
//! Shared code for the CareWatch care-monitoring backend:
//! - Domain models and status enums
//! - Monitoring stream event types
//! - Error types and HTTP status mapping
//! - Configuration loading
//! - Database schema initialization

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod models;

pub use error::{Error, Result};
