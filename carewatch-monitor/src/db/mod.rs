//! Database access layer for the monitor service
//!
//! Plain query functions over the shared pool. The two insert functions the
//! ingestion loop calls are generic over the executor so the loop can run
//! them on its exclusive connection.

pub mod activities;
pub mod anomalies;
pub mod associations;
pub mod health_status;
pub mod medications;
