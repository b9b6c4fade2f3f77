//! Database connection and schema initialization

pub mod init;

pub use init::{connect, init_schema};
