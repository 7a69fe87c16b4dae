// Core infrastructure modules
pub mod core;

// Supporting modules
pub mod config;
pub mod logging;
pub mod sql;

// Re-export the main entry points at the crate root
pub use crate::core::db::{DatabaseHandle, RowCursor, SqlValue};
pub use crate::core::{Result, SqliteKitError};
pub use crate::sql::Conditions;
