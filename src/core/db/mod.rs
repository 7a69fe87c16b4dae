//! Database Module
//!
//! This module provides the database handle and the operations built on it,
//! organized into focused submodules:
//!
//! - **Connection Management** (`connection.rs`): handle lifecycle, statement
//!   execution, row fetching
//! - **Schema Operations** (`schema.rs`): table create/drop, existence check,
//!   row count, column introspection
//! - **Query Building** (`query.rs`): structured select/insert/update helpers
//!
//! All operations use the crate-wide `SqliteKitError` type for error
//! propagation. Engine errors from rusqlite pass through unmodified.

pub mod connection;
pub mod query;
pub mod schema;

pub use connection::{DatabaseHandle, RowCursor, SqlValue};
