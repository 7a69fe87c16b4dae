//! Connection Management Module
//!
//! This module provides the database handle: connection lifecycle, statement
//! execution, and row fetching for a single SQLite resource.

use crate::config::Config;
use crate::core::{Result, SqliteKitError};
use rusqlite::{params_from_iter, Connection};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Value bound to or read from a statement.
pub type SqlValue = rusqlite::types::Value;

/// Rows materialized from the most recently executed query, consumed FIFO.
///
/// Stands in for the engine cursor: `DatabaseHandle::fetch_one` pops the
/// front row, `fetch_all` drains the remainder.
#[derive(Debug, Clone)]
pub struct RowCursor {
    /// Column names of the query result
    pub columns: Vec<String>,
    rows: VecDeque<Vec<SqlValue>>,
}

impl RowCursor {
    /// Number of rows not yet fetched
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

/// Handle owning one connection to a SQLite resource.
///
/// The handle connects on construction and releases the connection either
/// explicitly via [`DatabaseHandle::close`] or on drop, so the connection is
/// committed and closed on every exit path.
///
/// Invariant: `connection` is `Some` iff `connected` is set; the cursor only
/// survives while connected.
///
/// # Examples
///
/// ```no_run
/// use sqlitekit::DatabaseHandle;
///
/// let mut db = DatabaseHandle::open(":memory:")?;
/// db.create_table_as_text_type("t", &["a", "b"])?;
/// # Ok::<(), sqlitekit::SqliteKitError>(())
/// ```
#[derive(Debug)]
pub struct DatabaseHandle {
    resource_uri: String,
    connection: Option<Connection>,
    cursor: Option<RowCursor>,
    connected: bool,
}

impl DatabaseHandle {
    /// Opens a handle to the SQLite resource at `uri`.
    ///
    /// # Arguments
    ///
    /// * `uri` - Path to the SQLite database file, or ":memory:" for an
    ///   in-memory database
    ///
    /// # Errors
    ///
    /// Returns `SqliteKitError::Database` if the engine cannot open the
    /// resource.
    pub fn open(uri: &str) -> Result<Self> {
        let mut handle = DatabaseHandle {
            resource_uri: uri.to_string(),
            connection: None,
            cursor: None,
            connected: false,
        };
        handle.connect(Some(uri))?;
        Ok(handle)
    }

    /// Opens a handle from a loaded [`Config`], applying any configured
    /// pragmas before returning.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut handle = Self::open(&config.database.uri)?;
        if let Some(pragmas) = &config.database.pragmas {
            for pragma in pragmas {
                handle.execute(pragma)?;
            }
        }
        Ok(handle)
    }

    /// Connects to the resource at `uri`, or reconnects to the stored URI
    /// when `uri` is `None`. Either way the previous cursor is discarded and
    /// the handle is marked connected.
    ///
    /// # Errors
    ///
    /// Returns `SqliteKitError::Database` on engine connection failure.
    pub fn connect(&mut self, uri: Option<&str>) -> Result<()> {
        if let Some(uri) = uri {
            self.resource_uri = uri.to_string();
        }
        debug!(db_uri = %self.resource_uri, "opening database connection");
        let conn = Connection::open(&self.resource_uri)?;
        self.connection = Some(conn);
        self.cursor = None;
        self.connected = true;
        Ok(())
    }

    /// Commits and closes the connection. A no-op when not connected, so
    /// closing twice is safe.
    ///
    /// rusqlite connections run in autocommit mode; an explicit COMMIT is
    /// issued only if a transaction was left open on the connection.
    pub fn close(&mut self) -> Result<()> {
        if !self.connected {
            return Ok(());
        }
        self.connected = false;
        self.cursor = None;
        if let Some(conn) = self.connection.take() {
            if !conn.is_autocommit() {
                conn.execute_batch("COMMIT")?;
            }
            conn.close().map_err(|(_, err)| err)?;
        }
        debug!(db_uri = %self.resource_uri, "closed database connection");
        Ok(())
    }

    /// Whether the handle currently holds an open connection
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The resource URI this handle points at
    pub fn resource_uri(&self) -> &str {
        &self.resource_uri
    }

    /// The underlying connection, if connected
    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    /// The cursor from the most recent query, if any
    pub fn cursor(&self) -> Option<&RowCursor> {
        self.cursor.as_ref()
    }

    /// Executes a SQL statement with no parameters.
    ///
    /// See [`DatabaseHandle::execute_with`].
    pub fn execute(&mut self, sql: &str) -> Result<usize> {
        self.execute_with(sql, &[])
    }

    /// Executes a SQL statement with positional parameters bound to `?`
    /// placeholders, reconnecting to the stored URI first if the handle was
    /// closed.
    ///
    /// Statements returning columns replace the handle cursor with the
    /// materialized result rows; other statements run directly. The
    /// connection stays in autocommit mode, so every execution is committed.
    ///
    /// # Arguments
    ///
    /// * `sql` - The SQL text to execute
    /// * `params` - Values bound positionally to `?` placeholders
    ///
    /// # Returns
    ///
    /// The number of result rows for queries, or the number of affected rows
    /// for other statements.
    ///
    /// # Errors
    ///
    /// Returns `SqliteKitError::Database` for engine failures (malformed SQL,
    /// constraint violations), unmodified.
    pub fn execute_with(&mut self, sql: &str, params: &[SqlValue]) -> Result<usize> {
        if !self.is_connected() {
            self.connect(None)?;
        }
        let conn = self
            .connection
            .as_ref()
            .ok_or_else(|| SqliteKitError::Query("handle has no open connection".to_string()))?;

        debug!(db_uri = %self.resource_uri, params = params.len(), "executing SQL: {}", sql);
        let mut stmt = conn.prepare(sql)?;

        if stmt.column_count() > 0 {
            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            let column_count = stmt.column_count();
            let rows = stmt
                .query_map(params_from_iter(params.iter()), |row| {
                    let mut values = Vec::with_capacity(column_count);
                    for i in 0..column_count {
                        values.push(row.get::<_, SqlValue>(i)?);
                    }
                    Ok(values)
                })?
                .collect::<rusqlite::Result<VecDeque<_>>>()?;
            let count = rows.len();
            drop(stmt);
            self.cursor = Some(RowCursor { columns, rows });
            Ok(count)
        } else {
            let affected = stmt.execute(params_from_iter(params.iter()))?;
            Ok(affected)
        }
    }

    /// Executes the same SQL statement once per parameter row, preparing it
    /// a single time. Reconnects first if the handle was closed.
    ///
    /// # Returns
    ///
    /// The total number of affected rows across all executions.
    pub fn execute_many(&mut self, sql: &str, param_rows: &[Vec<SqlValue>]) -> Result<usize> {
        if !self.is_connected() {
            self.connect(None)?;
        }
        let conn = self
            .connection
            .as_ref()
            .ok_or_else(|| SqliteKitError::Query("handle has no open connection".to_string()))?;

        debug!(
            db_uri = %self.resource_uri,
            rows = param_rows.len(),
            "executing batched SQL: {}", sql
        );
        let mut stmt = conn.prepare(sql)?;
        let mut affected = 0;
        for row in param_rows {
            affected += stmt.execute(params_from_iter(row.iter()))?;
        }
        Ok(affected)
    }

    /// Fetches the next row from the current cursor.
    ///
    /// # Returns
    ///
    /// `Ok(None)` once the cursor is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `SqliteKitError::Query` if no query has been executed on this
    /// handle.
    pub fn fetch_one(&mut self) -> Result<Option<Vec<SqlValue>>> {
        let cursor = self
            .cursor
            .as_mut()
            .ok_or_else(|| SqliteKitError::Query("no query has been executed".to_string()))?;
        Ok(cursor.rows.pop_front())
    }

    /// Fetches all remaining rows from the current cursor.
    ///
    /// # Errors
    ///
    /// Returns `SqliteKitError::Query` if no query has been executed on this
    /// handle.
    pub fn fetch_all(&mut self) -> Result<Vec<Vec<SqlValue>>> {
        let cursor = self
            .cursor
            .as_mut()
            .ok_or_else(|| SqliteKitError::Query("no query has been executed".to_string()))?;
        Ok(cursor.rows.drain(..).collect())
    }

    /// Emits an info-level event scoped with this handle's resource URI
    pub fn info(&self, msg: &str) {
        tracing::info!(db_uri = %self.resource_uri, "{}", msg);
    }

    /// Emits a debug-level event scoped with this handle's resource URI
    pub fn debug(&self, msg: &str) {
        tracing::debug!(db_uri = %self.resource_uri, "{}", msg);
    }

    /// Emits a warn-level event scoped with this handle's resource URI
    pub fn warning(&self, msg: &str) {
        tracing::warn!(db_uri = %self.resource_uri, "{}", msg);
    }
}

impl Drop for DatabaseHandle {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(db_uri = %self.resource_uri, "failed to close database handle: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = DatabaseHandle::open(":memory:").unwrap();
        assert!(db.is_connected());
        assert_eq!(db.resource_uri(), ":memory:");
        assert!(db.connection().is_some());
        assert!(db.cursor().is_none());
    }

    #[test]
    fn test_open_failure() {
        let result = DatabaseHandle::open("/nonexistent/path/database.db");
        assert!(result.is_err());
        match result.unwrap_err() {
            SqliteKitError::Database(_) => {}
            other => panic!("Expected Database error, got {other:?}"),
        }
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut db = DatabaseHandle::open(":memory:").unwrap();
        db.close().unwrap();
        assert!(!db.is_connected());
        assert!(db.connection().is_none());
        // Second close is a no-op
        db.close().unwrap();
        assert!(!db.is_connected());
    }

    #[test]
    fn test_reconnect_reuses_stored_uri() {
        let mut db = DatabaseHandle::open(":memory:").unwrap();
        db.close().unwrap();
        db.connect(None).unwrap();
        assert!(db.is_connected());
        assert_eq!(db.resource_uri(), ":memory:");
    }

    #[test]
    fn test_execute_auto_connects() {
        let mut db = DatabaseHandle::open(":memory:").unwrap();
        db.close().unwrap();
        // Executing on a closed handle reopens the stored URI
        db.execute("CREATE TABLE t (a text)").unwrap();
        assert!(db.is_connected());
    }

    #[test]
    fn test_execute_query_fills_cursor() {
        let mut db = DatabaseHandle::open(":memory:").unwrap();
        db.execute("CREATE TABLE t (a text, b text)").unwrap();
        db.execute_with(
            "insert into t (a, b) VALUES (?, ?)",
            &[
                SqlValue::Text("1".to_string()),
                SqlValue::Text("2".to_string()),
            ],
        )
        .unwrap();

        let rows = db.execute("select a, b from t").unwrap();
        assert_eq!(rows, 1);
        let cursor = db.cursor().unwrap();
        assert_eq!(cursor.columns, vec!["a", "b"]);
        assert_eq!(cursor.remaining(), 1);

        let row = db.fetch_one().unwrap().unwrap();
        assert_eq!(row[0], SqlValue::Text("1".to_string()));
        assert_eq!(row[1], SqlValue::Text("2".to_string()));
        assert_eq!(db.fetch_one().unwrap(), None);
    }

    #[test]
    fn test_execute_many_prepares_once() {
        let mut db = DatabaseHandle::open(":memory:").unwrap();
        db.execute("CREATE TABLE t (a text)").unwrap();
        let affected = db
            .execute_many(
                "insert into t (a) VALUES (?)",
                &[
                    vec![SqlValue::Text("x".to_string())],
                    vec![SqlValue::Text("y".to_string())],
                    vec![SqlValue::Text("z".to_string())],
                ],
            )
            .unwrap();
        assert_eq!(affected, 3);
        assert_eq!(db.count("t").unwrap(), 3);
    }

    #[test]
    fn test_fetch_before_query_fails() {
        let mut db = DatabaseHandle::open(":memory:").unwrap();
        match db.fetch_one() {
            Err(SqliteKitError::Query(msg)) => assert!(msg.contains("no query")),
            other => panic!("Expected Query error, got {other:?}"),
        }
        assert!(db.fetch_all().is_err());
    }

    #[test]
    fn test_engine_errors_pass_through() {
        let mut db = DatabaseHandle::open(":memory:").unwrap();
        let result = db.execute("select * from missing_table");
        match result.unwrap_err() {
            SqliteKitError::Database(err) => {
                assert!(err.to_string().contains("no such table"));
            }
            other => panic!("Expected Database error, got {other:?}"),
        }
    }

    #[test]
    fn test_close_clears_cursor() {
        let mut db = DatabaseHandle::open(":memory:").unwrap();
        db.execute("CREATE TABLE t (a text)").unwrap();
        db.execute("select * from t").unwrap();
        assert!(db.cursor().is_some());
        db.close().unwrap();
        assert!(db.cursor().is_none());
    }
}
