//! Schema Operations Module
//!
//! Table-level operations on [`DatabaseHandle`]: existence checks against
//! the system catalog, table creation and removal, row counting, and column
//! introspection.

use crate::core::db::connection::{DatabaseHandle, SqlValue};
use crate::core::{Result, SqliteKitError};
use crate::sql;

impl DatabaseHandle {
    /// Returns whether a table named `table_name` exists, by counting
    /// matching entries in `sqlite_master`.
    pub fn table_exists(&mut self, table_name: &str) -> Result<bool> {
        self.debug(&format!("checking whether table {} exists", table_name));
        self.execute_with(
            "select count(*) from sqlite_master where type='table' and name=?",
            &[SqlValue::Text(table_name.to_string())],
        )?;
        match self.fetch_one()?.as_deref() {
            Some([SqlValue::Integer(n), ..]) => Ok(*n > 0),
            _ => Ok(false),
        }
    }

    /// Creates a table from an ordered list of (column name, SQL type)
    /// pairs.
    ///
    /// Emits `CREATE TABLE "<name>" ("<col>" <type>, ...)` with quoted
    /// identifiers.
    ///
    /// # Errors
    ///
    /// Returns `SqliteKitError::Value` if `structure` is empty, before any
    /// SQL is built.
    pub fn create_table(&mut self, table_name: &str, structure: &[(&str, &str)]) -> Result<()> {
        self.debug(&format!("creating table {}", table_name));
        let stmt = sql::build_create_table(table_name, structure)?;
        self.execute(&stmt)?;
        Ok(())
    }

    /// Creates a table where every column has type `text`.
    pub fn create_table_as_text_type(
        &mut self,
        table_name: &str,
        column_labels: &[&str],
    ) -> Result<()> {
        let structure: Vec<(&str, &str)> =
            column_labels.iter().map(|label| (*label, "text")).collect();
        self.create_table(table_name, &structure)
    }

    /// Drops the named table.
    pub fn drop_table(&mut self, table_name: &str) -> Result<()> {
        self.debug(&format!("dropping table {}", table_name));
        let stmt = sql::build_drop_table(table_name);
        self.execute(&stmt)?;
        Ok(())
    }

    /// Counts the rows of the named table via a `count(*)` select.
    ///
    /// # Errors
    ///
    /// Returns `SqliteKitError::Lookup` if the count query produced no row
    /// or a row without a leading integer.
    pub fn count(&mut self, table_name: &str) -> Result<i64> {
        self.select_all(table_name, Some(&["count(*)"]))?;
        let row = self.fetch_one()?.ok_or_else(|| {
            SqliteKitError::Lookup(format!("no rows returned counting {}", table_name))
        })?;
        match row.first() {
            Some(SqlValue::Integer(n)) => Ok(*n),
            _ => Err(SqliteKitError::Lookup(format!(
                "count query for {} returned a non-integer row",
                table_name
            ))),
        }
    }

    /// Returns the column names of the named table in declared order, read
    /// from `PRAGMA table_info`.
    pub fn column_labels(&mut self, table_name: &str) -> Result<Vec<String>> {
        let stmt = format!("PRAGMA table_info({})", sql::quote_ident(table_name));
        self.execute(&stmt)?;
        let rows = self.fetch_all()?;
        if rows.is_empty() {
            return Err(SqliteKitError::Lookup(format!(
                "table {} has no columns or does not exist",
                table_name
            )));
        }
        let mut labels = Vec::with_capacity(rows.len());
        for row in rows {
            // table_info rows are (cid, name, type, notnull, dflt_value, pk)
            match row.into_iter().nth(1) {
                Some(SqlValue::Text(name)) => labels.push(name),
                _ => {
                    return Err(SqliteKitError::Query(format!(
                        "unexpected table_info row for {}",
                        table_name
                    )))
                }
            }
        }
        Ok(labels)
    }
}
