//! Query Building Module
//!
//! Structured select/insert/update helpers on [`DatabaseHandle`]. These
//! assemble SQL text from structured inputs via the `sql` module and run it
//! through the handle's single connection.

use crate::core::db::connection::{DatabaseHandle, SqlValue};
use crate::core::{Result, SqliteKitError};
use crate::sql::{self, Conditions};

impl DatabaseHandle {
    /// Selects rows from `table_name` with no conditions.
    ///
    /// # Arguments
    ///
    /// * `table_name` - Table to select from
    /// * `select_columns` - Columns to project; `None` selects `*`
    ///
    /// # Returns
    ///
    /// The number of rows now available on the handle cursor.
    pub fn select_all(
        &mut self,
        table_name: &str,
        select_columns: Option<&[&str]>,
    ) -> Result<usize> {
        let columns = select_columns.unwrap_or(&["*"]);
        self.select(table_name, columns, &Conditions::new())
    }

    /// Selects rows from `table_name` with the given condition clauses.
    ///
    /// Column names are double-quoted except `*` and `count(` expressions.
    /// The result rows land on the handle cursor for
    /// [`DatabaseHandle::fetch_one`] / [`DatabaseHandle::fetch_all`].
    ///
    /// # Errors
    ///
    /// Returns `SqliteKitError::Value` before execution if `select_columns`
    /// is empty or a condition keyword is empty.
    pub fn select(
        &mut self,
        table_name: &str,
        select_columns: &[&str],
        conditions: &Conditions,
    ) -> Result<usize> {
        let stmt = sql::build_select(table_name, select_columns, conditions)?;
        self.execute(&stmt)
    }

    /// Inserts one row into `table_name`, binding `values` positionally.
    ///
    /// # Errors
    ///
    /// Returns `SqliteKitError::Type` before touching the database if
    /// `columns` and `values` differ in length, and `SqliteKitError::Value`
    /// if they are empty.
    pub fn insert(
        &mut self,
        table_name: &str,
        columns: &[&str],
        values: &[SqlValue],
    ) -> Result<usize> {
        if columns.len() != values.len() {
            return Err(SqliteKitError::Type(format!(
                "insert into {} requires one value per column ({} columns, {} values)",
                table_name,
                columns.len(),
                values.len()
            )));
        }
        let stmt = sql::build_insert(table_name, columns)?;
        self.execute_with(&stmt, values)
    }

    /// Updates `table_name`, pairing `columns` and `values` positionally into
    /// a SET clause with bound parameters, optionally constrained by
    /// `where_conditions`.
    ///
    /// # Returns
    ///
    /// The number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns `SqliteKitError::Type` before touching the database if
    /// `columns` and `values` differ in length, and `SqliteKitError::Value`
    /// if they are empty or a condition keyword is empty.
    pub fn update(
        &mut self,
        table_name: &str,
        columns: &[&str],
        values: &[SqlValue],
        where_conditions: Option<&Conditions>,
    ) -> Result<usize> {
        if columns.len() != values.len() {
            return Err(SqliteKitError::Type(format!(
                "update of {} requires one value per column ({} columns, {} values)",
                table_name,
                columns.len(),
                values.len()
            )));
        }
        let stmt = sql::build_update(table_name, columns, where_conditions)?;
        self.execute_with(&stmt, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(v: &str) -> SqlValue {
        SqlValue::Text(v.to_string())
    }

    fn setup_handle() -> DatabaseHandle {
        let mut db = DatabaseHandle::open(":memory:").unwrap();
        db.create_table_as_text_type("t", &["a", "b"]).unwrap();
        db
    }

    #[test]
    fn test_insert_and_select_all() {
        let mut db = setup_handle();
        db.insert("t", &["a", "b"], &[text("1"), text("2")]).unwrap();
        db.insert("t", &["a", "b"], &[text("3"), text("4")]).unwrap();

        let rows = db.select_all("t", None).unwrap();
        assert_eq!(rows, 2);
        let all = db.fetch_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], vec![text("1"), text("2")]);
    }

    #[test]
    fn test_insert_length_mismatch_fails_early() {
        let mut db = setup_handle();
        let result = db.insert("t", &["a", "b"], &[text("1")]);
        match result.unwrap_err() {
            SqliteKitError::Type(msg) => assert!(msg.contains("2 columns, 1 values")),
            other => panic!("Expected Type error, got {other:?}"),
        }
        // Nothing reached the database
        assert_eq!(db.count("t").unwrap(), 0);
    }

    #[test]
    fn test_select_with_conditions() {
        let mut db = setup_handle();
        db.insert("t", &["a", "b"], &[text("1"), text("2")]).unwrap();
        db.insert("t", &["a", "b"], &[text("3"), text("4")]).unwrap();

        let conditions = Conditions::new().with("where", "\"a\"='1'");
        let rows = db.select("t", &["a", "b"], &conditions).unwrap();
        assert_eq!(rows, 1);
        let row = db.fetch_one().unwrap().unwrap();
        assert_eq!(row[1], text("2"));
    }

    #[test]
    fn test_select_projects_columns() {
        let mut db = setup_handle();
        db.insert("t", &["a", "b"], &[text("1"), text("2")]).unwrap();

        db.select_all("t", Some(&["b"])).unwrap();
        let cursor = db.cursor().unwrap();
        assert_eq!(cursor.columns, vec!["b"]);
    }

    #[test]
    fn test_update_binds_values() {
        let mut db = setup_handle();
        db.insert("t", &["a", "b"], &[text("1"), text("2")]).unwrap();
        db.insert("t", &["a", "b"], &[text("3"), text("4")]).unwrap();

        let conditions = Conditions::new().with("where", "\"a\"='3'");
        let affected = db
            .update("t", &["b"], &[text("updated")], Some(&conditions))
            .unwrap();
        assert_eq!(affected, 1);

        let conditions = Conditions::new().with("where", "\"a\"='3'");
        db.select("t", &["b"], &conditions).unwrap();
        let row = db.fetch_one().unwrap().unwrap();
        assert_eq!(row[0], text("updated"));
    }

    #[test]
    fn test_update_without_conditions_touches_all_rows() {
        let mut db = setup_handle();
        db.insert("t", &["a", "b"], &[text("1"), text("2")]).unwrap();
        db.insert("t", &["a", "b"], &[text("3"), text("4")]).unwrap();

        let affected = db.update("t", &["b"], &[text("same")], None).unwrap();
        assert_eq!(affected, 2);
    }

    #[test]
    fn test_update_quoted_values_stay_literal() {
        // Values containing quotes are bound, not spliced into the SQL text
        let mut db = setup_handle();
        db.insert("t", &["a", "b"], &[text("1"), text("2")]).unwrap();

        let tricky = "it's a '; drop table t; --";
        db.update("t", &["b"], &[text(tricky)], None).unwrap();
        assert!(db.table_exists("t").unwrap());

        db.select_all("t", Some(&["b"])).unwrap();
        let row = db.fetch_one().unwrap().unwrap();
        assert_eq!(row[0], text(tricky));
    }
}
