//! SQL text assembly from structured inputs.
//!
//! Identifiers (table and column names) are double-quoted with interior
//! quotes doubled; values bound at execution time use `?` placeholders. The
//! [`sanitize_column`] / [`sanitize_value`] helpers remain for callers
//! assembling raw condition fragments by hand; they wrap their input in
//! single quotes without escaping, so they must not be fed untrusted text.

use crate::core::{Result, SqliteKitError};
use std::fmt::Display;

/// Ordered condition clauses for SELECT and UPDATE statements.
///
/// Each entry pairs a SQL keyword ("where", "or", "and") with a raw
/// condition fragment. Insertion order determines emission order in the
/// generated SQL.
///
/// # Examples
///
/// ```
/// use sqlitekit::Conditions;
///
/// let conditions = Conditions::new()
///     .with("where", "\"a\"=\"b\"")
///     .with("or", "\"c\"=\"d\"");
/// assert_eq!(conditions.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    entries: Vec<(String, String)>,
}

impl Conditions {
    /// Creates an empty condition set
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a (keyword, fragment) pair, builder style
    pub fn with(mut self, keyword: &str, fragment: &str) -> Self {
        self.push(keyword, fragment);
        self
    }

    /// Appends a (keyword, fragment) pair
    pub fn push(&mut self, keyword: &str, fragment: &str) {
        self.entries
            .push((keyword.to_string(), fragment.to_string()));
    }

    /// Iterates entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &(String, String)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Double-quotes an identifier, doubling any embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Wraps a stringified column name in single quotes.
pub fn sanitize_column<T: Display>(column: T) -> String {
    format!("'{}'", column)
}

/// Wraps a stringified value in single quotes; `None` becomes the empty
/// string literal `''`.
pub fn sanitize_value<T: Display>(value: Option<T>) -> String {
    match value {
        None => "''".to_string(),
        Some(v) => format!("'{}'", v),
    }
}

/// Concatenates condition entries into a clause string, entries joined by
/// `, ` in insertion order: `where "a"="b", or "c"="d"`.
///
/// # Errors
///
/// Returns `SqliteKitError::Value` if any keyword is empty.
pub fn condition_clause(conditions: &Conditions) -> Result<String> {
    let mut clause = String::new();
    for (i, (keyword, fragment)) in conditions.iter().enumerate() {
        if keyword.trim().is_empty() {
            return Err(SqliteKitError::Value(
                "condition keyword must not be empty".to_string(),
            ));
        }
        if i > 0 {
            clause.push_str(", ");
        }
        clause.push_str(keyword);
        clause.push(' ');
        clause.push_str(fragment);
    }
    Ok(clause)
}

/// Formats one column for a SELECT projection: `*` and `count(` expressions
/// pass through unquoted, everything else is treated as an identifier.
fn select_clause_column(column: &str) -> String {
    if column == "*" || column.starts_with("count(") {
        column.to_string()
    } else {
        quote_ident(column)
    }
}

/// Builds `select <cols> from "<table>" <conditions>`.
pub fn build_select(table_name: &str, columns: &[&str], conditions: &Conditions) -> Result<String> {
    if columns.is_empty() {
        return Err(SqliteKitError::Value(
            "select requires at least one column".to_string(),
        ));
    }
    let column_list = columns
        .iter()
        .map(|column| select_clause_column(column))
        .collect::<Vec<_>>()
        .join(", ");
    let mut stmt = format!(
        "select {} from {}",
        column_list,
        quote_ident(table_name)
    );
    if !conditions.is_empty() {
        stmt.push(' ');
        stmt.push_str(&condition_clause(conditions)?);
    }
    Ok(stmt)
}

/// Builds `insert into "<table>" ("<col>", ...) VALUES (?, ...)` with one
/// positional placeholder per column.
pub fn build_insert(table_name: &str, columns: &[&str]) -> Result<String> {
    if columns.is_empty() {
        return Err(SqliteKitError::Value(
            "insert requires at least one column".to_string(),
        ));
    }
    let column_list = columns
        .iter()
        .map(|column| quote_ident(column))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; columns.len()].join(", ");
    Ok(format!(
        "insert into {} ({}) VALUES ({})",
        quote_ident(table_name),
        column_list,
        placeholders
    ))
}

/// Builds `update "<table>" set "<col>" = ?, ... <conditions>` with one
/// positional placeholder per column.
pub fn build_update(
    table_name: &str,
    columns: &[&str],
    where_conditions: Option<&Conditions>,
) -> Result<String> {
    if columns.is_empty() {
        return Err(SqliteKitError::Value(
            "update requires at least one column".to_string(),
        ));
    }
    let set_list = columns
        .iter()
        .map(|column| format!("{} = ?", quote_ident(column)))
        .collect::<Vec<_>>()
        .join(", ");
    let mut stmt = format!("update {} set {}", quote_ident(table_name), set_list);
    if let Some(conditions) = where_conditions {
        if !conditions.is_empty() {
            stmt.push(' ');
            stmt.push_str(&condition_clause(conditions)?);
        }
    }
    Ok(stmt)
}

/// Builds `CREATE TABLE "<table>" ("<col>" <type>, ...)`.
pub fn build_create_table(table_name: &str, structure: &[(&str, &str)]) -> Result<String> {
    if structure.is_empty() {
        return Err(SqliteKitError::Value(
            "table structure must contain at least one column".to_string(),
        ));
    }
    let column_list = structure
        .iter()
        .map(|(name, data_type)| format!("{} {}", quote_ident(name), data_type))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!(
        "CREATE TABLE {} ({})",
        quote_ident(table_name),
        column_list
    ))
}

/// Builds `DROP TABLE "<table>"`.
pub fn build_drop_table(table_name: &str) -> String {
    format!("DROP TABLE {}", quote_ident(table_name))
}
