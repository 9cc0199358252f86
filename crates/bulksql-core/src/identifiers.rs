//! Identifier checks for names spliced into generated SQL.
//!
//! Table and column names are written into statement text verbatim and
//! column names also become part of placeholder names (`@{prefix}{column}_{i}`),
//! so they are restricted to plain identifiers. Values never pass through here;
//! they are always bound as parameters.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

const COLUMN_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";
const TABLE_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$";
const PREFIX_PATTERN: &str = r"^[A-Za-z0-9_]*$";

#[allow(clippy::result_large_err)]
fn compiled(
    cell: &'static OnceLock<std::result::Result<Regex, regex::Error>>,
    pattern: &'static str,
) -> Result<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| Error::Custom(format!("invalid identifier pattern {pattern}: {e}")))
}

#[allow(clippy::result_large_err)]
fn column_regex() -> Result<&'static Regex> {
    static CELL: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    compiled(&CELL, COLUMN_PATTERN)
}

#[allow(clippy::result_large_err)]
fn table_regex() -> Result<&'static Regex> {
    static CELL: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    compiled(&CELL, TABLE_PATTERN)
}

#[allow(clippy::result_large_err)]
fn prefix_regex() -> Result<&'static Regex> {
    static CELL: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    compiled(&CELL, PREFIX_PATTERN)
}

/// Check a table name, optionally schema-qualified (`dbo.Orders`).
#[allow(clippy::result_large_err)]
pub fn validate_table_name(table: &str) -> Result<()> {
    if table.is_empty() {
        return Err(Error::invalid_argument("table", "table name must not be empty"));
    }
    if !table_regex()?.is_match(table) {
        return Err(Error::invalid_argument(
            "table",
            format!("'{}' is not a valid table name", table),
        ));
    }
    Ok(())
}

/// Check a single column name.
#[allow(clippy::result_large_err)]
pub fn validate_column_name(argument: &'static str, column: &str) -> Result<()> {
    if column.is_empty() {
        return Err(Error::invalid_argument(argument, "column name must not be empty"));
    }
    if !column_regex()?.is_match(column) {
        return Err(Error::invalid_argument(
            argument,
            format!("'{}' is not a valid column name", column),
        ));
    }
    Ok(())
}

/// Check a column list: non-empty, every name valid, no duplicates.
#[allow(clippy::result_large_err)]
pub fn validate_column_list<S: AsRef<str>>(argument: &'static str, columns: &[S]) -> Result<()> {
    if columns.is_empty() {
        return Err(Error::invalid_argument(
            argument,
            "at least one column is required",
        ));
    }
    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        let column = column.as_ref();
        validate_column_name(argument, column)?;
        if !seen.insert(column) {
            return Err(Error::invalid_argument(
                argument,
                format!("column '{}' is listed more than once", column),
            ));
        }
    }
    Ok(())
}

/// Check a parameter-name prefix. The empty prefix is valid.
#[allow(clippy::result_large_err)]
pub fn validate_param_prefix(prefix: &str) -> Result<()> {
    if !prefix_regex()?.is_match(prefix) {
        return Err(Error::invalid_argument(
            "param_prefix",
            format!("'{}' may only contain letters, digits and '_'", prefix),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        assert!(validate_table_name("TestTable").is_ok());
        assert!(validate_table_name("dbo.TestTable").is_ok());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("Test Table").is_err());
        assert!(validate_table_name("t; DROP TABLE x").is_err());
        assert!(validate_table_name("schema.").is_err());
    }

    #[test]
    fn test_column_names() {
        assert!(validate_column_name("columns", "TextCol").is_ok());
        assert!(validate_column_name("columns", "_hidden1").is_ok());
        assert!(validate_column_name("columns", "1abc").is_err());
        assert!(validate_column_name("columns", "a.b").is_err());
        assert!(validate_column_name("columns", "").is_err());
    }

    #[test]
    fn test_column_list_rejects_empty_and_duplicates() {
        let empty: [&str; 0] = [];
        let err = validate_column_list("columns", &empty).unwrap_err();
        assert!(err.is_argument_error());

        let err = validate_column_list("columns", &["Id", "Text", "Id"]).unwrap_err();
        assert!(err.to_string().contains("more than once"));

        assert!(validate_column_list("columns", &["Id", "Text"]).is_ok());
    }

    #[test]
    fn test_param_prefix() {
        assert!(validate_param_prefix("").is_ok());
        assert!(validate_param_prefix("u1_").is_ok());
        assert!(validate_param_prefix("a-b").is_err());
        assert!(validate_param_prefix("@x").is_err());
    }
}
