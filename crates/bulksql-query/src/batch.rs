//! Generated statement + parameter pairs.

use bulksql_core::{PARAM_SIGIL, ParameterSet, Result};
use serde::Serialize;
use std::fmt::Write as _;

/// One executable statement and the parameters it references.
///
/// Placeholders in `sql` have the form `@{prefix}{column}_{index}` and bind
/// by exact name against `params`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedBatch {
    sql: String,
    params: ParameterSet,
    row_count: usize,
}

impl GeneratedBatch {
    pub(crate) fn new(sql: String, params: ParameterSet, row_count: usize) -> Self {
        Self {
            sql,
            params,
            row_count,
        }
    }

    /// A statement that covers no rows (empty UPDATE input).
    pub fn empty() -> Self {
        Self::new(String::new(), ParameterSet::new(), 0)
    }

    /// The SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The parameter bindings.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Number of input rows (or delete values) this statement covers.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// True when the statement covers no rows and should not be executed.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Split into SQL text and parameters.
    pub fn into_parts(self) -> (String, ParameterSet) {
        (self.sql, self.params)
    }
}

/// Parameter name for a cell: `{prefix}{column}_{index}`.
pub(crate) fn param_name(prefix: &str, column: &str, index: usize) -> String {
    let mut name = String::with_capacity(prefix.len() + column.len() + 4);
    name.push_str(prefix);
    name.push_str(column);
    let _ = write!(name, "_{index}");
    name
}

/// Append `@name` to the statement text.
pub(crate) fn push_placeholder(sql: &mut String, name: &str) {
    sql.push(PARAM_SIGIL);
    sql.push_str(name);
}

/// Append `items` to `sql` with `sep` between them, never after the last.
///
/// Stops at the first error returned by `each`.
#[allow(clippy::result_large_err)]
pub(crate) fn push_separated<I, F>(sql: &mut String, sep: &str, items: I, mut each: F) -> Result<()>
where
    I: IntoIterator,
    F: FnMut(&mut String, I::Item) -> Result<()>,
{
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            sql.push_str(sep);
        }
        each(sql, item)?;
    }
    Ok(())
}
