//! DELETE ... WHERE col IN (...) generation.

use crate::batch::{GeneratedBatch, param_name, push_placeholder, push_separated};
use bulksql_core::{
    ParameterSet, Result, Value, validate_column_name, validate_param_prefix, validate_table_name,
};

/// Generate a single `DELETE FROM {table} WHERE {column} IN (...);` statement.
///
/// Each value binds as `@{prefix}{column}_{i}` in input order. With no values
/// the statement reads `IN ()` and the batch reports zero rows, which
/// executors skip.
///
/// # Example
///
/// ```
/// use bulksql_query::generate_delete;
///
/// let batch = generate_delete("TestTable", "Text", ["aaa", "bbb"], "").unwrap();
/// assert_eq!(batch.sql(), "DELETE FROM TestTable WHERE Text IN (@Text_0,@Text_1);");
/// assert_eq!(batch.row_count(), 2);
/// ```
#[tracing::instrument(level = "debug", skip(values))]
#[allow(clippy::result_large_err)]
pub fn generate_delete<I>(
    table: &str,
    selector_column: &str,
    values: I,
    param_prefix: &str,
) -> Result<GeneratedBatch>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    validate_table_name(table)?;
    validate_column_name("selector_column", selector_column)?;
    validate_param_prefix(param_prefix)?;

    let values = values.into_iter();
    let mut params = ParameterSet::with_capacity(values.size_hint().0);
    let mut sql = String::with_capacity(table.len() + selector_column.len() + 32);
    sql.push_str("DELETE FROM ");
    sql.push_str(table);
    sql.push_str(" WHERE ");
    sql.push_str(selector_column);
    sql.push_str(" IN (");
    push_separated(&mut sql, ",", values.enumerate(), |sql, (i, value)| {
        let name = param_name(param_prefix, selector_column, i);
        push_placeholder(sql, &name);
        params.bind(name, value.into())
    })?;
    sql.push_str(");");

    let row_count = params.len();
    if row_count == 0 {
        tracing::warn!("DELETE generated with an empty IN list; it matches no rows");
    } else {
        tracing::debug!(values = row_count, "Generated delete batch");
    }
    tracing::trace!(sql = %sql, "Delete SQL");

    Ok(GeneratedBatch::new(sql, params, row_count))
}
