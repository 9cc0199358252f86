//! Multi-row INSERT generation, split into batches.

use crate::batch::{GeneratedBatch, param_name, push_placeholder, push_separated};
use crate::options::InsertOptions;
use crate::resolver::{CalculatedValues, resolve};
use bulksql_core::{
    BulkRow, DatabaseEngine, Error, ParameterSet, Result, validate_column_list,
    validate_param_prefix, validate_table_name,
};

/// Generate one multi-row INSERT per batch of `rows`.
///
/// Each statement has the form
/// `INSERT INTO {table} ({c1},{c2}) VALUES (@{p}c1_0,@{p}c2_0),(@{p}c1_1,@{p}c2_1);`
/// where the row index restarts at 0 in every batch; every batch carries its
/// own [`ParameterSet`], so repeated names across batches never meet.
///
/// A batch closes after `options.batch_size` rows or at the last row;
/// `batch_size == 0` yields a single batch. Returns an empty list for empty
/// `rows`. Column values go through [`resolve`], so calculated overrides win
/// over row fields.
///
/// # Example
///
/// ```
/// use bulksql_core::{DatabaseEngine, Value};
/// use bulksql_query::{InsertOptions, generate_insert_batches};
/// use serde_json::json;
///
/// let rows = vec![json!({"Text": "aaa"}), json!({"Text": "bbb"}), json!({"Text": "ccc"})];
/// let batches = generate_insert_batches(
///     DatabaseEngine::Postgres,
///     "TestTable",
///     &rows,
///     &["Text"],
///     None,
///     &InsertOptions::new().batch_size(2),
/// )
/// .unwrap();
///
/// assert_eq!(batches.len(), 2);
/// assert_eq!(batches[0].sql(), "INSERT INTO TestTable (Text) VALUES (@Text_0),(@Text_1);");
/// assert_eq!(batches[1].params().get("Text_0"), Some(&Value::Text("ccc".into())));
/// ```
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(engine = %engine, table = table, rows = rows.len())
)]
#[allow(clippy::result_large_err)]
pub fn generate_insert_batches<T, S>(
    engine: DatabaseEngine,
    table: &str,
    rows: &[T],
    columns: &[S],
    calculated: Option<&CalculatedValues<'_, T>>,
    options: &InsertOptions,
) -> Result<Vec<GeneratedBatch>>
where
    T: BulkRow,
    S: AsRef<str>,
{
    validate_table_name(table)?;
    validate_column_list("columns", columns)?;
    validate_param_prefix(&options.param_prefix)?;
    let conflict = conflict_clause(engine, options)?;

    if rows.is_empty() {
        tracing::debug!("No rows to insert");
        return Ok(Vec::new());
    }

    // Shared by every batch: INSERT INTO table (c1,c2,...) VALUES
    let mut head = String::with_capacity(table.len() + columns.len() * 16 + 24);
    head.push_str("INSERT INTO ");
    head.push_str(table);
    head.push_str(" (");
    push_separated(&mut head, ",", columns, |sql, column| {
        sql.push_str(column.as_ref());
        Ok(())
    })?;
    head.push_str(") VALUES ");

    let rows_per_batch = options.rows_per_batch().unwrap_or(rows.len());
    let mut batches = Vec::with_capacity(rows.len().div_ceil(rows_per_batch));

    for (batch_index, chunk) in rows.chunks(rows_per_batch).enumerate() {
        let first_row = batch_index * rows_per_batch;
        let batch = build_batch(
            &head,
            chunk,
            first_row,
            columns,
            calculated,
            &options.param_prefix,
            conflict,
        )?;

        tracing::debug!(
            batch = batch_index,
            rows = batch.row_count(),
            params = batch.params().len(),
            "Closed insert batch"
        );
        tracing::trace!(sql = %batch.sql(), "Insert SQL");
        batches.push(batch);
    }

    Ok(batches)
}

/// Build one INSERT statement. Parameter indexes start at 0 for `chunk[0]`;
/// `first_row` is only used to report the global row in errors.
#[allow(clippy::result_large_err)]
fn build_batch<T, S>(
    head: &str,
    chunk: &[T],
    first_row: usize,
    columns: &[S],
    calculated: Option<&CalculatedValues<'_, T>>,
    prefix: &str,
    conflict: Option<&str>,
) -> Result<GeneratedBatch>
where
    T: BulkRow,
    S: AsRef<str>,
{
    let mut sql = String::with_capacity(head.len() + chunk.len() * columns.len() * 12);
    sql.push_str(head);
    let mut params = ParameterSet::with_capacity(chunk.len() * columns.len());

    push_separated(&mut sql, ",", chunk.iter().enumerate(), |sql, (i, row)| {
        sql.push('(');
        push_separated(sql, ",", columns, |sql, column| {
            let column = column.as_ref();
            let value = resolve(column, row, calculated).map_err(|e| e.at_row(first_row + i))?;
            let name = param_name(prefix, column, i);
            push_placeholder(sql, &name);
            params.bind(name, value)
        })?;
        sql.push(')');
        Ok(())
    })?;

    if let Some(clause) = conflict {
        sql.push(' ');
        sql.push_str(clause);
    }
    sql.push(';');

    Ok(GeneratedBatch::new(sql, params, chunk.len()))
}

/// Look up the conflict clause for the requested policy.
///
/// Engines without a clause either fail (strict) or fall back to no clause.
#[allow(clippy::result_large_err)]
fn conflict_clause(engine: DatabaseEngine, options: &InsertOptions) -> Result<Option<&'static str>> {
    let dialect = engine.policy();
    if !dialect.supports(options.on_conflict) {
        if options.strict_conflict {
            return Err(Error::UnsupportedConflictPolicy {
                engine,
                policy: options.on_conflict,
            });
        }
        tracing::warn!(
            engine = %engine,
            policy = ?options.on_conflict,
            "Conflict policy not supported by engine; generating INSERT without a conflict clause"
        );
    }
    Ok(dialect.conflict_clause(options.on_conflict))
}
