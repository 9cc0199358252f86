//! Per-row UPDATE generation.

use crate::batch::{GeneratedBatch, param_name, push_placeholder, push_separated};
use crate::options::UpdateOptions;
use crate::resolver::{CalculatedValues, resolve, resolve_field};
use bulksql_core::{
    BulkRow, DatabaseEngine, Error, ParameterSet, Result, validate_column_list,
    validate_param_prefix, validate_table_name,
};

/// Generate one UPDATE statement per row, all in a single batch.
///
/// Every row produces
/// `UPDATE {table} SET {u1} = @{p}u1_{i}, {u2} = @{p}u2_{i} WHERE {s1} = @{p}s1_{i} AND ...;`
/// with `i` counting rows from 0 across the whole input. Statements are
/// separated by newlines and, when `options.use_transaction` is set, wrapped in
/// the engine's transaction envelope.
///
/// Updated columns go through [`resolve`], so calculated overrides apply.
/// Selector columns always come from the row itself. A column may not appear
/// in both lists. Empty `rows` yield [`GeneratedBatch::empty`].
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(engine = %engine, table = table, rows = rows.len())
)]
#[allow(clippy::result_large_err)]
pub fn generate_update<T, S, U>(
    engine: DatabaseEngine,
    table: &str,
    rows: &[T],
    selector_columns: &[S],
    columns_to_update: &[U],
    calculated: Option<&CalculatedValues<'_, T>>,
    options: &UpdateOptions,
) -> Result<GeneratedBatch>
where
    T: BulkRow,
    S: AsRef<str>,
    U: AsRef<str>,
{
    validate_column_list("selector_columns", selector_columns)?;
    validate_column_list("columns_to_update", columns_to_update)?;
    validate_table_name(table)?;
    validate_param_prefix(&options.param_prefix)?;

    if let Some(column) = selector_columns
        .iter()
        .map(AsRef::as_ref)
        .find(|s| columns_to_update.iter().any(|u| u.as_ref() == *s))
    {
        return Err(Error::invalid_argument(
            "columns_to_update",
            format!("column '{column}' is also a selector column"),
        ));
    }

    if rows.is_empty() {
        tracing::debug!("No rows to update");
        return Ok(GeneratedBatch::empty());
    }

    let dialect = engine.policy();
    let prefix = options.param_prefix.as_str();
    let per_row = selector_columns.len() + columns_to_update.len();
    let mut sql = String::with_capacity(rows.len() * (table.len() + per_row * 24 + 16));
    let mut params = ParameterSet::with_capacity(rows.len() * per_row);

    if options.use_transaction {
        sql.push_str(dialect.transaction_open);
        sql.push('\n');
    }

    push_separated(&mut sql, "\n", rows.iter().enumerate(), |sql, (i, row)| {
        sql.push_str("UPDATE ");
        sql.push_str(table);
        sql.push_str(" SET ");
        push_separated(sql, ", ", columns_to_update, |sql, column| {
            let column = column.as_ref();
            let value = resolve(column, row, calculated).map_err(|e| e.at_row(i))?;
            let name = param_name(prefix, column, i);
            sql.push_str(column);
            sql.push_str(" = ");
            push_placeholder(sql, &name);
            params.bind(name, value)
        })?;

        sql.push_str(" WHERE ");
        push_separated(sql, " AND ", selector_columns, |sql, column| {
            let column = column.as_ref();
            let value = resolve_field(column, row).map_err(|e| e.at_row(i))?;
            let name = param_name(prefix, column, i);
            sql.push_str(column);
            sql.push_str(" = ");
            push_placeholder(sql, &name);
            params.bind(name, value)
        })?;
        sql.push(';');
        Ok(())
    })?;

    if options.use_transaction {
        sql.push('\n');
        sql.push_str(dialect.transaction_close);
    }

    tracing::debug!(
        rows = rows.len(),
        params = params.len(),
        transaction = options.use_transaction,
        "Generated update batch"
    );
    tracing::trace!(sql = %sql, "Update SQL");

    Ok(GeneratedBatch::new(sql, params, rows.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulksql_core::Value;
    use serde_json::{Value as Json, json};

    fn rows() -> Vec<Json> {
        vec![
            json!({ "Id": 1, "Text": "aaa", "Number": 10 }),
            json!({ "Id": 2, "Text": "bbb", "Number": 20 }),
        ]
    }

    #[test]
    fn single_row_postgres_transaction() {
        let batch = generate_update(
            DatabaseEngine::Postgres,
            "T",
            &rows()[..1],
            &["Id"],
            &["Text"],
            None,
            &UpdateOptions::default(),
        )
        .unwrap();

        assert_eq!(
            batch.sql(),
            "BEGIN;\nUPDATE T SET Text = @Text_0 WHERE Id = @Id_0;\nCOMMIT;"
        );
        assert_eq!(
            batch.params().iter().collect::<Vec<_>>(),
            vec![
                ("Text_0", &Value::Text("aaa".to_string())),
                ("Id_0", &Value::BigInt(1)),
            ]
        );
        assert_eq!(batch.row_count(), 1);
    }

    #[test]
    fn rows_are_indexed_globally() {
        let batch = generate_update(
            DatabaseEngine::SqlServer,
            "T",
            &rows(),
            &["Id"],
            &["Text", "Number"],
            None,
            &UpdateOptions::default(),
        )
        .unwrap();

        assert_eq!(
            batch.sql(),
            "BEGIN TRANSACTION;\n\
             UPDATE T SET Text = @Text_0, Number = @Number_0 WHERE Id = @Id_0;\n\
             UPDATE T SET Text = @Text_1, Number = @Number_1 WHERE Id = @Id_1;\n\
             COMMIT;"
        );
        assert_eq!(batch.params().len(), 6);
        assert_eq!(batch.params().get("Number_1"), Some(&Value::BigInt(20)));
    }

    #[test]
    fn multiple_selectors_joined_with_and() {
        let batch = generate_update(
            DatabaseEngine::Postgres,
            "T",
            &rows()[..1],
            &["Id", "Number"],
            &["Text"],
            None,
            &UpdateOptions::new().use_transaction(false),
        )
        .unwrap();
        assert_eq!(
            batch.sql(),
            "UPDATE T SET Text = @Text_0 WHERE Id = @Id_0 AND Number = @Number_0;"
        );
    }

    #[test]
    fn prefix_and_no_transaction() {
        let batch = generate_update(
            DatabaseEngine::MySql,
            "T",
            &rows(),
            &["Id"],
            &["Text"],
            None,
            &UpdateOptions::new().use_transaction(false).param_prefix("u"),
        )
        .unwrap();
        assert_eq!(
            batch.sql(),
            "UPDATE T SET Text = @uText_0 WHERE Id = @uId_0;\n\
             UPDATE T SET Text = @uText_1 WHERE Id = @uId_1;"
        );
        assert!(batch.params().contains("uId_1"));
    }

    #[test]
    fn selectors_ignore_calculated_values() {
        let calculated = CalculatedValues::new()
            .with("Text", |row: &Json| format!("n={}", row["Number"]))
            .with("Id", |_: &Json| 999_i64);

        let batch = generate_update(
            DatabaseEngine::Postgres,
            "T",
            &rows(),
            &["Id"],
            &["Text"],
            Some(&calculated),
            &UpdateOptions::default(),
        )
        .unwrap();

        let params = batch.params();
        assert_eq!(params.get("Text_0"), Some(&Value::Text("n=10".into())));
        assert_eq!(params.get("Text_1"), Some(&Value::Text("n=20".into())));
        assert_eq!(params.get("Id_0"), Some(&Value::BigInt(1)));
        assert_eq!(params.get("Id_1"), Some(&Value::BigInt(2)));
    }

    #[test]
    fn large_unsigned_selector_binds_exactly() {
        let rows: Vec<Json> = vec![
            serde_json::from_str(r#"{"Id": 18446744073709551615, "Text": "x"}"#).unwrap(),
        ];
        let batch = generate_update(
            DatabaseEngine::Postgres,
            "T",
            &rows,
            &["Id"],
            &["Text"],
            None,
            &UpdateOptions::default(),
        )
        .unwrap();
        assert_eq!(batch.params().get("Id_0"), Some(&Value::from(u64::MAX)));
    }

    #[test]
    fn calculated_error_reports_row_and_source() {
        let calculated = CalculatedValues::new().with_fallible("Text", |row: &Json| {
            if row["Id"] == 2 {
                Err(std::io::Error::other("no text for row"))
            } else {
                Ok(Value::Text("ok".into()))
            }
        });

        let err = generate_update(
            DatabaseEngine::SqlServer,
            "T",
            &rows(),
            &["Id"],
            &["Text"],
            Some(&calculated),
            &UpdateOptions::default(),
        )
        .unwrap_err();

        match err {
            Error::Calculated(e) => {
                assert_eq!(e.column, "Text");
                assert_eq!(e.row, Some(1));
                assert!(e.source.downcast_ref::<std::io::Error>().is_some());
                assert_eq!(e.source.to_string(), "no text for row");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let calculated = CalculatedValues::new().with("Text", |row: &Json| row["Number"].clone());
        let generate = || {
            generate_update(
                DatabaseEngine::Postgres,
                "T",
                &rows(),
                &["Id"],
                &["Text", "Number"],
                Some(&calculated),
                &UpdateOptions::new().param_prefix("u_"),
            )
            .unwrap()
        };
        let (a, b) = (generate(), generate());
        assert_eq!(a.sql(), b.sql());
        assert_eq!(a, b);
    }

    #[test]
    fn empty_rows_give_empty_batch() {
        let batch = generate_update(
            DatabaseEngine::Postgres,
            "T",
            &Vec::<Json>::new(),
            &["Id"],
            &["Text"],
            None,
            &UpdateOptions::default(),
        )
        .unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.sql(), "");
    }

    #[test]
    fn argument_errors() {
        let none: [&str; 0] = [];
        let opts = UpdateOptions::default();
        let cases = [
            (
                generate_update(DatabaseEngine::Postgres, "T", &rows(), &none, &["Text"], None, &opts),
                "selector_columns",
            ),
            (
                generate_update(DatabaseEngine::Postgres, "T", &rows(), &["Id"], &none, None, &opts),
                "columns_to_update",
            ),
            (
                generate_update(
                    DatabaseEngine::Postgres,
                    "T",
                    &rows(),
                    &["Id"],
                    &["Text", "Id"],
                    None,
                    &opts,
                ),
                "columns_to_update",
            ),
            (
                generate_update(DatabaseEngine::Postgres, "", &rows(), &["Id"], &["Text"], None, &opts),
                "table",
            ),
        ];

        for (result, argument) in cases {
            match result {
                Err(Error::InvalidArgument(e)) => assert_eq!(e.argument, argument),
                other => panic!("expected invalid argument for {argument}, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_selector_field_reports_row() {
        let rows = vec![json!({ "Id": 1, "Text": "a" }), json!({ "Text": "b" })];
        let err = generate_update(
            DatabaseEngine::Postgres,
            "T",
            &rows,
            &["Id"],
            &["Text"],
            None,
            &UpdateOptions::default(),
        )
        .unwrap_err();
        match err {
            Error::UnknownColumn(e) => {
                assert_eq!(e.column, "Id");
                assert_eq!(e.row, Some(1));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
