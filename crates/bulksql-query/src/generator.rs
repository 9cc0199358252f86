//! Engine-bound front end for the free generator functions.

use crate::batch::GeneratedBatch;
use crate::options::{InsertOptions, UpdateOptions};
use crate::resolver::CalculatedValues;
use bulksql_core::{BulkRow, DatabaseEngine, DialectPolicy, Result, Value};

/// Statement generator fixed to one database engine.
///
/// Holds no state beyond the engine; every call is independent and the
/// generator can be shared freely between threads.
///
/// ```
/// use bulksql_core::DatabaseEngine;
/// use bulksql_query::{QueryGenerator, UpdateOptions};
/// use serde_json::json;
///
/// let generator = QueryGenerator::new(DatabaseEngine::Postgres);
/// let batch = generator
///     .update(
///         "TestTable",
///         &[json!({"Id": 1, "Text": "x"})],
///         &["Id"],
///         &["Text"],
///         None,
///         &UpdateOptions::default(),
///     )
///     .unwrap();
/// assert!(batch.sql().starts_with("BEGIN;\n"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryGenerator {
    engine: DatabaseEngine,
}

impl QueryGenerator {
    /// Create a generator for `engine`.
    pub const fn new(engine: DatabaseEngine) -> Self {
        Self { engine }
    }

    /// The target engine.
    pub const fn engine(&self) -> DatabaseEngine {
        self.engine
    }

    /// The engine's dialect table.
    pub fn dialect(&self) -> &'static DialectPolicy {
        self.engine.policy()
    }

    /// See [`generate_insert_batches`](crate::generate_insert_batches).
    #[allow(clippy::result_large_err)]
    pub fn insert<T, S>(
        &self,
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
        crate::generate_insert_batches(self.engine, table, rows, columns, calculated, options)
    }

    /// See [`generate_update`](crate::generate_update).
    #[allow(clippy::result_large_err)]
    pub fn update<T, S, U>(
        &self,
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
        crate::generate_update(
            self.engine,
            table,
            rows,
            selector_columns,
            columns_to_update,
            calculated,
            options,
        )
    }

    /// See [`generate_delete`](crate::generate_delete).
    #[allow(clippy::result_large_err)]
    pub fn delete<I>(
        &self,
        table: &str,
        selector_column: &str,
        values: I,
        param_prefix: &str,
    ) -> Result<GeneratedBatch>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        crate::generate_delete(table, selector_column, values, param_prefix)
    }
}

impl From<DatabaseEngine> for QueryGenerator {
    fn from(engine: DatabaseEngine) -> Self {
        Self::new(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulksql_core::ConflictPolicy;
    use serde_json::json;

    #[test]
    fn delegates_with_bound_engine() {
        let generator = QueryGenerator::from(DatabaseEngine::Sqlite);
        assert_eq!(generator.engine(), DatabaseEngine::Sqlite);
        assert_eq!(generator.dialect().transaction_open, "BEGIN TRANSACTION;");

        let rows = [json!({ "Id": 1 })];
        let batches = generator
            .insert(
                "T",
                &rows,
                &["Id"],
                None,
                &InsertOptions::new().on_conflict(ConflictPolicy::DoNothing),
            )
            .unwrap();
        assert_eq!(
            batches[0].sql(),
            "INSERT INTO T (Id) VALUES (@Id_0) ON CONFLICT DO NOTHING;"
        );

        let batch = generator.delete("T", "Id", [1_i64], "").unwrap();
        assert_eq!(batch.sql(), "DELETE FROM T WHERE Id IN (@Id_0);");
    }
}
