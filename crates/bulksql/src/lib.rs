//! bulksql - batched, parameterized INSERT/UPDATE/DELETE for many rows at once.
//!
//! bulksql turns a collection of row objects into SQL text plus named
//! parameter bindings:
//!
//! - Multi-row INSERT split into batches, with optional `ON CONFLICT DO NOTHING`
//! - One UPDATE per row selected by key columns, inside a transaction envelope
//! - A single `DELETE ... WHERE col IN (...)`
//! - Calculated values that replace a column's bound value with a function of the row
//! - Dialect differences for PostgreSQL, SQL Server, SQLite and MySQL
//!
//! # Quick Start
//!
//! ```
//! use bulksql::prelude::*;
//!
//! #[derive(BulkRow)]
//! #[bulk(rename_all = "PascalCase")]
//! struct TestRow {
//!     id: i64,
//!     text: String,
//!     flag: bool,
//! }
//!
//! let rows = vec![
//!     TestRow { id: 1, text: "aaa".into(), flag: true },
//!     TestRow { id: 2, text: "bbb".into(), flag: false },
//! ];
//!
//! let calculated = CalculatedValues::new()
//!     .with("Text", |row: &TestRow| if row.flag { "on" } else { "off" });
//!
//! let batches = generate_insert_batches(
//!     DatabaseEngine::Postgres,
//!     "TestTable",
//!     &rows,
//!     &["Id", "Text"],
//!     Some(&calculated),
//!     &InsertOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     batches[0].sql(),
//!     "INSERT INTO TestTable (Id,Text) VALUES (@Id_0,@Text_0),(@Id_1,@Text_1);"
//! );
//! assert_eq!(batches[0].params().get("Text_1"), Some(&Value::from("off")));
//! ```
//!
//! # Execution
//!
//! Generation is synchronous and driver-free. To run statements, implement
//! [`BulkExecutor`] for a connection and use [`execute_bulk_insert`],
//! [`execute_bulk_update`] or [`execute_bulk_delete`]. They run on
//! asupersync and honour cancellation through the supplied [`Cx`].

extern crate self as bulksql;

pub mod execute;

pub use execute::{BulkExecutor, execute_bulk_delete, execute_bulk_insert, execute_bulk_update};

pub use asupersync::{Cx, Outcome};

pub use bulksql_core::{
    ArgumentError, BulkRow, CalculatedError, ColumnError, ConflictPolicy, DatabaseEngine,
    DialectPolicy, Error, ExecutionError, PARAM_SIGIL, ParameterSet, Result, Value,
};

pub use bulksql_macros::BulkRow;

pub use bulksql_query::{
    CalculatedValues, DEFAULT_BATCH_SIZE, GeneratedBatch, InsertOptions, QueryGenerator,
    UpdateOptions, generate_delete, generate_insert_batches, generate_update,
};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use bulksql::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Generation
        BulkRow,
        CalculatedValues,
        ConflictPolicy,
        DatabaseEngine,
        Error,
        GeneratedBatch,
        InsertOptions,
        ParameterSet,
        QueryGenerator,
        Result,
        UpdateOptions,
        Value,
        generate_delete,
        generate_insert_batches,
        generate_update,
        // Execution
        BulkExecutor,
        Cx,
        Outcome,
        execute_bulk_delete,
        execute_bulk_insert,
        execute_bulk_update,
    };
}

#[cfg(test)]
mod derive_tests {
    use super::*;

    #[derive(BulkRow, Clone)]
    struct Account {
        id: i64,
        #[bulk(column = "DisplayName")]
        name: String,
        balance: Option<f64>,
        #[bulk(skip)]
        #[allow(dead_code)]
        cache: Vec<u8>,
    }

    fn account() -> Account {
        Account {
            id: 7,
            name: "Ann".to_string(),
            balance: None,
            cache: vec![1, 2, 3],
        }
    }

    #[test]
    fn derived_columns_and_fields() {
        assert_eq!(Account::columns(), &["id", "DisplayName", "balance"]);

        let row = account();
        assert_eq!(row.field("id"), Some(Value::BigInt(7)));
        assert_eq!(row.field("DisplayName"), Some(Value::Text("Ann".into())));
        assert_eq!(row.field("balance"), Some(Value::Null));
        assert_eq!(row.field("name"), None);
        assert_eq!(row.field("cache"), None);
    }

    #[test]
    fn derived_row_feeds_generator() {
        let rows = [account()];
        let batch = generate_delete(
            "Accounts",
            "id",
            rows.iter().map(|r| r.id),
            "",
        )
        .unwrap();
        assert_eq!(batch.sql(), "DELETE FROM Accounts WHERE id IN (@id_0);");

        let batches = generate_insert_batches(
            DatabaseEngine::MySql,
            "Accounts",
            &rows,
            Account::columns(),
            None,
            &InsertOptions::default(),
        )
        .unwrap();
        assert_eq!(
            batches[0].sql(),
            "INSERT INTO Accounts (id,DisplayName,balance) VALUES (@id_0,@DisplayName_0,@balance_0);"
        );
    }
}
