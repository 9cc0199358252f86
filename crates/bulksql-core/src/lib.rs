//! Core types for bulksql.
//!
//! This crate provides the shared vocabulary of the statement generators:
//!
//! - `Value` for dynamically typed parameter values
//! - `ParameterSet` for the named bindings accompanying a statement
//! - `BulkRow` for reading row objects by column name
//! - `DatabaseEngine` and its `DialectPolicy` table
//! - `Error` / `Result` shared by every layer

pub mod dialect;
pub mod error;
pub mod identifiers;
pub mod params;
pub mod row;
pub mod value;

pub use dialect::{ConflictPolicy, DatabaseEngine, DialectPolicy};
pub use error::{
    ArgumentError, CalculatedError, ColumnError, Error, ExecutionError, Result,
};
pub use identifiers::{
    validate_column_list, validate_column_name, validate_param_prefix, validate_table_name,
};
pub use params::{PARAM_SIGIL, ParameterSet};
pub use row::BulkRow;
pub use value::Value;
