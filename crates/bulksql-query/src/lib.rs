//! Batched DML statement generation for bulksql.
//!
//! `bulksql-query` is the **generation layer**. It turns a collection of rows
//! into parameterized SQL text plus named parameter bindings, ready to hand
//! to a driver.
//!
//! # Role In The Architecture
//!
//! - **INSERT**: [`generate_insert_batches`] emits multi-row INSERTs split
//!   into batches, with an optional per-engine conflict clause.
//! - **UPDATE**: [`generate_update`] emits one UPDATE per row, optionally
//!   wrapped in the engine's transaction envelope.
//! - **DELETE**: [`generate_delete`] emits a single `WHERE col IN (...)`.
//! - **Calculated values**: [`CalculatedValues`] overrides the value bound
//!   for a column with a function of the row.
//!
//! Generation is pure: no connection is touched and identical input always
//! yields identical output. Placeholders are `@{prefix}{column}_{index}`.
//! Execution lives in the `bulksql` facade crate.

pub mod batch;
pub mod delete;
pub mod generator;
pub mod insert;
pub mod options;
pub mod resolver;
pub mod update;

pub use batch::GeneratedBatch;
pub use delete::generate_delete;
pub use generator::QueryGenerator;
pub use insert::generate_insert_batches;
pub use options::{DEFAULT_BATCH_SIZE, InsertOptions, UpdateOptions};
pub use resolver::{CalculatedValues, resolve, resolve_field};
pub use update::generate_update;
