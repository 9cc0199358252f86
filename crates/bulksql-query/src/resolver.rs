//! Column value resolution with calculated-value overrides.

use bulksql_core::{BulkRow, CalculatedError, Error, Result, Value};
use std::collections::HashMap;
use std::fmt;

type CalculatedFn<'a, T> = Box<dyn Fn(&T) -> Result<Value> + Send + Sync + 'a>;

/// Per-column functions that compute a bound value from a row.
///
/// A column listed here is never read from the row's own field during value
/// resolution; the function result is bound instead. Selector columns of an
/// UPDATE are the exception: they always come from the row.
///
/// # Example
///
/// ```
/// use bulksql_query::CalculatedValues;
/// use bulksql_core::Value;
///
/// let calculated = CalculatedValues::<serde_json::Value>::new()
///     .with("TextCol", |row| {
///         if row["BoolCol"] == true { "Bool is True" } else { "Bool is False" }
///     });
///
/// assert!(calculated.contains("TextCol"));
/// ```
pub struct CalculatedValues<'a, T: ?Sized> {
    functions: HashMap<String, CalculatedFn<'a, T>>,
}

impl<'a, T: ?Sized> CalculatedValues<'a, T> {
    /// Create an empty override map.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Add an infallible override for `column`.
    pub fn with<F, V>(mut self, column: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'a,
        V: Into<Value>,
    {
        self.insert(column, f);
        self
    }

    /// Add a fallible override for `column`.
    ///
    /// An error returned by `f` aborts generation and surfaces as
    /// [`Error::Calculated`] with the original error as its source.
    pub fn with_fallible<F, V, E>(mut self, column: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T) -> std::result::Result<V, E> + Send + Sync + 'a,
        V: Into<Value>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let column = column.into();
        let name = column.clone();
        self.functions.insert(
            column,
            Box::new(move |row: &T| {
                f(row).map(Into::into).map_err(|e| {
                    Error::Calculated(CalculatedError {
                        column: name.clone(),
                        row: None,
                        source: e.into(),
                    })
                })
            }),
        );
        self
    }

    /// Add or replace an infallible override for `column`.
    pub fn insert<F, V>(&mut self, column: impl Into<String>, f: F)
    where
        F: Fn(&T) -> V + Send + Sync + 'a,
        V: Into<Value>,
    {
        self.functions
            .insert(column.into(), Box::new(move |row: &T| Ok(f(row).into())));
    }

    /// Check if `column` has an override.
    pub fn contains(&self, column: &str) -> bool {
        self.functions.contains_key(column)
    }

    /// Number of overridden columns.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if there are no overrides.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Overridden column names, sorted.
    pub fn columns(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the override for `column`, if there is one.
    #[allow(clippy::result_large_err)]
    pub fn evaluate(&self, column: &str, row: &T) -> Option<Result<Value>> {
        self.functions.get(column).map(|f| f(row))
    }
}

impl<T: ?Sized> Default for CalculatedValues<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for CalculatedValues<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalculatedValues")
            .field("columns", &self.columns())
            .finish()
    }
}

/// Resolve the value bound for `column` on `row`.
///
/// A calculated override wins over the row's own field. Fails with
/// [`Error::UnknownColumn`] if neither exists.
#[allow(clippy::result_large_err)]
pub fn resolve<T: BulkRow + ?Sized>(
    column: &str,
    row: &T,
    calculated: Option<&CalculatedValues<'_, T>>,
) -> Result<Value> {
    if let Some(result) = calculated.and_then(|c| c.evaluate(column, row)) {
        return result;
    }
    resolve_field(column, row)
}

/// Read `column` straight from the row, ignoring any override.
#[allow(clippy::result_large_err)]
pub fn resolve_field<T: BulkRow + ?Sized>(column: &str, row: &T) -> Result<Value> {
    row.field(column).ok_or_else(|| Error::unknown_column(column))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_value_without_overrides() {
        let row = json!({ "Id": 1, "Text": "aaa" });
        assert_eq!(
            resolve("Text", &row, None).unwrap(),
            Value::Text("aaa".to_string())
        );
    }

    #[test]
    fn override_wins_over_field() {
        let row = json!({ "Id": 1, "Text": "aaa" });
        let calculated = CalculatedValues::new().with("Text", |r: &serde_json::Value| {
            format!("row {}", r["Id"])
        });
        assert_eq!(
            resolve("Text", &row, Some(&calculated)).unwrap(),
            Value::Text("row 1".to_string())
        );
        // Override-free columns still come from the row
        assert_eq!(
            resolve("Id", &row, Some(&calculated)).unwrap(),
            Value::BigInt(1)
        );
    }

    #[test]
    fn override_supplies_missing_field() {
        let row = json!({ "Id": 1 });
        let calculated = CalculatedValues::new().with("Extra", |_: &serde_json::Value| 42_i64);
        assert_eq!(
            resolve("Extra", &row, Some(&calculated)).unwrap(),
            Value::BigInt(42)
        );
        assert!(matches!(
            resolve_field("Extra", &row),
            Err(Error::UnknownColumn(_))
        ));
    }

    #[test]
    fn unknown_column_is_an_error() {
        let row = json!({ "Id": 1 });
        let err = resolve("Nope", &row, Some(&CalculatedValues::new())).unwrap_err();
        assert_eq!(err.column(), Some("Nope"));
        assert!(matches!(err, Error::UnknownColumn(_)));
    }

    #[test]
    fn fallible_override_passes_error_through() {
        let row = json!({ "Id": 1 });
        let calculated = CalculatedValues::new().with_fallible(
            "Text",
            |_: &serde_json::Value| -> std::result::Result<Value, std::io::Error> {
                Err(std::io::Error::other("lookup failed"))
            },
        );

        let err = resolve("Text", &row, Some(&calculated)).unwrap_err();
        let Error::Calculated(inner) = err else {
            panic!("expected calculated error");
        };
        assert_eq!(inner.column, "Text");
        assert_eq!(inner.row, None);
        let io = inner
            .source
            .downcast_ref::<std::io::Error>()
            .expect("original error type is preserved");
        assert_eq!(io.to_string(), "lookup failed");
    }

    #[test]
    fn debug_lists_columns_sorted() {
        let calculated = CalculatedValues::<serde_json::Value>::new()
            .with("b", |_| 1_i64)
            .with("a", |_| 2_i64);
        assert_eq!(calculated.columns(), vec!["a", "b"]);
        assert_eq!(calculated.len(), 2);
        assert!(format!("{calculated:?}").contains("[\"a\", \"b\"]"));
    }
}
