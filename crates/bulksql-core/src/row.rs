//! Named-field access to caller row objects.

use crate::value::Value;
use std::collections::{BTreeMap, HashMap};

/// A row object whose fields can be read by column name.
///
/// Usually derived with `#[derive(BulkRow)]`, which maps each struct field to
/// a column. Implement it by hand when columns do not correspond one-to-one
/// to fields.
///
/// # Example
///
/// ```
/// use bulksql_core::{BulkRow, Value};
///
/// struct Item {
///     id: i64,
///     text: String,
/// }
///
/// impl BulkRow for Item {
///     fn field(&self, column: &str) -> Option<Value> {
///         match column {
///             "Id" => Some(self.id.into()),
///             "Text" => Some(self.text.clone().into()),
///             _ => None,
///         }
///     }
/// }
///
/// let item = Item { id: 1, text: "aaa".into() };
/// assert_eq!(item.field("Text"), Some(Value::Text("aaa".into())));
/// assert_eq!(item.field("Missing"), None);
/// ```
pub trait BulkRow {
    /// Read the value of `column`, or `None` if this row has no such field.
    fn field(&self, column: &str) -> Option<Value>;

    /// Column names exposed by this row type, in declaration order.
    ///
    /// Dynamic rows (maps) have no static column list and return an empty slice.
    fn columns() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }
}

impl<T: BulkRow + ?Sized> BulkRow for &T {
    fn field(&self, column: &str) -> Option<Value> {
        (**self).field(column)
    }
}

impl<T: BulkRow + ?Sized> BulkRow for Box<T> {
    fn field(&self, column: &str) -> Option<Value> {
        (**self).field(column)
    }
}

impl BulkRow for BTreeMap<String, Value> {
    fn field(&self, column: &str) -> Option<Value> {
        self.get(column).cloned()
    }
}

impl<S: std::hash::BuildHasher> BulkRow for HashMap<String, Value, S> {
    fn field(&self, column: &str) -> Option<Value> {
        self.get(column).cloned()
    }
}

impl BulkRow for serde_json::Map<String, serde_json::Value> {
    fn field(&self, column: &str) -> Option<Value> {
        self.get(column).map(Value::from_json)
    }
}

/// Only JSON objects have fields; any other JSON value resolves nothing.
impl BulkRow for serde_json::Value {
    fn field(&self, column: &str) -> Option<Value> {
        self.as_object().and_then(|obj| obj.field(column))
    }
}
